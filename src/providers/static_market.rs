use crate::core::market::{BankRate, MarketDataProvider, MarketIndex, MarketSnapshot};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Serves a fixed snapshot. Used when no rate sheet endpoint is configured.
pub struct StaticMarketProvider {
    snapshot: MarketSnapshot,
}

impl StaticMarketProvider {
    pub fn new(snapshot: MarketSnapshot) -> Self {
        Self { snapshot }
    }
}

fn bank_rate(bank: &str, tenure_months: u32, rate: Decimal, senior: Decimal) -> BankRate {
    BankRate {
        bank: bank.to_string(),
        tenure_months,
        rate,
        senior_citizen_rate: Some(senior),
    }
}

fn index(name: &str, value: Decimal, change_percent: Decimal) -> MarketIndex {
    MarketIndex {
        name: name.to_string(),
        value,
        change_percent,
    }
}

impl Default for StaticMarketProvider {
    /// Reference figures bundled with the binary.
    fn default() -> Self {
        let as_of = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default();
        Self::new(MarketSnapshot {
            as_of,
            bank_rates: vec![
                bank_rate("State Bank of India", 12, dec!(6.80), dec!(7.30)),
                bank_rate("State Bank of India", 36, dec!(6.75), dec!(7.25)),
                bank_rate("HDFC Bank", 12, dec!(6.60), dec!(7.10)),
                bank_rate("HDFC Bank", 36, dec!(7.00), dec!(7.50)),
                bank_rate("ICICI Bank", 12, dec!(6.70), dec!(7.20)),
                bank_rate("ICICI Bank", 36, dec!(7.00), dec!(7.50)),
                bank_rate("Axis Bank", 12, dec!(6.70), dec!(7.20)),
                bank_rate("Axis Bank", 60, dec!(7.00), dec!(7.75)),
                bank_rate("Post Office", 60, dec!(7.50), dec!(7.50)),
            ],
            indices: vec![
                index("NIFTY 50", dec!(22530.70), dec!(0.42)),
                index("SENSEX", dec!(73961.31), dec!(0.30)),
                index("Gold (10g)", dec!(72150.00), dec!(-0.35)),
                index("USD/INR", dec!(83.45), dec!(0.05)),
            ],
        })
    }
}

#[async_trait]
impl MarketDataProvider for StaticMarketProvider {
    async fn fetch_snapshot(&self) -> Result<MarketSnapshot> {
        Ok(self.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_sheet_has_rates_and_indices() {
        let provider = StaticMarketProvider::default();
        let snapshot = provider.fetch_snapshot().await.unwrap();

        assert!(!snapshot.bank_rates.is_empty());
        assert!(!snapshot.indices.is_empty());
        let best = snapshot.best_rates();
        assert_eq!(best[&60].bank, "Post Office");
        assert!(
            snapshot
                .bank_rates
                .iter()
                .all(|r| r.rate > Decimal::ZERO && r.senior_citizen_rate >= Some(r.rate))
        );
    }
}

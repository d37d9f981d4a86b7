//! Market data abstractions: bank deposit rates and headline indices.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Deposit rate offered by a bank for one tenure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankRate {
    pub bank: String,
    pub tenure_months: u32,
    pub rate: Decimal,
    #[serde(default)]
    pub senior_citizen_rate: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketIndex {
    pub name: String,
    pub value: Decimal,
    pub change_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub as_of: NaiveDate,
    #[serde(default)]
    pub bank_rates: Vec<BankRate>,
    #[serde(default)]
    pub indices: Vec<MarketIndex>,
}

impl MarketSnapshot {
    /// Highest offered rate for each tenure. Ties keep the first bank listed.
    pub fn best_rates(&self) -> BTreeMap<u32, &BankRate> {
        let mut best: BTreeMap<u32, &BankRate> = BTreeMap::new();
        for rate in &self.bank_rates {
            best.entry(rate.tenure_months)
                .and_modify(|current| {
                    if rate.rate > current.rate {
                        *current = rate;
                    }
                })
                .or_insert(rate);
        }
        best
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<MarketSnapshot>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rate(bank: &str, tenure_months: u32, rate: Decimal) -> BankRate {
        BankRate {
            bank: bank.to_string(),
            tenure_months,
            rate,
            senior_citizen_rate: None,
        }
    }

    #[test]
    fn test_best_rates_per_tenure() {
        let snapshot = MarketSnapshot {
            as_of: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            bank_rates: vec![
                rate("A", 12, dec!(6.8)),
                rate("B", 12, dec!(7.1)),
                rate("C", 12, dec!(7.1)),
                rate("A", 36, dec!(7.0)),
            ],
            indices: vec![],
        };

        let best = snapshot.best_rates();
        assert_eq!(best.len(), 2);
        assert_eq!(best[&12].bank, "B");
        assert_eq!(best[&36].rate, dec!(7.0));
    }

    #[test]
    fn test_snapshot_deserializes_with_defaults() {
        let json = r#"{"as_of": "2024-06-01", "bank_rates": [{"bank": "A", "tenure_months": 12, "rate": "7.1"}]}"#;
        let snapshot: MarketSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.bank_rates[0].rate, dec!(7.1));
        assert!(snapshot.bank_rates[0].senior_citizen_rate.is_none());
        assert!(snapshot.indices.is_empty());
    }
}

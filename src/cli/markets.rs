use super::ui;
use crate::core::market::{MarketDataProvider, MarketSnapshot};
use anyhow::Result;
use comfy_table::Cell;

impl MarketSnapshot {
    pub fn display_as_table(&self) -> String {
        let best = self.best_rates();

        let mut rates = ui::new_styled_table();
        rates.set_header(vec![
            ui::header_cell("Bank"),
            ui::header_cell("Tenure"),
            ui::header_cell("Rate (p.a.)"),
            ui::header_cell("Senior Citizen"),
        ]);

        let mut bank_rates: Vec<_> = self.bank_rates.iter().collect();
        bank_rates.sort_by(|a, b| {
            a.tenure_months
                .cmp(&b.tenure_months)
                .then_with(|| b.rate.cmp(&a.rate))
        });

        for rate in bank_rates {
            let is_best = best
                .get(&rate.tenure_months)
                .is_some_and(|top| top.rate == rate.rate);
            let rate_cell = if is_best {
                ui::highlight_cell(format!("{:.2}%", rate.rate))
            } else {
                ui::rate_cell(rate.rate)
            };
            let senior = rate
                .senior_citizen_rate
                .map_or(Cell::new("N/A"), ui::rate_cell);

            rates.add_row(vec![
                Cell::new(&rate.bank),
                Cell::new(ui::format_tenure(rate.tenure_months)),
                rate_cell,
                senior,
            ]);
        }

        let mut output = format!(
            "{}\n{}\n\n{}\n",
            ui::style_text("Market Rates", ui::StyleType::Title),
            ui::style_text(&format!("As of {}", self.as_of), ui::StyleType::Subtle),
            ui::style_text("Fixed Deposit Rates", ui::StyleType::TotalLabel),
        );
        if self.bank_rates.is_empty() {
            output.push_str("No bank rates available.");
        } else {
            output.push_str(&rates.to_string());
        }

        if !self.indices.is_empty() {
            let mut indices = ui::new_styled_table();
            indices.set_header(vec![
                ui::header_cell("Index"),
                ui::header_cell("Value"),
                ui::header_cell("Change"),
            ]);
            for index in &self.indices {
                indices.add_row(vec![
                    Cell::new(&index.name),
                    ui::amount_cell(index.value),
                    ui::change_cell(index.change_percent),
                ]);
            }
            output.push_str(&format!(
                "\n\n{}\n{}",
                ui::style_text("Indices", ui::StyleType::TotalLabel),
                indices
            ));
        }

        output
    }
}

/// Fetches the current snapshot and renders it.
pub async fn run(provider: &dyn MarketDataProvider) -> Result<String> {
    let pb = ui::new_spinner("Fetching market rates...");
    let snapshot = provider.fetch_snapshot().await;
    pb.finish_and_clear();

    Ok(snapshot?.display_as_table())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::market::{BankRate, MarketIndex};
    use crate::providers::static_market::StaticMarketProvider;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_snapshot_table() {
        let snapshot = MarketSnapshot {
            as_of: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            bank_rates: vec![BankRate {
                bank: "Bank of Rust".to_string(),
                tenure_months: 12,
                rate: dec!(7.1),
                senior_citizen_rate: None,
            }],
            indices: vec![MarketIndex {
                name: "NIFTY 50".to_string(),
                value: dec!(22530.7),
                change_percent: dec!(-0.42),
            }],
        };

        let output = snapshot.display_as_table();
        assert!(output.contains("As of 2024-06-01"));
        assert!(output.contains("Bank of Rust"));
        assert!(output.contains("7.10%"));
        assert!(output.contains("N/A"));
        assert!(output.contains("22,530.70"));
        assert!(output.contains("-0.42%"));
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = MarketSnapshot {
            as_of: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            bank_rates: vec![],
            indices: vec![],
        };
        let output = snapshot.display_as_table();
        assert!(output.contains("No bank rates available."));
        assert!(!output.contains("Indices"));
    }

    #[tokio::test]
    async fn test_run_with_static_provider() {
        let output = run(&StaticMarketProvider::default()).await.unwrap();
        assert!(output.contains("State Bank of India"));
        assert!(output.contains("SENSEX"));
    }
}

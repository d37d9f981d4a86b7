pub mod account;
pub mod calculator;
pub mod dashboard;
pub mod investments;
pub mod markets;
pub mod setup;
pub mod ui;

use crate::core::analytics::summarize_deposits;
use crate::core::auth::Session;
use crate::core::deposit::FixedDeposit;
use crate::core::market::MarketDataProvider;
use crate::core::view::View;
use anyhow::Result;
use chrono::NaiveDate;

/// Renders one of the top-level views for the logged-in user.
pub async fn render_view(
    view: View,
    session: &Session,
    deposits: &[FixedDeposit],
    market: &dyn MarketDataProvider,
    today: NaiveDate,
    currency: &str,
) -> Result<String> {
    match view {
        View::Dashboard => {
            let summary = summarize_deposits(deposits, today)?;
            Ok(dashboard::render(session, &summary, currency))
        }
        View::Investments => {
            let summary = summarize_deposits(deposits, today)?;
            Ok(investments::render_list(&summary, currency))
        }
        View::Markets => markets::run(market).await,
    }
}

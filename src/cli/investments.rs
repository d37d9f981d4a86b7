use super::{calculator, ui};
use crate::core::analytics::PortfolioSummary;
use crate::core::calculator::ReferenceRates;
use crate::core::deposit::FixedDeposit;
use crate::core::view::View;
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;

/// Table of all deposits with their status and maturity value.
pub fn render_list(summary: &PortfolioSummary, currency: &str) -> String {
    let mut output = format!(
        "{}\n\n",
        ui::style_text(View::Investments.title(), ui::StyleType::Title)
    );

    if summary.deposits.is_empty() {
        output.push_str("No fixed deposits yet. Add one with `fintechora add`.");
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("ID"),
        ui::header_cell("Bank"),
        ui::header_cell(&format!("Principal ({currency})")),
        ui::header_cell("Rate"),
        ui::header_cell("Tenure"),
        ui::header_cell("Start"),
        ui::header_cell("Maturity"),
        ui::header_cell("Status"),
        ui::header_cell("Maturity Value"),
    ]);

    for item in &summary.deposits {
        let deposit = &item.deposit;
        table.add_row(vec![
            Cell::new(deposit.short_id()),
            Cell::new(&deposit.bank_name),
            ui::amount_cell(deposit.principal),
            ui::rate_cell(deposit.interest_rate),
            Cell::new(ui::format_tenure(deposit.duration_months)),
            Cell::new(deposit.start_date),
            Cell::new(deposit.maturity_date),
            ui::status_cell(item.status),
            ui::amount_cell(item.maturity_value),
        ]);
    }
    output.push_str(&table.to_string());

    output.push_str(&format!(
        "\n\nTotal Invested ({}): {}\nTotal at Maturity ({}): {}",
        ui::style_text(currency, ui::StyleType::TotalLabel),
        ui::format_amount(summary.total_principal),
        ui::style_text(currency, ui::StyleType::TotalLabel),
        ui::style_text(
            &ui::format_amount(summary.projected_maturity),
            ui::StyleType::TotalValue
        ),
    ));
    output
}

/// Detailed view of one deposit: terms, status, progress, and projections.
pub fn render_tracker(
    deposit: &FixedDeposit,
    today: NaiveDate,
    rates: &ReferenceRates,
    currency: &str,
) -> Result<String> {
    let status = deposit.status_on(today);
    let elapsed = deposit.elapsed_months(today);
    let current_value = deposit.value_on(today)?;

    let mut details = ui::new_styled_table();
    details.add_row(vec![Cell::new("ID"), Cell::new(&deposit.id)]);
    details.add_row(vec![Cell::new("Bank"), Cell::new(&deposit.bank_name)]);
    details.add_row(vec![
        Cell::new("Principal"),
        Cell::new(ui::format_money(deposit.principal, currency)),
    ]);
    details.add_row(vec![
        Cell::new("Interest Rate"),
        Cell::new(format!("{}% p.a., compounded monthly", deposit.interest_rate)),
    ]);
    details.add_row(vec![
        Cell::new("Tenure"),
        Cell::new(format!(
            "{} ({} months)",
            ui::format_tenure(deposit.duration_months),
            deposit.duration_months
        )),
    ]);
    details.add_row(vec![
        Cell::new("Start Date"),
        Cell::new(deposit.start_date),
    ]);
    details.add_row(vec![
        Cell::new("Maturity Date"),
        Cell::new(deposit.maturity_date),
    ]);
    details.add_row(vec![Cell::new("Status"), ui::status_cell(status)]);
    details.add_row(vec![
        Cell::new("Progress"),
        Cell::new(format!("{elapsed} of {} months", deposit.duration_months)),
    ]);
    details.add_row(vec![
        Cell::new("Current Value"),
        Cell::new(ui::format_money(current_value, currency)),
    ]);

    let projection = calculator::render_projection(
        deposit.principal,
        deposit.interest_rate,
        i64::from(deposit.duration_months),
        rates,
        currency,
    )?;

    Ok(format!(
        "{}\n{}\n\n{}",
        ui::style_text(
            &format!("Fixed Deposit with {}", deposit.bank_name),
            ui::StyleType::Title
        ),
        details,
        projection
    ))
}

pub fn render_added(deposit: &FixedDeposit, currency: &str) -> String {
    format!(
        "Added fixed deposit {} with {}: {} at {}% for {} months, maturing on {}.",
        deposit.short_id(),
        deposit.bank_name,
        ui::format_money(deposit.principal, currency),
        deposit.interest_rate,
        deposit.duration_months,
        deposit.maturity_date
    )
}

pub fn render_removed(deposit: &FixedDeposit) -> String {
    format!(
        "Removed fixed deposit {} with {}.",
        deposit.short_id(),
        deposit.bank_name
    )
}

use super::ui;
use crate::core::analytics::PortfolioSummary;
use crate::core::auth::Session;
use comfy_table::Cell;

pub fn render(session: &Session, summary: &PortfolioSummary, currency: &str) -> String {
    let mut output = format!(
        "{}\n{}\n\n",
        ui::style_text(
            &format!("Welcome back, {}", session.user.name),
            ui::StyleType::Title
        ),
        ui::style_text(&session.user.email, ui::StyleType::Subtle),
    );

    if summary.deposits.is_empty() {
        output.push_str("No fixed deposits yet. Add one with `fintechora add`.");
        return output;
    }

    let mut totals = ui::new_styled_table();
    totals.set_header(vec![
        ui::header_cell(&format!("Invested ({currency})")),
        ui::header_cell("Current Value"),
        ui::header_cell("Interest Accrued"),
        ui::header_cell("Projected Maturity"),
        ui::header_cell("Projected Interest"),
    ]);
    totals.add_row(vec![
        ui::amount_cell(summary.total_principal),
        ui::highlight_cell(ui::format_amount(summary.current_value)),
        ui::amount_cell(summary.accrued_interest()),
        ui::amount_cell(summary.projected_maturity),
        ui::amount_cell(summary.projected_interest()),
    ]);
    output.push_str(&totals.to_string());

    output.push_str(&format!(
        "\n\nActive deposits: {}  Matured: {}",
        summary.active_count, summary.matured_count
    ));

    let upcoming = summary.upcoming_maturities();
    if let Some(next) = upcoming.first() {
        output.push_str(&format!(
            "\nNext maturity: {} on {} ({})",
            next.deposit.bank_name,
            next.deposit.maturity_date,
            ui::format_money(next.maturity_value, currency)
        ));

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Bank"),
            ui::header_cell("Maturity Date"),
            ui::header_cell("Days Left"),
            ui::header_cell("Maturity Value"),
        ]);
        for item in &upcoming {
            let days_left = (item.deposit.maturity_date - summary.as_of).num_days();
            table.add_row(vec![
                Cell::new(&item.deposit.bank_name),
                Cell::new(item.deposit.maturity_date),
                Cell::new(days_left),
                ui::amount_cell(item.maturity_value),
            ]);
        }
        output.push_str(&format!(
            "\n\n{}\n{}",
            ui::style_text("Upcoming Maturities", ui::StyleType::TotalLabel),
            table
        ));
    }

    output
}

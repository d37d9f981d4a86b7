use super::ui;
use crate::core::analytics::effective_annual_yield;
use crate::core::calculator::{
    self, ComparisonData, FinancialCalculation, GrowthPoint, ReferenceRates,
};
use anyhow::Result;
use comfy_table::Cell;
use rust_decimal::Decimal;

/// Months between printed growth points, so long terms stay readable.
fn growth_step(duration_months: usize) -> usize {
    match duration_months {
        0..=24 => 1,
        25..=60 => 3,
        61..=120 => 6,
        _ => 12,
    }
}

/// Growth points to print: every `growth_step` months, always including the last month.
pub fn sampled_growth(growth_data: &[GrowthPoint]) -> Vec<GrowthPoint> {
    let Some(last) = growth_data.last() else {
        return Vec::new();
    };
    let step = growth_step(last.month as usize);
    let mut points: Vec<_> = growth_data.iter().step_by(step).copied().collect();
    if points.last() != Some(last) {
        points.push(*last);
    }
    points
}

pub fn growth_table(calc: &FinancialCalculation, principal: Decimal) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Month"),
        ui::header_cell("Value"),
        ui::header_cell("Interest to date"),
    ]);

    for point in sampled_growth(&calc.growth_data) {
        table.add_row(vec![
            Cell::new(point.month),
            ui::amount_cell(point.value),
            ui::amount_cell(point.value - principal),
        ]);
    }
    table.to_string()
}

pub fn comparison_table(rows: &[ComparisonData], principal: Decimal) -> String {
    let best = rows.iter().map(|r| r.maturity_value).max();

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Instrument"),
        ui::header_cell("Rate (p.a.)"),
        ui::header_cell("Maturity Value"),
        ui::header_cell("Interest Earned"),
    ]);

    for row in rows {
        let value_cell = if Some(row.maturity_value) == best {
            ui::highlight_cell(ui::format_amount(row.maturity_value))
        } else {
            ui::amount_cell(row.maturity_value)
        };
        table.add_row(vec![
            Cell::new(format!("{} ({})", row.label, row.instrument)),
            ui::rate_cell(row.interest_rate),
            value_cell,
            ui::amount_cell(row.maturity_value - principal),
        ]);
    }
    table.to_string()
}

/// Maturity figures, effective yield, growth curve, and instrument comparison.
pub fn render_projection(
    principal: Decimal,
    annual_rate: Decimal,
    duration_months: i64,
    rates: &ReferenceRates,
    currency: &str,
) -> Result<String> {
    let calc = calculator::compute_maturity(principal, annual_rate, duration_months)?;
    let comparisons =
        calculator::compute_comparisons_with(principal, duration_months, annual_rate, rates)?;

    let mut output = format!(
        "Maturity Value: {}\nTotal Interest: {}\n",
        ui::style_text(
            &ui::format_money(calc.maturity_value, currency),
            ui::StyleType::TotalValue
        ),
        ui::format_money(calc.total_interest, currency),
    );
    if let Some(yield_pct) =
        effective_annual_yield(principal, calc.maturity_value, duration_months as u32)
    {
        output.push_str(&format!("Effective Annual Yield: {yield_pct:.2}%\n"));
    }

    output.push_str(&format!(
        "\n{}\n{}\n",
        ui::style_text("Growth", ui::StyleType::Title),
        growth_table(&calc, principal)
    ));
    output.push_str(&format!(
        "\n{}\n{}",
        ui::style_text("Comparison", ui::StyleType::Title),
        comparison_table(&comparisons, principal)
    ));
    Ok(output)
}

/// Output of the standalone `calc` command.
pub fn render(
    principal: Decimal,
    annual_rate: Decimal,
    duration_months: i64,
    rates: &ReferenceRates,
    currency: &str,
) -> Result<String> {
    let projection = render_projection(principal, annual_rate, duration_months, rates, currency)?;
    Ok(format!(
        "{}\n\nPrincipal: {}  Rate: {annual_rate}% p.a.  Tenure: {duration_months} months\n{projection}",
        ui::style_text("FD Calculator", ui::StyleType::Title),
        ui::format_money(principal, currency),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::CalcError;
    use rust_decimal_macros::dec;

    fn points(months: u32) -> Vec<GrowthPoint> {
        (0..=months)
            .map(|month| GrowthPoint {
                month,
                value: Decimal::from(month),
            })
            .collect()
    }

    #[test]
    fn test_sampled_growth_short_term_keeps_every_month() {
        let sampled = sampled_growth(&points(12));
        assert_eq!(sampled.len(), 13);
    }

    #[test]
    fn test_sampled_growth_long_term_includes_last_month() {
        let months: Vec<_> = sampled_growth(&points(50))
            .iter()
            .map(|p| p.month)
            .collect();
        assert_eq!(months.first(), Some(&0));
        assert_eq!(months.last(), Some(&50));
        assert!(months.contains(&48));
        assert_eq!(months.len(), 18);

        let months: Vec<_> = sampled_growth(&points(120))
            .iter()
            .map(|p| p.month)
            .collect();
        assert_eq!(months.len(), 21);
        assert_eq!(months.last(), Some(&120));
    }

    #[test]
    fn test_sampled_growth_empty() {
        assert!(sampled_growth(&[]).is_empty());
    }

    #[test]
    fn test_render_includes_figures() {
        let output = render(
            dec!(100000),
            dec!(6),
            12,
            &ReferenceRates::default(),
            "INR",
        )
        .unwrap();

        assert!(output.contains("106,167.78 INR"));
        assert!(output.contains("6,167.78 INR"));
        assert!(output.contains("Fixed Deposit (FD)"));
        assert!(output.contains("Savings Account (Savings)"));
        assert!(output.contains("Recurring Deposit (RD)"));
        assert!(output.contains("Effective Annual Yield"));
    }

    #[test]
    fn test_render_rejects_invalid_input() {
        let err = render(dec!(-1), dec!(6), 12, &ReferenceRates::default(), "INR").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CalcError>(),
            Some(CalcError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_render_extreme_rate_omits_yield() {
        let output = render(dec!(1), dec!(400000), 1, &ReferenceRates::default(), "INR").unwrap();
        assert!(output.contains("334.33 INR"));
        assert!(!output.contains("Effective Annual Yield"));
    }
}

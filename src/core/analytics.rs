//! Aggregate figures over a user's deposits.
use crate::core::calculator::round_currency;
use crate::core::deposit::{DepositStatus, FixedDeposit};
use crate::core::error::CalcError;
use chrono::NaiveDate;
use rust_decimal::{Decimal, MathematicalOps};
use rust_finprim::rate::cagr;
use tracing::debug;

/// Derived values for one deposit as of a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositValue {
    pub deposit: FixedDeposit,
    pub status: DepositStatus,
    pub current_value: Decimal,
    pub maturity_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioSummary {
    pub as_of: NaiveDate,
    pub deposits: Vec<DepositValue>,
    pub total_principal: Decimal,
    pub current_value: Decimal,
    pub projected_maturity: Decimal,
    pub active_count: usize,
    pub matured_count: usize,
}

impl PortfolioSummary {
    pub fn projected_interest(&self) -> Decimal {
        self.projected_maturity - self.total_principal
    }

    pub fn accrued_interest(&self) -> Decimal {
        self.current_value - self.total_principal
    }

    /// Active deposits ordered by maturity date, soonest first.
    pub fn upcoming_maturities(&self) -> Vec<&DepositValue> {
        let mut active: Vec<_> = self
            .deposits
            .iter()
            .filter(|d| d.status == DepositStatus::Active)
            .collect();
        active.sort_by_key(|d| d.deposit.maturity_date);
        active
    }
}

/// Values every deposit as of `today` and totals the results.
pub fn summarize_deposits(
    deposits: &[FixedDeposit],
    today: NaiveDate,
) -> Result<PortfolioSummary, CalcError> {
    let mut summary = PortfolioSummary {
        as_of: today,
        deposits: Vec::with_capacity(deposits.len()),
        total_principal: Decimal::ZERO,
        current_value: Decimal::ZERO,
        projected_maturity: Decimal::ZERO,
        active_count: 0,
        matured_count: 0,
    };

    for deposit in deposits {
        let calc = deposit.calculation()?;
        let status = deposit.status_on(today);
        let current_value = deposit.value_on(today)?;

        match status {
            DepositStatus::Active => summary.active_count += 1,
            DepositStatus::Matured => summary.matured_count += 1,
        }
        summary.total_principal += deposit.principal;
        summary.current_value += current_value;
        summary.projected_maturity += calc.maturity_value;

        summary.deposits.push(DepositValue {
            deposit: deposit.clone(),
            status,
            current_value,
            maturity_value: calc.maturity_value,
        });
    }

    debug!(
        "Summarized {} deposits: principal {}, current {}, maturity {}",
        deposits.len(),
        summary.total_principal,
        summary.current_value,
        summary.projected_maturity
    );
    Ok(summary)
}

/// Annualised growth (percent) from `principal` to `maturity_value` over
/// `duration_months`. `None` for a zero-length term, or when annualising a
/// short term overflows `Decimal`.
pub fn effective_annual_yield(
    principal: Decimal,
    maturity_value: Decimal,
    duration_months: u32,
) -> Option<Decimal> {
    if duration_months == 0 || principal <= Decimal::ZERO {
        return None;
    }
    let years = Decimal::from(duration_months) / Decimal::from(12);
    // cagr panics when the power overflows
    let growth = maturity_value.checked_div(principal)?;
    if growth.checked_powd(Decimal::ONE / years).is_none() {
        debug!("Effective yield out of range for {duration_months} months");
        return None;
    }
    let rate = cagr(principal, maturity_value, years);
    Some(round_currency(rate.checked_mul(Decimal::ONE_HUNDRED)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deposit::maturity_date;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn deposit(id: &str, principal: Decimal, rate: Decimal, months: u32, start: NaiveDate) -> FixedDeposit {
        FixedDeposit {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            bank_name: format!("Bank {id}"),
            principal,
            interest_rate: rate,
            duration_months: months,
            start_date: start,
            maturity_date: maturity_date(start, months).unwrap(),
        }
    }

    #[test]
    fn test_summary_totals() {
        let deposits = vec![
            deposit("a", dec!(100000), dec!(6), 12, date(2023, 1, 1)),
            deposit("b", dec!(100000), dec!(6), 12, date(2024, 1, 1)),
            deposit("c", dec!(50000), dec!(0), 24, date(2024, 3, 1)),
        ];

        let summary = summarize_deposits(&deposits, date(2024, 4, 1)).unwrap();

        assert_eq!(summary.matured_count, 1);
        assert_eq!(summary.active_count, 2);
        assert_eq!(summary.total_principal, dec!(250000));
        // a matured, b has three months, c earns nothing
        assert_eq!(
            summary.current_value,
            dec!(106167.78) + dec!(101507.51) + dec!(50000)
        );
        assert_eq!(
            summary.projected_maturity,
            dec!(106167.78) + dec!(106167.78) + dec!(50000)
        );
        assert_eq!(summary.projected_interest(), dec!(12335.56));
        assert_eq!(summary.accrued_interest(), dec!(7675.29));
    }

    #[test]
    fn test_upcoming_maturities_sorted() {
        let deposits = vec![
            deposit("late", dec!(1000), dec!(7), 36, date(2024, 1, 1)),
            deposit("soon", dec!(1000), dec!(7), 6, date(2024, 1, 1)),
            deposit("done", dec!(1000), dec!(7), 1, date(2020, 1, 1)),
        ];
        let summary = summarize_deposits(&deposits, date(2024, 2, 1)).unwrap();

        let ids: Vec<_> = summary
            .upcoming_maturities()
            .iter()
            .map(|d| d.deposit.id.as_str())
            .collect();
        assert_eq!(ids, vec!["soon", "late"]);
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize_deposits(&[], date(2024, 1, 1)).unwrap();
        assert_eq!(summary.total_principal, Decimal::ZERO);
        assert_eq!(summary.active_count + summary.matured_count, 0);
        assert!(summary.upcoming_maturities().is_empty());
    }

    #[test]
    fn test_effective_annual_yield() {
        // Monthly compounding at 6% yields about 6.17% a year
        let yield_pct = effective_annual_yield(dec!(100000), dec!(106167.78), 12).unwrap();
        assert!((yield_pct - dec!(6.17)).abs() <= dec!(0.01));

        assert_eq!(effective_annual_yield(dec!(1000), dec!(1000), 0), None);
    }

    #[test]
    fn test_effective_annual_yield_overflow_is_none() {
        // 334x in one month cannot be annualised within Decimal range
        assert_eq!(effective_annual_yield(dec!(1), dec!(334.33), 1), None);
        assert!(effective_annual_yield(dec!(1), dec!(2), 1).is_some());
    }
}

//! Maturity and comparison calculations for deposit instruments.
//!
//! Balances are carried at full decimal precision from one month to the next.
//! Values are rounded to currency precision only where they are reported: each
//! growth point and the maturity value.

use crate::core::error::CalcError;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Decimal places of every reported monetary amount.
pub const CURRENCY_DECIMALS: u32 = 2;

/// Longest term accepted by the calculator (100 years). Bounds the size of the
/// per-month growth series.
pub const MAX_DURATION_MONTHS: i64 = 1200;

/// Accrued value of a deposit after `month` compounding periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GrowthPoint {
    pub month: u32,
    pub value: Decimal,
}

/// Result of compounding a lump sum. Always recomputed, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinancialCalculation {
    pub maturity_value: Decimal,
    pub total_interest: Decimal,
    pub growth_data: Vec<GrowthPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrumentType {
    #[serde(rename = "FD")]
    Fd,
    Savings,
    #[serde(rename = "RD")]
    Rd,
}

impl InstrumentType {
    pub fn label(&self) -> &'static str {
        match self {
            InstrumentType::Fd => "Fixed Deposit",
            InstrumentType::Savings => "Savings Account",
            InstrumentType::Rd => "Recurring Deposit",
        }
    }
}

impl Display for InstrumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                InstrumentType::Fd => "FD",
                InstrumentType::Savings => "Savings",
                InstrumentType::Rd => "RD",
            }
        )
    }
}

/// One row of the side-by-side instrument comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonData {
    pub instrument: InstrumentType,
    pub label: String,
    pub maturity_value: Decimal,
    pub interest_rate: Decimal,
}

/// Annual rates (percent) used for the instruments a deposit is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRates {
    #[serde(default = "default_savings_rate")]
    pub savings: Decimal,
    #[serde(default = "default_recurring_deposit_rate")]
    pub recurring_deposit: Decimal,
}

fn default_savings_rate() -> Decimal {
    dec!(3.5)
}

fn default_recurring_deposit_rate() -> Decimal {
    dec!(6.5)
}

impl Default for ReferenceRates {
    fn default() -> Self {
        ReferenceRates {
            savings: default_savings_rate(),
            recurring_deposit: default_recurring_deposit_rate(),
        }
    }
}

/// Rounds an amount to currency precision, halves away from zero.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

/// Compounds `principal` monthly at `annual_rate_percent` for `duration_months`.
///
/// The growth series holds one point per month from 0 to `duration_months`
/// inclusive. A zero duration yields the single point `(0, principal)`.
///
/// # Errors
///
/// [`CalcError::InvalidInput`] when the principal is not positive or has more
/// than two decimal places, the rate is negative, the duration is negative, or
/// the balance overflows `Decimal`.
///
/// The principal is limited to currency precision so that the first growth
/// point always equals it exactly. The duration is capped at
/// [`MAX_DURATION_MONTHS`] because the series allocates one point per month.
pub fn compute_maturity(
    principal: Decimal,
    annual_rate_percent: Decimal,
    duration_months: i64,
) -> Result<FinancialCalculation, CalcError> {
    validate_principal(principal)?;
    validate_rate("interest rate", annual_rate_percent)?;
    let months = validate_duration(duration_months)?;

    let factor = monthly_factor(annual_rate_percent);
    let mut balance = principal;
    let mut growth_data = Vec::with_capacity(months as usize + 1);
    growth_data.push(GrowthPoint {
        month: 0,
        value: round_currency(balance),
    });

    for month in 1..=months {
        balance = balance.checked_mul(factor).ok_or_else(out_of_range)?;
        growth_data.push(GrowthPoint {
            month,
            value: round_currency(balance),
        });
    }

    let maturity_value = round_currency(balance);
    Ok(FinancialCalculation {
        maturity_value,
        total_interest: maturity_value - principal,
        growth_data,
    })
}

/// Compares a fixed deposit against a savings account and a recurring deposit
/// using the default [`ReferenceRates`].
pub fn compute_comparisons(
    principal: Decimal,
    duration_months: i64,
    fd_rate: Decimal,
) -> Result<[ComparisonData; 3], CalcError> {
    compute_comparisons_with(principal, duration_months, fd_rate, &ReferenceRates::default())
}

/// Builds the `[FD, Savings, RD]` comparison rows.
///
/// The savings row compounds the whole principal at `rates.savings`. The RD row
/// splits the principal into equal monthly installments paid at the start of
/// each month, each compounding monthly until the end of the term.
pub fn compute_comparisons_with(
    principal: Decimal,
    duration_months: i64,
    fd_rate: Decimal,
    rates: &ReferenceRates,
) -> Result<[ComparisonData; 3], CalcError> {
    validate_rate("savings rate", rates.savings)?;
    validate_rate("recurring deposit rate", rates.recurring_deposit)?;

    let fd = compute_maturity(principal, fd_rate, duration_months)?;
    let savings = compute_maturity(principal, rates.savings, duration_months)?;
    let rd = recurring_deposit_value(
        principal,
        rates.recurring_deposit,
        validate_duration(duration_months)?,
    )?;

    Ok([
        comparison_row(InstrumentType::Fd, fd.maturity_value, fd_rate),
        comparison_row(InstrumentType::Savings, savings.maturity_value, rates.savings),
        comparison_row(InstrumentType::Rd, rd, rates.recurring_deposit),
    ])
}

fn comparison_row(
    instrument: InstrumentType,
    maturity_value: Decimal,
    interest_rate: Decimal,
) -> ComparisonData {
    ComparisonData {
        instrument,
        label: instrument.label().to_string(),
        maturity_value,
        interest_rate,
    }
}

fn recurring_deposit_value(
    principal: Decimal,
    annual_rate_percent: Decimal,
    months: u32,
) -> Result<Decimal, CalcError> {
    if months == 0 {
        return Ok(principal);
    }

    let installment = principal / Decimal::from(months);
    let factor = monthly_factor(annual_rate_percent);

    // The last installment compounds for one month, the first for the full term.
    let mut growth = Decimal::ONE;
    let mut total = Decimal::ZERO;
    for _ in 0..months {
        growth = growth.checked_mul(factor).ok_or_else(out_of_range)?;
        let matured = installment.checked_mul(growth).ok_or_else(out_of_range)?;
        total = total.checked_add(matured).ok_or_else(out_of_range)?;
    }

    Ok(round_currency(total))
}

fn monthly_factor(annual_rate_percent: Decimal) -> Decimal {
    Decimal::ONE + annual_rate_percent / dec!(100) / dec!(12)
}

fn out_of_range() -> CalcError {
    CalcError::invalid("maturity value", "exceeds the supported range")
}

/// Positive, with at most [`CURRENCY_DECIMALS`] places so month 0 reports the principal unrounded.
pub(crate) fn validate_principal(principal: Decimal) -> Result<(), CalcError> {
    if principal <= Decimal::ZERO {
        return Err(CalcError::invalid(
            "principal",
            format!("must be positive, got {principal}"),
        ));
    }
    if round_currency(principal) != principal {
        return Err(CalcError::invalid(
            "principal",
            format!("must have at most {CURRENCY_DECIMALS} decimal places, got {principal}"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_rate(field: &'static str, rate: Decimal) -> Result<(), CalcError> {
    if rate < Decimal::ZERO {
        return Err(CalcError::invalid(
            field,
            format!("must not be negative, got {rate}"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_duration(duration_months: i64) -> Result<u32, CalcError> {
    if !(0..=MAX_DURATION_MONTHS).contains(&duration_months) {
        return Err(CalcError::invalid(
            "duration",
            format!("must be between 0 and {MAX_DURATION_MONTHS} months, got {duration_months}"),
        ));
    }
    Ok(duration_months as u32)
}

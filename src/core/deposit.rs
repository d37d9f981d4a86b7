//! Fixed deposit records and the values derived from them.

use crate::core::calculator::{
    self, ComparisonData, FinancialCalculation, ReferenceRates, validate_principal, validate_rate,
};
use crate::core::error::CalcError;
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Longest term accepted for a stored deposit.
pub const MAX_DEPOSIT_MONTHS: u32 = calculator::MAX_DURATION_MONTHS as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DepositStatus {
    Active,
    Matured,
}

impl Display for DepositStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DepositStatus::Active => "ACTIVE",
                DepositStatus::Matured => "MATURED",
            }
        )
    }
}

/// Details entered by the user when opening a deposit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeposit {
    pub bank_name: String,
    pub principal: Decimal,
    pub interest_rate: Decimal,
    pub duration_months: u32,
    pub start_date: NaiveDate,
}

impl NewDeposit {
    /// Checks the deposit terms and derives the maturity date.
    pub fn validate(&self) -> Result<NaiveDate, CalcError> {
        if self.bank_name.trim().is_empty() {
            return Err(CalcError::invalid("bank name", "must not be empty"));
        }
        validate_principal(self.principal)?;
        validate_rate("interest rate", self.interest_rate)?;
        if !(1..=MAX_DEPOSIT_MONTHS).contains(&self.duration_months) {
            return Err(CalcError::invalid(
                "duration",
                format!(
                    "must be between 1 and {MAX_DEPOSIT_MONTHS} months, got {}",
                    self.duration_months
                ),
            ));
        }
        maturity_date(self.start_date, self.duration_months)
    }
}

/// A stored fixed deposit. Status is never stored; see [`FixedDeposit::status_on`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedDeposit {
    pub id: String,
    pub user_id: String,
    pub bank_name: String,
    pub principal: Decimal,
    pub interest_rate: Decimal,
    pub duration_months: u32,
    pub start_date: NaiveDate,
    pub maturity_date: NaiveDate,
}

impl FixedDeposit {
    pub fn status_on(&self, today: NaiveDate) -> DepositStatus {
        if today < self.maturity_date {
            DepositStatus::Active
        } else {
            DepositStatus::Matured
        }
    }

    /// Number of whole months completed since the start date, clamped to the term.
    pub fn elapsed_months(&self, today: NaiveDate) -> u32 {
        if today <= self.start_date {
            return 0;
        }

        let mut months = (today.year() - self.start_date.year()) * 12
            + today.month() as i32
            - self.start_date.month() as i32;
        let reached = self
            .start_date
            .checked_add_months(Months::new(months.max(0) as u32))
            .is_some_and(|date| date <= today);
        if !reached {
            months -= 1;
        }

        (months.max(0) as u32).min(self.duration_months)
    }

    pub fn calculation(&self) -> Result<FinancialCalculation, CalcError> {
        calculator::compute_maturity(
            self.principal,
            self.interest_rate,
            i64::from(self.duration_months),
        )
    }

    pub fn comparisons(&self, rates: &ReferenceRates) -> Result<[ComparisonData; 3], CalcError> {
        calculator::compute_comparisons_with(
            self.principal,
            i64::from(self.duration_months),
            self.interest_rate,
            rates,
        )
    }

    /// Accrued value as of `today`, using the last completed month.
    pub fn value_on(&self, today: NaiveDate) -> Result<Decimal, CalcError> {
        let elapsed = self.elapsed_months(today) as usize;
        let calc = self.calculation()?;
        Ok(calc
            .growth_data
            .get(elapsed)
            .map_or(calc.maturity_value, |point| point.value))
    }

    /// First eight characters of the id, enough to address a deposit on the command line.
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

/// Adds whole months to `start`; days past the end of the target month clamp to its last day.
pub fn maturity_date(start: NaiveDate, duration_months: u32) -> Result<NaiveDate, CalcError> {
    start
        .checked_add_months(Months::new(duration_months))
        .ok_or_else(|| CalcError::invalid("start date", "maturity date is out of range"))
}

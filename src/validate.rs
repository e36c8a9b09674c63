use crate::error::{LoanError, LoanResult};
use crate::loan::LoanInput;
use log::trace;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const MIN_LOAN_AMOUNT: f64 = 0.;
pub const MAX_LOAN_AMOUNT: f64 = 1_000_000.;
pub const MIN_TERM_MONTHS: u32 = 1;
pub const MAX_TERM_MONTHS: u32 = 360;
pub const MIN_RATE: f64 = 0.1;
pub const MAX_RATE: f64 = 100.;

/// The three user-editable form fields.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Field {
    LoanAmount,
    Months,
    InterestRatePerMonth,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::LoanAmount => "loanAmount",
            Field::Months => "months",
            Field::InterestRatePerMonth => "interestRatePerMonth",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A problem with a single field.
///
/// `OutOfRange` is shown next to the field. `Missing` covers empty or unparseable text:
/// it keeps a `LoanInput` from being built but is not reported to the user.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum FieldError {
    OutOfRange { field: Field, reason: &'static str },
    Missing { field: Field },
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            FieldError::OutOfRange { field, .. } | FieldError::Missing { field } => *field,
        }
    }

    pub fn is_displayed(&self) -> bool {
        matches!(self, FieldError::OutOfRange { .. })
    }

    fn range(field: Field, reason: &'static str) -> Self {
        FieldError::OutOfRange { field, reason }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::OutOfRange { field, reason } => write!(f, "{} {}", field, reason),
            FieldError::Missing { field } => write!(f, "{} has no value", field),
        }
    }
}

/// Text exactly as typed into the form.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct RawLoanInput {
    pub loan_amount: String,
    pub months: String,
    pub interest_rate_per_month: String,
}

impl RawLoanInput {
    pub fn new(loan_amount: &str, months: &str, interest_rate_per_month: &str) -> Self {
        Self {
            loan_amount: loan_amount.to_string(),
            months: months.to_string(),
            interest_rate_per_month: interest_rate_per_month.to_string(),
        }
    }
}

/// Parse a real number, treating anything unparseable or non-finite as no value.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a whole number of months. Fractions and junk are no value.
pub fn parse_months(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

pub fn check_loan_amount(amount: f64) -> Result<f64, FieldError> {
    if amount.is_nan() || amount <= MIN_LOAN_AMOUNT {
        Err(FieldError::range(Field::LoanAmount, "must be > 0"))
    } else if amount > MAX_LOAN_AMOUNT {
        Err(FieldError::range(Field::LoanAmount, "must be < 1,000,000"))
    } else {
        Ok(amount)
    }
}

pub fn check_months(months: i64) -> Result<u32, FieldError> {
    if months < MIN_TERM_MONTHS as i64 {
        Err(FieldError::range(Field::Months, "must be ≥ 1"))
    } else if months > MAX_TERM_MONTHS as i64 {
        Err(FieldError::range(Field::Months, "must be ≤ 360"))
    } else {
        Ok(months as u32)
    }
}

pub fn check_rate(rate: f64) -> Result<f64, FieldError> {
    if rate.is_nan() || rate < MIN_RATE {
        Err(FieldError::range(Field::InterestRatePerMonth, "must be ≥ 0.1"))
    } else if rate > MAX_RATE {
        Err(FieldError::range(Field::InterestRatePerMonth, "must be ≤ 100"))
    } else {
        Ok(rate)
    }
}

pub fn validate_loan_amount(text: &str) -> Result<f64, FieldError> {
    let amount = parse_number(text).ok_or(FieldError::Missing {
        field: Field::LoanAmount,
    })?;
    check_loan_amount(amount)
}

pub fn validate_months(text: &str) -> Result<u32, FieldError> {
    let months = parse_months(text).ok_or(FieldError::Missing {
        field: Field::Months,
    })?;
    check_months(months)
}

pub fn validate_rate(text: &str) -> Result<f64, FieldError> {
    let rate = parse_number(text).ok_or(FieldError::Missing {
        field: Field::InterestRatePerMonth,
    })?;
    check_rate(rate)
}

/// Every field problem in `raw`, in field order. Empty when the input is valid.
pub fn field_errors(raw: &RawLoanInput) -> Vec<FieldError> {
    [
        validate_loan_amount(&raw.loan_amount).err(),
        validate_months(&raw.months).err(),
        validate_rate(&raw.interest_rate_per_month).err(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Turn raw form text into a `LoanInput`, or every field error found.
pub fn validate(raw: &RawLoanInput) -> LoanResult<LoanInput> {
    match (
        validate_loan_amount(&raw.loan_amount),
        validate_months(&raw.months),
        validate_rate(&raw.interest_rate_per_month),
    ) {
        (Ok(principal), Ok(term_months), Ok(rate)) => {
            trace!(
                "validated principal {}, term {}, rate {}",
                principal,
                term_months,
                rate
            );
            Ok(LoanInput::from_checked(principal, term_months, rate))
        }
        _ => Err(LoanError::Invalid(field_errors(raw))),
    }
}

/// Repair the months text when the field loses focus.
///
/// Any finite number is clamped into 1..=360, fractions dropping to the whole month
/// below. Empty or unparseable text becomes 1. Only the months field is repaired
/// this way.
pub fn repair_months_on_blur(text: &str) -> u32 {
    match parse_number(text) {
        Some(months) if months > MAX_TERM_MONTHS as f64 => MAX_TERM_MONTHS,
        Some(months) if months >= MIN_TERM_MONTHS as f64 => months.trunc() as u32,
        _ => MIN_TERM_MONTHS,
    }
}

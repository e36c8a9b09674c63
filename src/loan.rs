use crate::error::{LoanError, LoanResult};
use crate::format::format_currency;
use crate::validate::{check_loan_amount, check_months, check_rate, MAX_TERM_MONTHS};
use chrono::{Months, NaiveDate};
use log::{trace, warn};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Validated loan parameters. Only built once every field has passed its range check.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LoanInput {
    principal: f64,
    term_months: u32,
    monthly_rate_percent: f64,
}

impl LoanInput {
    pub fn new(principal: f64, term_months: u32, monthly_rate_percent: f64) -> LoanResult<Self> {
        let errors: Vec<_> = [
            check_loan_amount(principal).err(),
            check_months(term_months as i64).err(),
            check_rate(monthly_rate_percent).err(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if errors.is_empty() {
            Ok(Self::from_checked(principal, term_months, monthly_rate_percent))
        } else {
            Err(LoanError::Invalid(errors))
        }
    }

    pub(crate) fn from_checked(principal: f64, term_months: u32, monthly_rate_percent: f64) -> Self {
        Self {
            principal,
            term_months,
            monthly_rate_percent,
        }
    }

    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    pub fn monthly_rate_percent(&self) -> f64 {
        self.monthly_rate_percent
    }

    pub fn schedule(&self) -> Schedule {
        Schedule::new(generate_schedule(
            Some(self.principal),
            Some(self.monthly_rate_percent),
            Some(self.term_months),
        ))
    }
}

/// One month of the breakdown table. Amounts carry full precision.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleRow {
    pub month: u32,
    pub interest_amount: f64,
    pub total_amount: f64,
    pub monthly_payment: f64,
}

impl ScheduleRow {
    pub fn new(principal: f64, monthly_rate_percent: f64, month: u32) -> Self {
        let interest_amount = principal * (monthly_rate_percent / 100.) * month as f64;
        let total_amount = principal + interest_amount;
        Self {
            month,
            interest_amount,
            total_amount,
            monthly_payment: total_amount / month as f64,
        }
    }
}

impl fmt::Display for ScheduleRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "month {}, interest ${}, total ${}, monthly payment ${}",
            self.month,
            format_currency(Some(self.interest_amount)),
            format_currency(Some(self.total_amount)),
            format_currency(Some(self.monthly_payment))
        )
    }
}

/// Number of rows displayed for a term: rounded up to a whole year, capped at 360.
pub fn display_horizon(term_months: u32) -> u32 {
    term_months.min(MAX_TERM_MONTHS).div_ceil(12) * 12
}

/// Flat simple-interest breakdown, one row per month up to the display horizon.
///
/// Interest for every month is charged on the original principal. Any missing
/// argument yields an empty schedule.
pub fn generate_schedule(
    principal: Option<f64>,
    monthly_rate_percent: Option<f64>,
    term_months: Option<u32>,
) -> Vec<ScheduleRow> {
    let (principal, rate, term) = match (principal, monthly_rate_percent, term_months) {
        (Some(p), Some(r), Some(t)) => (p, r, t),
        _ => return Vec::new(),
    };

    let horizon = display_horizon(term);
    trace!("term {} displays {} months", term, horizon);

    (1..=horizon)
        .map(|month| {
            let row = ScheduleRow::new(principal, rate, month);
            trace!(
                "month {}, interest {}, total {}, payment {}",
                row.month,
                row.interest_amount,
                row.total_amount,
                row.monthly_payment
            );
            row
        })
        .collect()
}

/// Due date of each displayed month, starting at `first_pmt_date` and stepping one
/// calendar month at a time. Days past the end of a shorter month clamp to its last day.
pub fn payment_dates(first_pmt_date: NaiveDate, horizon: u32) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(horizon as usize);
    for offset in 0..horizon {
        match first_pmt_date.checked_add_months(Months::new(offset)) {
            Some(date) => dates.push(date),
            None => {
                warn!("{} + {} months is out of range", first_pmt_date, offset);
                break;
            }
        }
    }
    dates
}

/// An ordered, derived breakdown table.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Schedule {
    rows: Vec<ScheduleRow>,
}

impl Schedule {
    pub fn new(rows: Vec<ScheduleRow>) -> Self {
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for a 1-indexed month.
    pub fn row(&self, month: u32) -> Option<&ScheduleRow> {
        if month == 0 {
            return None;
        }
        self.rows.get(month as usize - 1)
    }

    pub fn row_info(&self, month: u32) -> String {
        match self.row(month) {
            Some(row) => row.to_string(),
            None => "No schedule information.".to_string(),
        }
    }

    pub fn first(&self) -> Option<&ScheduleRow> {
        self.rows.first()
    }

    pub fn last(&self) -> Option<&ScheduleRow> {
        self.rows.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduleRow> {
        self.rows.iter()
    }

    pub fn rows(&self) -> &[ScheduleRow] {
        &self.rows
    }

    pub fn show_breakdown(&self) {
        for row in &self.rows {
            println!("{}", row);
        }
    }
}

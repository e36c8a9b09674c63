use crate::loan::{Schedule, ScheduleRow};
use crate::validate::check_months;
use log::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which breakdown row is shown in the summary.
///
/// Picking a row and editing the term are the same action, so a selection always
/// points at the current term.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MonthSelection {
    #[default]
    Unselected,
    Selected(u32),
}

impl MonthSelection {
    /// Selection that follows a term value; no term means no selection.
    pub fn for_term(term_months: Option<u32>) -> Self {
        match term_months {
            Some(month) => MonthSelection::Selected(month),
            None => MonthSelection::Unselected,
        }
    }

    /// Transition after the term field changed.
    pub fn on_term_changed(self, term_months: Option<u32>) -> Self {
        let next = Self::for_term(term_months);
        trace!("selection {:?} -> {:?} on term change", self, next);
        next
    }

    /// Transition after a row was picked. Returns the new state and the term it implies.
    /// A month outside 1..=360 is not a valid term, so it leaves nothing selected.
    pub fn select_row(self, month: u32) -> (Self, u32) {
        let next = Self::for_term(check_months(month as i64).ok());
        trace!("selection {:?} -> {:?} on row {}", self, next, month);
        (next, month)
    }

    pub fn month(&self) -> Option<u32> {
        match self {
            MonthSelection::Selected(month) => Some(*month),
            MonthSelection::Unselected => None,
        }
    }

    /// Row to summarise: the selected month, else the first row, else nothing.
    pub fn summary_row<'a>(&self, schedule: &'a Schedule) -> Option<&'a ScheduleRow> {
        self.month()
            .and_then(|month| schedule.row(month))
            .or_else(|| schedule.first())
    }
}

use crate::error::LoanResult;
use crate::loan::{generate_schedule, LoanInput, Schedule, ScheduleRow};
use crate::preference::{load_rate, save_rate, PreferenceStore, DEFAULT_RATE};
use crate::selection::MonthSelection;
use crate::validate::{
    field_errors, parse_number, repair_months_on_blur, validate, validate_loan_amount,
    validate_months, validate_rate, Field, FieldError, RawLoanInput,
};
use log::{info, warn};

/// Starting values for a fresh form.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct FormConfig {
    pub default_loan_amount: Option<f64>,
    pub default_months: Option<u32>,
    pub default_rate: f64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            default_loan_amount: None,
            default_months: None,
            default_rate: DEFAULT_RATE,
        }
    }
}

impl FormConfig {
    /// Replace the default rate with a saved one, if the store holds a valid value.
    ///
    /// Store failures fall back to the configured default and come back as a message
    /// for the user.
    pub fn seeded_from<S: PreferenceStore + ?Sized>(self, store: &mut S) -> (Self, Option<String>) {
        match load_rate(store) {
            Ok(Some(rate)) => (
                Self {
                    default_rate: rate,
                    ..self
                },
                None,
            ),
            Ok(None) => (self, None),
            Err(e) => {
                warn!("could not read saved rate, using {}: {}", self.default_rate, e);
                (self, Some(format!("Could not load saved interest rate: {}", e)))
            }
        }
    }
}

/// The active loan form: raw field text, the selected row and the derived schedule.
#[derive(Clone, PartialEq, Debug)]
pub struct LoanForm {
    config: FormConfig,
    raw: RawLoanInput,
    selection: MonthSelection,
    notice: Option<String>,
}

fn text_of<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl LoanForm {
    pub fn new(config: FormConfig) -> Self {
        let raw = RawLoanInput {
            loan_amount: text_of(config.default_loan_amount),
            months: text_of(config.default_months),
            interest_rate_per_month: config.default_rate.to_string(),
        };
        let selection = MonthSelection::for_term(validate_months(&raw.months).ok());
        Self {
            config,
            raw,
            selection,
            notice: None,
        }
    }

    /// Build a form whose default rate is seeded from `store`.
    pub fn with_store<S: PreferenceStore + ?Sized>(config: FormConfig, store: &mut S) -> Self {
        let (config, notice) = config.seeded_from(store);
        Self {
            notice,
            ..Self::new(config)
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn raw(&self) -> &RawLoanInput {
        &self.raw
    }

    pub fn selection(&self) -> MonthSelection {
        self.selection
    }

    /// Pending user notification, cleared once taken.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn set_loan_amount(&mut self, text: &str) {
        self.raw.loan_amount = text.to_string();
    }

    pub fn set_interest_rate(&mut self, text: &str) {
        self.raw.interest_rate_per_month = text.to_string();
    }

    /// Edit the term. The selection follows the new value, or clears when the
    /// term has no valid value.
    pub fn set_months(&mut self, text: &str) {
        self.raw.months = text.to_string();
        self.selection = self.selection.on_term_changed(self.term_months());
    }

    /// Months field lost focus: clamp it into 1..=360.
    pub fn blur_months(&mut self) {
        let repaired = repair_months_on_blur(&self.raw.months);
        if self.raw.months.trim() != repaired.to_string() {
            info!("months {:?} repaired to {}", self.raw.months, repaired);
        }
        self.set_months(&repaired.to_string());
    }

    /// Pick a breakdown row. This also makes its month the loan term.
    pub fn select_month(&mut self, month: u32) {
        let (selection, term) = self.selection.select_row(month);
        self.raw.months = term.to_string();
        self.selection = selection;
    }

    pub fn term_months(&self) -> Option<u32> {
        validate_months(&self.raw.months).ok()
    }

    /// Field errors worth showing to the user.
    pub fn field_errors(&self) -> Vec<FieldError> {
        field_errors(&self.raw)
            .into_iter()
            .filter(FieldError::is_displayed)
            .collect()
    }

    pub fn error_for(&self, field: Field) -> Option<FieldError> {
        self.field_errors().into_iter().find(|e| e.field() == field)
    }

    pub fn input(&self) -> LoanResult<LoanInput> {
        validate(&self.raw)
    }

    /// Breakdown for the current fields. Empty unless every field is valid.
    pub fn schedule(&self) -> Schedule {
        Schedule::new(generate_schedule(
            validate_loan_amount(&self.raw.loan_amount).ok(),
            validate_rate(&self.raw.interest_rate_per_month).ok(),
            self.term_months(),
        ))
    }

    /// Row for the summary panel.
    pub fn summary(&self) -> Option<ScheduleRow> {
        self.selection.summary_row(&self.schedule()).copied()
    }

    /// Remember the current rate as the default for future sessions.
    ///
    /// A rate outside 0.1..=100 never reaches the store. A store failure is kept as a
    /// notice and returned; the in-memory form is left as it is.
    pub fn save_rate<S: PreferenceStore + ?Sized>(&mut self, store: &mut S) -> LoanResult<()> {
        let rate = parse_number(&self.raw.interest_rate_per_month).unwrap_or(f64::NAN);
        match save_rate(store, rate) {
            Ok(()) => {
                self.config.default_rate = rate;
                Ok(())
            }
            Err(e) => {
                warn!("could not save rate: {}", e);
                self.notice = Some(format!("Could not save interest rate: {}", e));
                Err(e)
            }
        }
    }

    /// Back to the configured defaults.
    pub fn reset(&mut self) {
        let notice = self.notice.take();
        *self = Self {
            notice,
            ..Self::new(self.config)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::{FormConfig, LoanForm};
    use crate::error::LoanError;
    use crate::preference::tests::BrokenStore;
    use crate::preference::{MemoryStore, PreferenceStore, DEFAULT_RATE, PREFERENCE_KEY};
    use crate::selection::MonthSelection;
    use crate::validate::{Field, FieldError};
    use pretty_assertions::assert_eq;
    use test_log::test;

    fn filled_form() -> LoanForm {
        let mut form = LoanForm::new(FormConfig::default());
        form.set_loan_amount("1000");
        form.set_months("12");
        form
    }

    #[test]
    fn test_defaults() {
        let form = LoanForm::new(FormConfig::default());
        assert_eq!(form.raw().interest_rate_per_month, "10");
        assert_eq!(form.raw().months, "");
        assert_eq!(form.selection(), MonthSelection::Unselected);
        assert!(form.schedule().is_empty());
        assert!(form.summary().is_none());
        // empty fields are not errors
        assert!(form.field_errors().is_empty());

        let form = LoanForm::new(FormConfig {
            default_loan_amount: Some(5000.),
            default_months: Some(24),
            default_rate: 2.,
        });
        assert_eq!(form.selection(), MonthSelection::Selected(24));
        assert_eq!(form.schedule().row_count(), 24);
    }

    #[test]
    fn test_schedule_follows_input() {
        let mut form = filled_form();
        assert_eq!(form.schedule().row_count(), 12);
        assert_eq!(form.summary().map(|r| r.month), Some(12));

        form.set_months("13");
        assert_eq!(form.schedule().row_count(), 24);
        assert_eq!(form.selection(), MonthSelection::Selected(13));

        form.set_loan_amount("");
        assert!(form.schedule().is_empty());
        assert!(form.input().is_err());
    }

    #[test]
    fn test_cleared_term_falls_back_to_first_row() {
        let mut form = filled_form();
        form.set_months("");
        assert_eq!(form.selection(), MonthSelection::Unselected);
        // no term, so no schedule and nothing to summarise
        assert!(form.summary().is_none());
    }

    #[test]
    fn test_select_month_overwrites_term() {
        let mut form = filled_form();
        form.select_month(7);
        assert_eq!(form.raw().months, "7");
        assert_eq!(form.term_months(), Some(7));
        assert_eq!(form.selection(), MonthSelection::Selected(7));
        assert_eq!(form.summary().map(|r| r.month), Some(7));
        assert_eq!(form.input().unwrap().term_months(), 7);
    }

    #[test]
    fn test_select_month_outside_term_range() {
        let mut form = filled_form();
        form.select_month(0);
        assert_eq!(form.raw().months, "0");
        assert_eq!(form.term_months(), None);
        assert_eq!(form.selection(), MonthSelection::Unselected);
        assert!(form.summary().is_none());

        form.set_months("12");
        form.select_month(361);
        assert_eq!(form.term_months(), None);
        assert_eq!(form.selection(), MonthSelection::Unselected);
        assert!(form.error_for(Field::Months).is_some());
    }

    #[test]
    fn test_blur_repairs_months_only() {
        let mut form = filled_form();
        form.set_months("361");
        assert_eq!(
            form.error_for(Field::Months),
            Some(FieldError::OutOfRange {
                field: Field::Months,
                reason: "must be ≤ 360"
            })
        );
        form.blur_months();
        assert_eq!(form.raw().months, "360");
        assert_eq!(form.selection(), MonthSelection::Selected(360));
        assert!(form.error_for(Field::Months).is_none());

        form.set_months("");
        form.blur_months();
        assert_eq!(form.raw().months, "1");
        assert_eq!(form.schedule().row_count(), 12);

        // other fields keep their bad values
        form.set_interest_rate("0.05");
        form.set_loan_amount("0");
        form.blur_months();
        assert_eq!(form.raw().interest_rate_per_month, "0.05");
        assert_eq!(form.raw().loan_amount, "0");
        assert_eq!(form.field_errors().len(), 2);
        assert!(form.schedule().is_empty());
    }

    #[test]
    fn test_seeded_rate() {
        let mut store = MemoryStore::new();
        store.set(PREFERENCE_KEY, "12.5").unwrap();
        let mut form = LoanForm::with_store(FormConfig::default(), &mut store);
        assert_eq!(form.config().default_rate, 12.5);
        assert_eq!(form.raw().interest_rate_per_month, "12.5");
        assert!(form.take_notice().is_none());
    }

    #[test]
    fn test_save_and_reload_rate() {
        let mut store = MemoryStore::new();
        let mut form = filled_form();
        form.set_interest_rate("12.5");
        form.save_rate(&mut store).unwrap();

        let reloaded = LoanForm::with_store(FormConfig::default(), &mut store);
        assert_eq!(reloaded.config().default_rate, 12.5);

        form.set_interest_rate("150");
        assert!(matches!(
            form.save_rate(&mut store),
            Err(LoanError::RateOutOfRange(_))
        ));
        assert_eq!(
            store.get(PREFERENCE_KEY).unwrap(),
            Some("12.5".to_string())
        );
    }

    #[test]
    fn test_store_failures_are_not_fatal() {
        let mut form = LoanForm::with_store(FormConfig::default(), &mut BrokenStore);
        assert_eq!(form.config().default_rate, DEFAULT_RATE);
        assert!(form.take_notice().is_some());
        assert!(form.take_notice().is_none());

        form.set_loan_amount("1000");
        form.set_months("12");
        assert!(form.save_rate(&mut BrokenStore).is_err());
        assert!(form.take_notice().is_some());
        // the form still works on its in-memory values
        assert_eq!(form.schedule().row_count(), 12);
        assert_eq!(form.config().default_rate, DEFAULT_RATE);
    }

    #[test]
    fn test_reset() {
        let mut form = filled_form();
        form.set_interest_rate("3");
        form.reset();
        assert_eq!(form, LoanForm::new(FormConfig::default()));
    }
}

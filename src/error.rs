use crate::validate::FieldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanError {
    #[error("Invalid input: {}", join_errors(.0))]
    Invalid(Vec<FieldError>),

    #[error("Rate {0} is outside the accepted range 0.1..=100")]
    RateOutOfRange(f64),

    #[error("Preference store error: {0}")]
    Store(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for LoanError {
    fn from(e: serde_json::Error) -> Self {
        LoanError::Serialization(e.to_string())
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type LoanResult<T> = Result<T, LoanError>;

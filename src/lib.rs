pub mod error;
pub mod form;
pub mod format;
pub mod loan;
pub mod preference;
pub mod selection;
pub mod validate;

//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`InvalidFilter`] returned when caller supplied query parameters are
//!   malformed (month out of range, empty category, ...).
//! - [`InvalidAmount`] returned for negative amounts and for totals that do
//!   not fit in `i64` cents.
//! - [`KeyNotFound`] returned when a record does not exist *or* belongs to
//!   another owner. The two cases are indistinguishable on purpose.
//! - [`Database`] returned when the underlying store fails.
//!
//!  [`InvalidFilter`]: EngineError::InvalidFilter
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidFilter(a), Self::InvalidFilter(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

use std::result::Result as StdResult;

use thiserror::Error;

use crate::domain::BudgetWindow;

/// Unified error type for the domain, store, and storage layers.
#[derive(Error, Debug)]
pub enum ExpenseError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("No owner connected")]
    NotAuthenticated,
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("{window} budget limit is zero; cannot compute utilisation")]
    DivideByZeroConfig { window: BudgetWindow },
    #[error("Ledger submission failed: {0}")]
    Submission(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, ExpenseError>;

impl ExpenseError {
    pub fn validation(message: impl Into<String>) -> Self {
        ExpenseError::Validation(message.into())
    }

    /// True when the error rejected input before any state was touched.
    pub fn is_validation(&self) -> bool {
        matches!(self, ExpenseError::Validation(_))
    }
}

impl From<std::io::Error> for ExpenseError {
    fn from(err: std::io::Error) -> Self {
        ExpenseError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for ExpenseError {
    fn from(err: serde_json::Error) -> Self {
        ExpenseError::Persistence(err.to_string())
    }
}

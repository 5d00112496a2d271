use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),
    #[error("Expense id `{0}` is ambiguous; type more characters")]
    AmbiguousId(String),
    #[error("Invalid date bound `{0}` (expected YYYY-MM-DD)")]
    InvalidDateBound(String),
    #[error("No expenses to export")]
    NothingToExport,
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<csv::Error> for CoreError {
    fn from(err: csv::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}

//! expense-core
//!
//! Business logic for the expense tracker: aggregation, filtering, trend
//! binning, validation and export. Depends on expense-domain. No CLI, no
//! terminal I/O; persistence is reached only through [`storage::ExpenseStore`].

pub mod error;
pub mod expense_service;
pub mod export_service;
pub mod filter_service;
pub mod format;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod trend_service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use error::CoreError;
pub use expense_service::*;
pub use export_service::*;
pub use filter_service::*;
pub use summary_service::*;
pub use time::Clock;
pub use trend_service::*;
pub use validation::*;

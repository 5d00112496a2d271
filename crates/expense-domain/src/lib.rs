//! expense-domain
//!
//! Pure domain models (Expense, Category, summaries, trend buckets).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod category;
pub mod common;
pub mod expense;
pub mod summary;

pub use category::*;
pub use common::*;
pub use expense::*;
pub use summary::*;

//! Expense Tracker records day-to-day spending and turns it into summaries,
//! monthly trends, filtered listings, and CSV exports from a local shell.
//!
//! The binary is a thin wrapper: call [`init`] once, then [`run_cli`].

pub mod cli;
pub mod errors;
pub mod utils;

pub use cli::{run_cli, CliMode, ShellContext};
pub use errors::CliError;

/// Installs the tracing subscriber. Safe to call more than once.
pub fn init() {
    if utils::init_tracing() {
        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            "expense tracker starting"
        );
    }
}

//! expense-config
//!
//! Persistent user preferences for the expense tracker shell.
//! Owns the Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{ConfigBackup, ConfigManager};
pub use model::{Config, ConfigKey};

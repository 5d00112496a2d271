use expense_domain::{SortDirection, SortKey};
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};

use crate::ConfigError;

/// Stores user-configurable shell preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub plain_output: bool,
    #[serde(default)]
    pub default_sort_key: SortKey,
    #[serde(default)]
    pub default_sort_direction: SortDirection,
    /// Number of expense backups kept; the store default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_retention: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom data directory. Defaults to `~/.expense_tracker`.
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            plain_output: false,
            default_sort_key: SortKey::default(),
            default_sort_direction: SortDirection::default(),
            backup_retention: None,
            data_root: None,
        }
    }
}

impl Config {
    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_data_root(&self) -> PathBuf {
        if let Some(path) = &self.data_root {
            return path.clone();
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".expense_tracker")
    }

    /// Current value of `key`, rendered the way `set` accepts it.
    pub fn get(&self, key: ConfigKey) -> String {
        match key {
            ConfigKey::Locale => self.locale.clone(),
            ConfigKey::Currency => self.currency.clone(),
            ConfigKey::Color => on_off(self.ui_color_enabled).into(),
            ConfigKey::Plain => on_off(self.plain_output).into(),
            ConfigKey::Sort => self.default_sort_key.to_string(),
            ConfigKey::Order => self.default_sort_direction.to_string(),
            ConfigKey::Retention => self
                .backup_retention
                .map(|count| count.to_string())
                .unwrap_or_else(|| "default".into()),
        }
    }

    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: key.name(),
            value: value.to_string(),
            reason,
        };
        match key {
            ConfigKey::Locale => {
                if value.is_empty() {
                    return Err(invalid("locale cannot be empty".into()));
                }
                self.locale = value.to_string();
            }
            ConfigKey::Currency => {
                if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(invalid("expected a three-letter currency code".into()));
                }
                self.currency = value.to_ascii_uppercase();
            }
            ConfigKey::Color => {
                self.ui_color_enabled = parse_switch(value).ok_or_else(|| invalid(SWITCH_HINT.into()))?
            }
            ConfigKey::Plain => {
                self.plain_output = parse_switch(value).ok_or_else(|| invalid(SWITCH_HINT.into()))?
            }
            ConfigKey::Sort => {
                self.default_sort_key = value.parse().map_err(|err| invalid(format!("{err}")))?
            }
            ConfigKey::Order => {
                self.default_sort_direction =
                    value.parse().map_err(|err| invalid(format!("{err}")))?
            }
            ConfigKey::Retention => {
                self.backup_retention = if value.eq_ignore_ascii_case("default") {
                    None
                } else {
                    match value.parse::<usize>() {
                        Ok(count) if count >= 1 => Some(count),
                        _ => return Err(invalid("expected a whole number of at least 1".into())),
                    }
                };
            }
        }
        Ok(())
    }

    /// All settable keys with their current values, in display order.
    pub fn entries(&self) -> Vec<(ConfigKey, String)> {
        ConfigKey::ALL.iter().map(|key| (*key, self.get(*key))).collect()
    }
}

const SWITCH_HINT: &str = "expected on/off";

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Keys accepted by `config set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Locale,
    Currency,
    Color,
    Plain,
    Sort,
    Order,
    Retention,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 7] = [
        ConfigKey::Locale,
        ConfigKey::Currency,
        ConfigKey::Color,
        ConfigKey::Plain,
        ConfigKey::Sort,
        ConfigKey::Order,
        ConfigKey::Retention,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConfigKey::Locale => "locale",
            ConfigKey::Currency => "currency",
            ConfigKey::Color => "color",
            ConfigKey::Plain => "plain",
            ConfigKey::Sort => "sort",
            ConfigKey::Order => "order",
            ConfigKey::Retention => "retention",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase();
        ConfigKey::ALL
            .iter()
            .copied()
            .find(|key| key.name() == needle)
            .ok_or_else(|| ConfigError::UnknownKey(value.trim().to_string()))
    }
}

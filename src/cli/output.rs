use colored::Colorize;
use std::fmt;
use std::sync::{OnceLock, RwLock};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
    Separator,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputPreferences {
    /// Drops icons and box-drawing glyphs as well as color.
    pub plain_mode: bool,
    pub color_enabled: bool,
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self {
            plain_mode: false,
            color_enabled: true,
        }
    }
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

pub fn set_preferences(prefs: OutputPreferences) {
    let lock = PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()));
    if let Ok(mut guard) = lock.write() {
        *guard = prefs;
    }
    if prefs.color_enabled && !prefs.plain_mode {
        colored::control::unset_override();
    } else {
        colored::control::set_override(false);
    }
}

pub fn current_preferences() -> OutputPreferences {
    PREFERENCES
        .get_or_init(|| RwLock::new(OutputPreferences::default()))
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

fn build_label(kind: MessageKind, plain: bool) -> &'static str {
    match (kind, plain) {
        (MessageKind::Success, false) => "✓",
        (MessageKind::Warning, false) => "!",
        (MessageKind::Error, false) => "✗",
        (MessageKind::Hint, false) => "›",
        (MessageKind::Success, true) => "OK:",
        (MessageKind::Warning, true) => "WARNING:",
        (MessageKind::Error, true) => "ERROR:",
        (MessageKind::Hint, true) => "HINT:",
        _ => "",
    }
}

pub(crate) fn apply_style(
    kind: MessageKind,
    message: impl fmt::Display,
    prefs: &OutputPreferences,
) -> String {
    let text = message.to_string();

    let formatted = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        MessageKind::Separator => {
            let ch = if prefs.plain_mode { "-" } else { "─" };
            ch.repeat(40)
        }
        _ => {
            let label = build_label(kind, prefs.plain_mode);
            if label.is_empty() {
                text
            } else {
                format!("{label} {text}")
            }
        }
    };

    if prefs.plain_mode || !prefs.color_enabled {
        return formatted;
    }

    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Hint => formatted.bright_cyan().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Separator => formatted.dimmed().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let prefs = current_preferences();
    let formatted = apply_style(kind, message, &prefs);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

pub fn separator() {
    print(MessageKind::Separator, "");
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: OutputPreferences = OutputPreferences {
        plain_mode: true,
        color_enabled: false,
    };

    #[test]
    fn plain_mode_uses_words_instead_of_icons() {
        assert_eq!(apply_style(MessageKind::Error, "boom", &PLAIN), "ERROR: boom");
        assert_eq!(apply_style(MessageKind::Info, "note", &PLAIN), "note");
        assert_eq!(apply_style(MessageKind::Section, " Summary ", &PLAIN), "=== Summary ===");
        assert_eq!(apply_style(MessageKind::Separator, "", &PLAIN), "-".repeat(40));
    }

    #[test]
    fn uncolored_rich_mode_keeps_icons() {
        let prefs = OutputPreferences {
            plain_mode: false,
            color_enabled: false,
        };
        assert_eq!(apply_style(MessageKind::Success, "saved", &prefs), "✓ saved");
    }
}

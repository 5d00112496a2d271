use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use expense_domain::Category;

use crate::cli::core::CommandError;
use crate::cli::output;

pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

pub fn print_warning(message: impl fmt::Display) {
    output::warning(message);
}

pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

pub fn print_success(message: impl fmt::Display) {
    output::success(message);
}

pub fn print_hint(message: impl fmt::Display) {
    output::hint(message);
}

/// Yes/no question; Enter picks `default`.
pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    Ok(Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Free-form line of text, prefilled with `initial`. Empty answers are
/// returned as-is so the validator can report them.
pub fn prompt_text(
    theme: &ColorfulTheme,
    prompt: &str,
    initial: &str,
) -> Result<String, CommandError> {
    Ok(Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?)
}

/// Arrow-key category picker. Starts on `current` when it names a category,
/// otherwise on the default category.
pub fn select_category(
    theme: &ColorfulTheme,
    prompt: &str,
    current: &str,
) -> Result<String, CommandError> {
    let start = current
        .parse::<Category>()
        .unwrap_or_default()
        .index();
    let names: Vec<&str> = Category::ALL.iter().map(|category| category.name()).collect();
    let picked = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&names)
        .default(start)
        .interact()?;
    Ok(names[picked].to_string())
}

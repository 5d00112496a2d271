//! Field rules applied to drafts before they become records.

use std::fmt;

use chrono::NaiveDate;
use expense_domain::{Category, ExpenseDetails, ExpenseDraft};

pub const MAX_AMOUNT: f64 = 1_000_000.0;
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// Per-field validation messages. A field is valid when its entry is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub date: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl ValidationErrors {
    /// `(field, message)` pairs in form order.
    pub fn messages(&self) -> Vec<(&'static str, &str)> {
        [
            ("date", &self.date),
            ("amount", &self.amount),
            ("category", &self.category),
            ("description", &self.description),
        ]
        .into_iter()
        .filter_map(|(field, message)| message.as_deref().map(|text| (field, text)))
        .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .messages()
            .into_iter()
            .map(|(_, message)| message)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}

/// Checks every field of `draft`, collecting all failures at once.
///
/// `today` is the latest acceptable expense date.
pub fn validate_draft(
    draft: &ExpenseDraft,
    today: NaiveDate,
) -> Result<ExpenseDetails, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let date = match check_date(&draft.date, today) {
        Ok(date) => Some(date),
        Err(message) => {
            errors.date = Some(message);
            None
        }
    };
    let amount = match check_amount(&draft.amount) {
        Ok(amount) => Some(amount),
        Err(message) => {
            errors.amount = Some(message);
            None
        }
    };
    let category = match check_category(&draft.category) {
        Ok(category) => Some(category),
        Err(message) => {
            errors.category = Some(message);
            None
        }
    };
    let description = match check_description(&draft.description) {
        Ok(description) => Some(description),
        Err(message) => {
            errors.description = Some(message);
            None
        }
    };

    match (date, amount, category, description) {
        (Some(date), Some(amount), Some(category), Some(description)) => Ok(ExpenseDetails {
            date,
            amount,
            category,
            description,
        }),
        _ => Err(errors),
    }
}

fn check_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Date is required".into());
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| "Date must be a valid date (YYYY-MM-DD)".to_string())?;
    if date > today {
        return Err("Date cannot be in the future".into());
    }
    Ok(date)
}

fn check_amount(raw: &str) -> Result<f64, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Amount is required".into());
    }
    let amount: f64 = raw
        .parse()
        .ok()
        .filter(|value: &f64| value.is_finite())
        .ok_or_else(|| "Amount must be a valid number".to_string())?;
    if amount <= 0.0 {
        return Err("Amount must be greater than zero".into());
    }
    if amount > MAX_AMOUNT {
        return Err("Amount seems unreasonably large".into());
    }
    Ok(amount)
}

fn check_category(raw: &str) -> Result<Category, String> {
    if raw.trim().is_empty() {
        return Err("Category is required".into());
    }
    raw.parse::<Category>()
        .map_err(|_| format!("Category must be one of: {}", Category::names()))
}

fn check_description(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Description is required".into());
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(format!(
            "Description must be {MAX_DESCRIPTION_CHARS} characters or fewer"
        ));
    }
    Ok(trimmed.to_string())
}

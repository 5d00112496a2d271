//! Domain models for recorded expenses and the drafts they are built from.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::Category;

/// A single recorded expense.
///
/// Records are replaced wholesale on edit; `id` and `created_at` never change
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub date: NaiveDate,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Builds a brand new record with a fresh identifier.
    pub fn new(details: ExpenseDetails, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: details.date,
            amount: details.amount,
            category: details.category,
            description: details.description,
            created_at,
        }
    }

    /// Returns a replacement record carrying new field values under the same
    /// identity.
    pub fn replaced_with(&self, details: ExpenseDetails) -> Self {
        Self {
            id: self.id,
            date: details.date,
            amount: details.amount,
            category: details.category,
            description: details.description,
            created_at: self.created_at,
        }
    }

    /// Current field values, as accepted by the validator.
    pub fn details(&self) -> ExpenseDetails {
        ExpenseDetails {
            date: self.date,
            amount: self.amount,
            category: self.category,
            description: self.description.clone(),
        }
    }

    /// First eight characters of the identifier, used in listings.
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}

/// Field values that passed validation and can become a record.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDetails {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: Category,
    pub description: String,
}

/// Raw user input, exactly as typed, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub date: String,
    pub amount: String,
    pub category: String,
    pub description: String,
}

impl ExpenseDraft {
    pub fn new(
        date: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            amount: amount.into(),
            category: category.into(),
            description: description.into(),
        }
    }

    /// Pre-fills a draft from an existing record, for editing.
    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            date: expense.date.format("%Y-%m-%d").to_string(),
            amount: expense.amount.to_string(),
            category: expense.category.name().to_string(),
            description: expense.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn details() -> ExpenseDetails {
        ExpenseDetails {
            date: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            amount: 20.0,
            category: Category::Food,
            description: "Lunch".into(),
        }
    }

    #[test]
    fn replacement_keeps_identity_and_creation_time() {
        let created = Utc.with_ymd_and_hms(2024, 2, 10, 12, 0, 0).unwrap();
        let original = Expense::new(details(), created);
        let mut changed = details();
        changed.amount = 35.5;
        changed.category = Category::Bills;

        let replaced = original.replaced_with(changed);

        assert_eq!(replaced.id, original.id);
        assert_eq!(replaced.created_at, created);
        assert_eq!(replaced.amount, 35.5);
        assert_eq!(replaced.category, Category::Bills);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let created = Utc.with_ymd_and_hms(2024, 2, 10, 12, 0, 0).unwrap();
        let expense = Expense::new(details(), created);
        let json = serde_json::to_string(&expense).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"date\":\"2024-02-10\""));

        let back: Expense = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expense);
    }

    #[test]
    fn draft_from_expense_uses_plain_amount_text() {
        let created = Utc.with_ymd_and_hms(2024, 2, 10, 12, 0, 0).unwrap();
        let expense = Expense::new(details(), created);
        let draft = ExpenseDraft::from_expense(&expense);
        assert_eq!(draft.amount, "20");
        assert_eq!(draft.date, "2024-02-10");
        assert_eq!(draft.category, "Food");
        assert_eq!(expense.short_id().len(), 8);
    }
}

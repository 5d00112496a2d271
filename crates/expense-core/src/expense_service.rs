//! Business logic helpers for managing the expense list.
//!
//! Every operation takes the current list by reference and returns a new
//! list; callers decide when to persist it.

use chrono::{DateTime, Utc};
use expense_domain::{Expense, ExpenseDetails};
use tracing::info;
use uuid::Uuid;

use crate::CoreError;

/// Provides CRUD helpers over a snapshot of expenses.
pub struct ExpenseService;

impl ExpenseService {
    /// Turns validated details into a new record stamped with `now`.
    pub fn create(details: ExpenseDetails, now: DateTime<Utc>) -> Expense {
        Expense::new(details, now)
    }

    /// Appends `expense`, returning the new list.
    pub fn add(records: &[Expense], expense: Expense) -> Vec<Expense> {
        info!(id = %expense.id, amount = expense.amount, "expense added");
        let mut updated = records.to_vec();
        updated.push(expense);
        updated
    }

    /// Replaces the record identified by `id` with `details`, keeping its
    /// identity and creation timestamp.
    pub fn update(
        records: &[Expense],
        id: Uuid,
        details: ExpenseDetails,
    ) -> Result<Vec<Expense>, CoreError> {
        let position = Self::position(records, id)?;
        let mut updated = records.to_vec();
        updated[position] = records[position].replaced_with(details);
        info!(%id, "expense updated");
        Ok(updated)
    }

    /// Removes the record identified by `id`.
    pub fn remove(records: &[Expense], id: Uuid) -> Result<Vec<Expense>, CoreError> {
        Self::position(records, id)?;
        info!(%id, "expense removed");
        Ok(records
            .iter()
            .filter(|expense| expense.id != id)
            .cloned()
            .collect())
    }

    pub fn find(records: &[Expense], id: Uuid) -> Option<&Expense> {
        records.iter().find(|expense| expense.id == id)
    }

    /// Resolves a full identifier or a unique prefix of its hex form.
    pub fn resolve_id(records: &[Expense], needle: &str) -> Result<Uuid, CoreError> {
        let needle = needle.trim().to_ascii_lowercase();
        if let Ok(id) = Uuid::parse_str(&needle) {
            return Self::find(records, id)
                .map(|expense| expense.id)
                .ok_or(CoreError::ExpenseNotFound(needle));
        }
        let compact = needle.replace('-', "");
        if compact.is_empty() {
            return Err(CoreError::ExpenseNotFound(needle));
        }
        let mut matches = records
            .iter()
            .filter(|expense| expense.id.simple().to_string().starts_with(&compact));
        match (matches.next(), matches.next()) {
            (Some(expense), None) => Ok(expense.id),
            (Some(_), Some(_)) => Err(CoreError::AmbiguousId(needle)),
            (None, _) => Err(CoreError::ExpenseNotFound(needle)),
        }
    }

    fn position(records: &[Expense], id: Uuid) -> Result<usize, CoreError> {
        records
            .iter()
            .position(|expense| expense.id == id)
            .ok_or_else(|| CoreError::ExpenseNotFound(id.to_string()))
    }
}

use std::sync::RwLock;

use expense_domain::Expense;
use tracing::warn;
use uuid::Uuid;

use crate::CoreError;

/// Abstraction over persistence backends holding the full expense list.
///
/// The provided mutators follow a load, modify, save cycle and are not atomic
/// across processes.
pub trait ExpenseStore: Send + Sync {
    /// Returns every stored expense; an empty store yields an empty list.
    fn load(&self) -> Result<Vec<Expense>, CoreError>;

    /// Replaces the stored list with `expenses`.
    fn save(&self, expenses: &[Expense]) -> Result<(), CoreError>;

    fn add(&self, expense: Expense) -> Result<Vec<Expense>, CoreError> {
        let mut expenses = self.load()?;
        expenses.push(expense);
        self.save(&expenses)?;
        Ok(expenses)
    }

    fn update(&self, expense: Expense) -> Result<Vec<Expense>, CoreError> {
        let mut expenses = self.load()?;
        let slot = expenses
            .iter_mut()
            .find(|stored| stored.id == expense.id)
            .ok_or_else(|| CoreError::ExpenseNotFound(expense.id.to_string()))?;
        *slot = expense;
        self.save(&expenses)?;
        Ok(expenses)
    }

    fn delete(&self, id: Uuid) -> Result<Vec<Expense>, CoreError> {
        let mut expenses = self.load()?;
        let before = expenses.len();
        expenses.retain(|stored| stored.id != id);
        if expenses.len() == before {
            return Err(CoreError::ExpenseNotFound(id.to_string()));
        }
        self.save(&expenses)?;
        Ok(expenses)
    }
}

/// Loads the stored list, falling back to an empty list when the store
/// cannot be read.
pub fn load_or_empty(store: &dyn ExpenseStore) -> Vec<Expense> {
    match store.load() {
        Ok(expenses) => expenses,
        Err(err) => {
            warn!(error = %err, "could not load expenses; starting with an empty list");
            Vec::new()
        }
    }
}

/// Volatile store, mainly for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryExpenseStore {
    expenses: RwLock<Vec<Expense>>,
}

impl MemoryExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expenses(expenses: Vec<Expense>) -> Self {
        Self {
            expenses: RwLock::new(expenses),
        }
    }
}

impl ExpenseStore for MemoryExpenseStore {
    fn load(&self) -> Result<Vec<Expense>, CoreError> {
        self.expenses
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))
    }

    fn save(&self, expenses: &[Expense]) -> Result<(), CoreError> {
        let mut guard = self
            .expenses
            .write()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        *guard = expenses.to_vec();
        Ok(())
    }
}

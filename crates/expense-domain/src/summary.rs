//! Derived reporting structures. Recomputed on demand, never persisted.

use serde::{Deserialize, Serialize};

use crate::category::Category;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// One slice of the category breakdown.
pub struct CategoryBreakdown {
    pub category: Category,
    pub amount: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Dashboard level totals for a list of expenses.
pub struct ExpenseSummary {
    pub total_spending: f64,
    pub monthly_spending: f64,
    pub average_expense: f64,
    pub expense_count: usize,
    pub category_breakdown: Vec<CategoryBreakdown>,
}

impl ExpenseSummary {
    pub fn empty() -> Self {
        Self {
            total_spending: 0.0,
            monthly_spending: 0.0,
            average_expense: 0.0,
            expense_count: 0,
            category_breakdown: Vec::new(),
        }
    }

    /// Category with the largest share, if anything was spent.
    pub fn top_category(&self) -> Option<&CategoryBreakdown> {
        self.category_breakdown.first()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Spending aggregated over one calendar month.
pub struct TrendBucket {
    /// Zero padded `YYYY-MM`; sorts the same way as the calendar.
    pub month_key: String,
    /// Presentation label such as `Feb 2024`.
    pub label: String,
    pub total_amount: f64,
    pub count: usize,
}

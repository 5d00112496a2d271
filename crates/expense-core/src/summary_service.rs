use chrono::{Datelike, NaiveDate};
use expense_domain::{Category, CategoryBreakdown, Expense, ExpenseSummary};
use tracing::debug;

/// Computes dashboard totals from a snapshot of expenses.
pub struct SummaryService;

impl SummaryService {
    /// Summarizes `records`, treating the calendar month of `reference` as
    /// "this month".
    pub fn summarize(records: &[Expense], reference: NaiveDate) -> ExpenseSummary {
        let mut per_category = [0.0_f64; Category::ALL.len()];
        let mut total_spending = 0.0;
        let mut monthly_spending = 0.0;

        for expense in records {
            total_spending += expense.amount;
            per_category[expense.category.index()] += expense.amount;
            if same_month(expense.date, reference) {
                monthly_spending += expense.amount;
            }
        }

        let expense_count = records.len();
        let average_expense = if expense_count > 0 {
            total_spending / expense_count as f64
        } else {
            0.0
        };

        let category_breakdown = breakdown(&per_category, total_spending);
        debug!(
            expense_count,
            total_spending,
            categories = category_breakdown.len(),
            "summarized expenses"
        );

        ExpenseSummary {
            total_spending,
            monthly_spending,
            average_expense,
            expense_count,
            category_breakdown,
        }
    }

    /// Sum of every record filed under `category`.
    pub fn category_total(records: &[Expense], category: Category) -> f64 {
        records
            .iter()
            .filter(|expense| expense.category == category)
            .map(|expense| expense.amount)
            .sum()
    }
}

fn same_month(date: NaiveDate, reference: NaiveDate) -> bool {
    date.year() == reference.year() && date.month() == reference.month()
}

fn breakdown(per_category: &[f64], total: f64) -> Vec<CategoryBreakdown> {
    let mut rows: Vec<CategoryBreakdown> = Category::ALL
        .iter()
        .zip(per_category)
        .filter(|(_, amount)| amount.abs() > 0.0)
        .map(|(category, amount)| CategoryBreakdown {
            category: *category,
            amount: *amount,
            percentage: if total > 0.0 {
                amount / total * 100.0
            } else {
                0.0
            },
        })
        .collect();
    // Stable, so equal amounts stay in canonical category order.
    rows.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    rows
}

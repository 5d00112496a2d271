//! Presentation seam: front ends decide how money, dates and shares look.

use chrono::NaiveDate;
use expense_domain::Expense;

/// Renders expense values for display.
pub trait ExpenseFormatter: Send + Sync {
    /// Amount in the active currency.
    fn amount(&self, value: f64) -> String;

    fn date(&self, date: NaiveDate) -> String;

    /// Share of a total given in percent, one decimal place.
    fn percentage(&self, value: f64) -> String {
        format!("{value:.1}%")
    }

    /// `<short id> · <amount> <category> on <date>: <description>`
    fn expense_line(&self, expense: &Expense) -> String {
        format!(
            "{} · {} {} on {}: {}",
            expense.short_id(),
            self.amount(expense.amount),
            expense.category,
            self.date(expense.date),
            expense.description
        )
    }
}

/// ISO dates and bare two-decimal amounts, as written to CSV.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainFormatter;

impl ExpenseFormatter for PlainFormatter {
    fn amount(&self, value: f64) -> String {
        format!("{value:.2}")
    }

    fn date(&self, date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use expense_domain::{Category, ExpenseDetails};

    #[test]
    fn plain_formatter_is_locale_free() {
        let fmt = PlainFormatter;
        assert_eq!(fmt.amount(1234.5), "1234.50");
        assert_eq!(fmt.date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()), "2024-01-05");
        assert_eq!(fmt.percentage(85.714), "85.7%");
    }

    #[test]
    fn expense_line_uses_the_formatter() {
        let expense = Expense::new(
            ExpenseDetails {
                date: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
                amount: 5.0,
                category: Category::Bills,
                description: "Phone".into(),
            },
            Utc.with_ymd_and_hms(2024, 2, 15, 9, 0, 0).unwrap(),
        );
        let line = PlainFormatter.expense_line(&expense);
        assert!(line.starts_with(&expense.short_id()));
        assert!(line.ends_with("5.00 Bills on 2024-02-15: Phone"));
    }
}

//! Multi-criteria filtering and stable ordering of expense listings.

use std::{cmp::Ordering, fmt, str::FromStr};

use chrono::NaiveDate;
use expense_domain::{Category, Expense, ParseEnumError, SortDirection, SortKey};
use tracing::debug;

use crate::CoreError;

/// Category criterion; `All` disables category filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(expected) => expected == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Only(category) => write!(f, "{category}"),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        value.parse().map(CategoryFilter::Only)
    }
}

/// Filter criteria. Every criterion is optional; present ones are ANDed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    pub category: CategoryFilter,
    /// Inclusive lower bound.
    pub start: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub end: Option<NaiveDate>,
    pub search: Option<String>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn with_start(mut self, start: Option<NaiveDate>) -> Self {
        self.start = start;
        self
    }

    pub fn with_end(mut self, end: Option<NaiveDate>) -> Self {
        self.end = end;
        self
    }

    /// Sets the lower bound from text; empty text clears it.
    pub fn with_start_str(self, raw: Option<&str>) -> Result<Self, CoreError> {
        let start = parse_date_bound(raw)?;
        Ok(self.with_start(start))
    }

    /// Sets the upper bound from text; empty text clears it.
    pub fn with_end_str(self, raw: Option<&str>) -> Result<Self, CoreError> {
        let end = parse_date_bound(raw)?;
        Ok(self.with_end(end))
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = if term.trim().is_empty() {
            None
        } else {
            Some(term)
        };
        self
    }

    pub fn is_empty(&self) -> bool {
        self.category == CategoryFilter::All
            && self.start.is_none()
            && self.end.is_none()
            && self.search.is_none()
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        if !self.category.matches(expense.category) {
            return false;
        }
        if let Some(start) = self.start {
            if expense.date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if expense.date > end {
                return false;
            }
        }
        match self.search.as_deref() {
            Some(term) => matches_search(expense, term),
            None => true,
        }
    }
}

/// Parses an optional `YYYY-MM-DD` bound.
///
/// Absent or blank input means "unbounded"; anything else that fails to
/// parse is reported instead of silently matching everything or nothing.
pub fn parse_date_bound(raw: Option<&str>) -> Result<Option<NaiveDate>, CoreError> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| CoreError::InvalidDateBound(value.to_string()))
}

fn matches_search(expense: &Expense, term: &str) -> bool {
    let needle = term.to_lowercase();
    expense.description.to_lowercase().contains(&needle)
        || expense.category.name().to_lowercase().contains(&needle)
        || expense.amount.to_string().contains(&needle)
}

/// Applies [`ExpenseFilter`] criteria and orders the result.
pub struct FilterService;

impl FilterService {
    /// Returns the records accepted by `filter`, in input order.
    pub fn filter(records: &[Expense], filter: &ExpenseFilter) -> Vec<Expense> {
        let matched: Vec<Expense> = records
            .iter()
            .filter(|expense| filter.matches(expense))
            .cloned()
            .collect();
        debug!(
            input = records.len(),
            matched = matched.len(),
            "filtered expenses"
        );
        matched
    }

    /// Returns a new, stably sorted sequence; records with equal keys keep
    /// their relative order in either direction.
    pub fn sort(records: &[Expense], key: SortKey, direction: SortDirection) -> Vec<Expense> {
        let mut sorted = records.to_vec();
        sorted.sort_by(|a, b| {
            let ordering = compare(a, b, key);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        sorted
    }

    pub fn filter_and_sort(
        records: &[Expense],
        filter: &ExpenseFilter,
        key: SortKey,
        direction: SortDirection,
    ) -> Vec<Expense> {
        Self::sort(&Self::filter(records, filter), key, direction)
    }
}

fn compare(a: &Expense, b: &Expense, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::Amount => a.amount.total_cmp(&b.amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use expense_domain::ExpenseDetails;

    fn expense(date: (i32, u32, u32), amount: f64, category: Category, text: &str) -> Expense {
        Expense::new(
            ExpenseDetails {
                date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
                amount,
                category,
                description: text.into(),
            },
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        )
    }

    fn scenario() -> Vec<Expense> {
        vec![
            expense((2024, 1, 5), 10.0, Category::Food, "Groceries"),
            expense((2024, 2, 10), 20.0, Category::Food, "Dinner out"),
            expense((2024, 2, 15), 5.0, Category::Bills, "Phone top-up"),
        ]
    }

    fn amounts(records: &[Expense]) -> Vec<f64> {
        records.iter().map(|e| e.amount).collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn category_filter_returns_only_matching_records() {
        let records = scenario();
        let filter = ExpenseFilter::new().with_category("Bills".parse().unwrap());
        let result = FilterService::filter(&records, &filter);
        assert_eq!(result, vec![records[2].clone()]);
    }

    #[test]
    fn all_sentinel_disables_category_filter() {
        let filter = ExpenseFilter::new().with_category("all".parse().unwrap());
        assert_eq!(FilterService::filter(&scenario(), &filter).len(), 3);
    }

    #[test]
    fn search_matches_amount_text() {
        let records = scenario();
        let filter = ExpenseFilter::new().with_search("20");
        let result = FilterService::filter(&records, &filter);
        assert_eq!(result, vec![records[1].clone()]);
    }

    #[test]
    fn search_is_case_insensitive_over_description_and_category() {
        let records = scenario();
        let by_description = ExpenseFilter::new().with_search("DINNER");
        assert_eq!(FilterService::filter(&records, &by_description).len(), 1);

        let by_category = ExpenseFilter::new().with_search("foo");
        assert_eq!(FilterService::filter(&records, &by_category).len(), 2);
    }

    #[test]
    fn blank_search_is_ignored() {
        let filter = ExpenseFilter::new().with_search("   ");
        assert!(filter.is_empty());
        assert_eq!(FilterService::filter(&scenario(), &filter).len(), 3);
    }

    #[test]
    fn date_range_is_inclusive_on_both_sides() {
        let filter = ExpenseFilter::new()
            .with_start(Some(date(2024, 2, 10)))
            .with_end(Some(date(2024, 2, 15)));
        assert_eq!(amounts(&FilterService::filter(&scenario(), &filter)), vec![20.0, 5.0]);
    }

    #[test]
    fn open_ended_ranges() {
        let from_feb = ExpenseFilter::new().with_start(Some(date(2024, 2, 1)));
        assert_eq!(FilterService::filter(&scenario(), &from_feb).len(), 2);

        let until_jan = ExpenseFilter::new().with_end(Some(date(2024, 1, 31)));
        assert_eq!(amounts(&FilterService::filter(&scenario(), &until_jan)), vec![10.0]);
    }

    #[test]
    fn malformed_bound_is_an_error_not_an_empty_result() {
        let err = ExpenseFilter::new()
            .with_start_str(Some("2024-13-40"))
            .expect_err("bad bound must fail");
        assert!(matches!(err, CoreError::InvalidDateBound(ref raw) if raw == "2024-13-40"));

        let cleared = ExpenseFilter::new().with_end_str(Some("  ")).unwrap();
        assert_eq!(cleared.end, None);
    }

    #[test]
    fn criteria_combine_with_and() {
        let filter = ExpenseFilter::new()
            .with_category(CategoryFilter::Only(Category::Food))
            .with_start(Some(date(2024, 2, 1)))
            .with_search("dinner");
        assert_eq!(amounts(&FilterService::filter(&scenario(), &filter)), vec![20.0]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let filter = ExpenseFilter::new()
            .with_category(CategoryFilter::Only(Category::Food))
            .with_search("o");
        let once = FilterService::filter(&scenario(), &filter);
        let twice = FilterService::filter(&once, &filter);
        assert_eq!(once, twice);
    }

    #[test]
    fn sorts_by_amount_ascending() {
        let sorted = FilterService::sort(&scenario(), SortKey::Amount, SortDirection::Ascending);
        assert_eq!(amounts(&sorted), vec![5.0, 10.0, 20.0]);
    }

    #[test]
    fn direction_flip_reverses_untied_keys() {
        let records = scenario();
        for key in [SortKey::Date, SortKey::Amount] {
            let asc = FilterService::sort(&records, key, SortDirection::Ascending);
            let mut desc = FilterService::sort(&records, key, SortDirection::Descending);
            desc.reverse();
            assert_eq!(asc, desc, "key {key}");
        }
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let records = vec![
            expense((2024, 2, 1), 9.0, Category::Food, "first"),
            expense((2024, 2, 1), 9.0, Category::Other, "second"),
            expense((2024, 1, 1), 1.0, Category::Bills, "third"),
        ];
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            for key in [SortKey::Date, SortKey::Amount] {
                let sorted = FilterService::sort(&records, key, direction);
                let tied: Vec<_> = sorted
                    .iter()
                    .filter(|e| e.amount == 9.0)
                    .map(|e| e.description.as_str())
                    .collect();
                assert_eq!(tied, vec!["first", "second"]);
            }
        }
    }

    #[test]
    fn sort_does_not_touch_input() {
        let records = scenario();
        let _ = FilterService::sort(&records, SortKey::Amount, SortDirection::Descending);
        assert_eq!(amounts(&records), vec![10.0, 20.0, 5.0]);
    }
}

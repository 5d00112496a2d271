use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use expense_domain::{Expense, TrendBucket};
use tracing::debug;

/// Number of populated months shown in the spending trend.
pub const TREND_WINDOW_MONTHS: usize = 6;

/// Groups expenses into calendar-month buckets.
pub struct TrendService;

impl TrendService {
    /// Buckets for the most recent [`TREND_WINDOW_MONTHS`] months that have
    /// at least one record, oldest first.
    pub fn bin_by_month(records: &[Expense]) -> Vec<TrendBucket> {
        Self::bin_by_month_window(records, TREND_WINDOW_MONTHS)
    }

    /// Same as [`TrendService::bin_by_month`] with a caller-chosen window.
    /// Months without records never produce a bucket.
    pub fn bin_by_month_window(records: &[Expense], months: usize) -> Vec<TrendBucket> {
        let mut buckets: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
        for expense in records {
            let entry = buckets
                .entry((expense.date.year(), expense.date.month()))
                .or_insert((0.0, 0));
            entry.0 += expense.amount;
            entry.1 += 1;
        }

        let skip = buckets.len().saturating_sub(months);
        let trend: Vec<TrendBucket> = buckets
            .into_iter()
            .skip(skip)
            .filter_map(|((year, month), (total_amount, count))| {
                let first = NaiveDate::from_ymd_opt(year, month, 1)?;
                Some(TrendBucket {
                    month_key: format!("{year:04}-{month:02}"),
                    label: first.format("%b %Y").to_string(),
                    total_amount,
                    count,
                })
            })
            .collect();
        debug!(buckets = trend.len(), "binned expenses by month");
        trend
    }
}

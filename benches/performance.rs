use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use expense_core::{
    storage::ExpenseStore, CategoryFilter, ExpenseFilter, ExportService, FilterService,
    SummaryService, TrendService,
};
use expense_domain::{Category, Expense, ExpenseDetails, SortDirection, SortKey};
use expense_storage_json::{JsonExpenseStore, StoragePaths};
use tempfile::tempdir;

fn build_sample_expenses(count: usize) -> Vec<Expense> {
    let start_date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let created_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

    (0..count)
        .map(|idx| {
            let details = ExpenseDetails {
                date: start_date + Duration::days((idx % 540) as i64),
                amount: 5.0 + (idx % 250) as f64 * 0.75,
                category: Category::ALL[idx % Category::ALL.len()],
                description: format!("Purchase #{idx}"),
            };
            Expense::new(details, created_at)
        })
        .collect()
}

fn bench_reports(c: &mut Criterion) {
    let expenses = build_sample_expenses(black_box(10_000));
    let reference = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

    c.bench_function("summary_10k", |b| {
        b.iter(|| black_box(SummaryService::summarize(&expenses, reference)))
    });

    c.bench_function("trend_10k", |b| {
        b.iter(|| black_box(TrendService::bin_by_month(&expenses)))
    });
}

fn bench_listing(c: &mut Criterion) {
    let expenses = build_sample_expenses(black_box(10_000));
    let filter = ExpenseFilter::new()
        .with_category(CategoryFilter::Only(Category::Food))
        .with_search("9");

    c.bench_function("filter_and_sort_10k", |b| {
        b.iter(|| {
            black_box(FilterService::filter_and_sort(
                &expenses,
                &filter,
                SortKey::Amount,
                SortDirection::Descending,
            ))
        })
    });

    c.bench_function("csv_export_10k", |b| {
        b.iter(|| black_box(ExportService::to_csv(&expenses).expect("csv")))
    });
}

fn bench_store_io(c: &mut Criterion) {
    let expenses = build_sample_expenses(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let store = JsonExpenseStore::new(StoragePaths::under(dir.path())).expect("store");

    c.bench_function("store_save_10k", |b| {
        b.iter(|| store.save(&expenses).expect("save expenses"))
    });

    c.bench_function("store_load_10k", |b| {
        b.iter(|| black_box(store.load().expect("load expenses")))
    });
}

criterion_group!(benches, bench_reports, bench_listing, bench_store_io);
criterion_main!(benches);

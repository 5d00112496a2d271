use chrono::{NaiveDate, TimeZone, Utc};

use crate::{
    storage::{load_or_empty, ExpenseStore, MemoryExpenseStore},
    time::{Clock, FixedClock},
    validate_draft, CategoryFilter, ExpenseFilter, ExpenseService, FilterService, SummaryService,
    TrendService,
};
use expense_domain::{Category, ExpenseDraft, SortDirection, SortKey};

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 2, 20, 18, 0, 0).unwrap())
}

fn record(store: &MemoryExpenseStore, clock: &FixedClock, draft: ExpenseDraft) {
    let details = validate_draft(&draft, clock.today()).expect("valid draft");
    store
        .add(ExpenseService::create(details, clock.now()))
        .expect("store add");
}

#[test]
fn draft_to_dashboard_flow() {
    let clock = clock();
    let store = MemoryExpenseStore::new();
    record(&store, &clock, ExpenseDraft::new("2024-01-05", "10", "Food", "Groceries"));
    record(&store, &clock, ExpenseDraft::new("2024-02-10", "20", "Food", "Dinner"));
    record(&store, &clock, ExpenseDraft::new("2024-02-15", "5", "Bills", "Phone"));

    let expenses = load_or_empty(&store);
    let summary = SummaryService::summarize(&expenses, clock.today());
    assert_eq!(summary.total_spending, 35.0);
    assert_eq!(summary.monthly_spending, 25.0);
    assert_eq!(summary.top_category().map(|row| row.category), Some(Category::Food));

    let trend = TrendService::bin_by_month(&expenses);
    assert_eq!(trend.len(), 2);

    let bills = ExpenseFilter::new().with_category(CategoryFilter::Only(Category::Bills));
    let listing =
        FilterService::filter_and_sort(&expenses, &bills, SortKey::Date, SortDirection::Descending);
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].description, "Phone");
}

#[test]
fn rejected_draft_never_reaches_the_store() {
    let clock = clock();
    let store = MemoryExpenseStore::new();
    let errors = validate_draft(
        &ExpenseDraft::new("2024-03-01", "-1", "Food", "Too early"),
        clock.today(),
    )
    .unwrap_err();
    assert!(errors.date.is_some());
    assert!(errors.amount.is_some());
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn edit_through_validator_keeps_identity() {
    let clock = clock();
    let store = MemoryExpenseStore::new();
    record(&store, &clock, ExpenseDraft::new("2024-02-01", "3.5", "Other", "Coffee"));
    let expenses = store.load().unwrap();
    let original = expenses[0].clone();

    let mut draft = ExpenseDraft::from_expense(&original);
    draft.amount = "4.25".into();
    let details = validate_draft(&draft, clock.today()).unwrap();
    let updated = ExpenseService::update(&expenses, original.id, details).unwrap();
    store.save(&updated).unwrap();

    let stored = store.load().unwrap();
    assert_eq!(stored[0].id, original.id);
    assert_eq!(stored[0].created_at, original.created_at);
    assert_eq!(stored[0].amount, 4.25);
    assert_eq!(stored[0].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
}

use chrono::{NaiveDate, TimeZone, Utc};
use expense_core::{storage::ExpenseStore, CoreError};
use expense_domain::{Category, Expense, ExpenseDetails};
use expense_storage_json::{load_expenses_from_path, JsonExpenseStore, StoragePaths};
use std::fs;
use tempfile::tempdir;

fn expense(amount: f64, description: &str) -> Expense {
    Expense::new(
        ExpenseDetails {
            date: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            amount,
            category: Category::Food,
            description: description.into(),
        },
        Utc.with_ymd_and_hms(2024, 2, 10, 12, 0, 0).unwrap(),
    )
}

#[test]
fn json_store_can_save_and_load_expenses() {
    let dir = tempdir().expect("tempdir");
    let store = JsonExpenseStore::new(StoragePaths::under(dir.path())).expect("create store");

    let records = vec![expense(12.5, "Lunch"), expense(3.0, "Coffee")];
    store.save(&records).expect("save expenses");
    let loaded = store.load().expect("load expenses");

    assert_eq!(loaded, records);
    let path = store.data_path();
    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("expenses.json"));
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn json_store_writes_camel_case_records() {
    let dir = tempdir().expect("tempdir");
    let store = JsonExpenseStore::new(StoragePaths::under(dir.path())).expect("create store");
    store.save(&[expense(1.0, "Gum")]).expect("save");

    let raw = fs::read_to_string(store.data_path()).expect("read file");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    let first = &value.as_array().expect("array")[0];
    assert_eq!(first["date"], "2024-02-10");
    assert_eq!(first["category"], "Food");
    assert!(first.get("createdAt").is_some());
}

#[test]
fn missing_file_loads_as_empty_list() {
    let dir = tempdir().expect("tempdir");
    let store = JsonExpenseStore::new(StoragePaths::under(dir.path())).expect("create store");
    assert!(store.load().expect("load").is_empty());
}

#[test]
fn corrupt_file_is_reported_as_serde_error() {
    let dir = tempdir().expect("tempdir");
    let store = JsonExpenseStore::new(StoragePaths::under(dir.path())).expect("create store");
    fs::write(store.data_path(), "{ not json").expect("write junk");

    let err = store.load().expect_err("corrupt data must fail");
    assert!(matches!(err, CoreError::Serde(_)), "unexpected error: {err:?}");
}

#[test]
fn json_store_creates_and_restores_backups() {
    let dir = tempdir().expect("tempdir");
    let store = JsonExpenseStore::new(StoragePaths::under(dir.path())).expect("create store");

    let original = vec![expense(10.0, "Groceries")];
    store.save(&original).expect("save original");
    let info = store.backup(Some("before cleanup")).expect("create backup");
    assert!(info.id.contains("before-cleanup"));
    assert!(info.created_at.is_some());

    store.save(&[]).expect("clear list");
    assert!(store.load().unwrap().is_empty());

    let backups = store.list_backups().expect("list backups");
    assert!(
        backups.iter().any(|entry| entry.id == info.id),
        "backup list should include created backup"
    );

    let restored = store.restore_backup(&info.id).expect("restore backup");
    assert_eq!(restored, original);
    assert_eq!(store.load().unwrap(), original);
}

#[test]
fn restoring_unknown_backup_fails() {
    let dir = tempdir().expect("tempdir");
    let store = JsonExpenseStore::new(StoragePaths::under(dir.path())).expect("create store");
    let err = store
        .restore_backup("expenses_20000101_000000.json")
        .expect_err("missing backup");
    assert!(matches!(err, CoreError::Storage(_)));
}

#[test]
fn backups_are_pruned_to_retention() {
    let dir = tempdir().expect("tempdir");
    let store =
        JsonExpenseStore::with_retention(StoragePaths::under(dir.path()), 2).expect("create store");

    for n in 0..5 {
        store
            .save(&[expense(n as f64 + 1.0, "Item")])
            .expect("save");
    }

    let backups = store.list_backups().expect("list backups");
    assert_eq!(backups.len(), 2);
    let newest = load_expenses_from_path(&backups[0].path).expect("read newest backup");
    assert_eq!(newest[0].amount, 4.0);
}

#[test]
fn retention_never_drops_below_one() {
    let dir = tempdir().expect("tempdir");
    let store =
        JsonExpenseStore::with_retention(StoragePaths::under(dir.path()), 0).expect("create store");
    assert_eq!(store.retention(), 1);
}

#[test]
fn deleting_a_backup_removes_the_file() {
    let dir = tempdir().expect("tempdir");
    let store = JsonExpenseStore::new(StoragePaths::under(dir.path())).expect("create store");
    store.save(&[expense(1.0, "Tea")]).expect("save");
    let info = store.backup(None).expect("backup");

    store.delete_backup(&info.id).expect("delete backup");
    assert!(!info.path.exists());
}

#[test]
fn backup_names_cannot_escape_the_backup_directory() {
    let dir = tempdir().expect("tempdir");
    let store = JsonExpenseStore::new(StoragePaths::under(dir.path())).expect("create store");
    store.save(&[expense(3.0, "Bus")]).expect("save");

    for id in ["../expenses.json", "expenses_20000101_000000.json"] {
        assert!(matches!(store.delete_backup(id), Err(CoreError::Storage(_))));
        assert!(matches!(store.restore_backup(id), Err(CoreError::Storage(_))));
    }
    assert_eq!(store.load().unwrap().len(), 1);
}

mod common;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use insta::assert_snapshot;
use serde_json::Value;

use common::{run_script, SEED_SCRIPT};

#[test]
fn csv_export_layout() {
    let home = TempDir::new().unwrap();
    run_script(home.path(), SEED_SCRIPT);
    let target = home.child("all.csv");
    run_script(home.path(), &format!("export {}\n", target.path().display()));

    let csv = std::fs::read_to_string(target.path()).unwrap();
    assert_snapshot!(csv, @r#"
    Date,Amount,Category,Description
    2024-02-15,5.00,Bills,"Phone"
    2024-02-10,20.00,Food,"Dinner out"
    2024-01-05,10.00,Food,"Groceries"
    "#);
}

#[test]
fn filtered_export_honours_sort_options() {
    let home = TempDir::new().unwrap();
    run_script(home.path(), SEED_SCRIPT);
    let target = home.child("food.csv");
    run_script(
        home.path(),
        &format!(
            "export {} --category food --sort amount --order asc\n",
            target.path().display()
        ),
    );

    let csv = std::fs::read_to_string(target.path()).unwrap();
    assert_snapshot!(csv, @r#"
    Date,Amount,Category,Description
    2024-01-05,10.00,Food,"Groceries"
    2024-02-10,20.00,Food,"Dinner out"
    "#);
}

#[test]
fn stored_records_use_camel_case_fields() {
    let home = TempDir::new().unwrap();
    run_script(home.path(), "add 2024-01-05 10 Food Groceries\n");

    let raw = std::fs::read_to_string(home.child("expenses.json").path()).unwrap();
    let stored: Value = serde_json::from_str(&raw).unwrap();
    let record = &stored.as_array().unwrap()[0];
    assert_eq!(record["date"], "2024-01-05");
    assert_eq!(record["amount"], 10.0);
    assert_eq!(record["category"], "Food");
    assert_eq!(record["description"], "Groceries");
    assert!(record["createdAt"].is_string());
    assert!(record["id"].is_string());
}

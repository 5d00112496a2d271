//! Delimited-text export of expense listings.

use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use expense_domain::Expense;
use tracing::info;

use crate::format::{ExpenseFormatter, PlainFormatter};
use crate::CoreError;

pub const CSV_HEADERS: [&str; 4] = ["Date", "Amount", "Category", "Description"];

/// Serializes expenses as CSV with a fixed column order.
pub struct ExportService;

impl ExportService {
    /// Renders `records` as CSV text.
    pub fn to_csv(records: &[Expense]) -> Result<String, CoreError> {
        let mut buffer = Vec::new();
        Self::write_csv(records, &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| CoreError::Serde(err.to_string()))
    }

    /// Streams `records` as CSV into `out`.
    ///
    /// Amounts carry exactly two decimals; descriptions are always quoted
    /// with embedded quotes doubled.
    pub fn write_csv<W: Write>(records: &[Expense], out: W) -> Result<(), CoreError> {
        if records.is_empty() {
            return Err(CoreError::NothingToExport);
        }
        // Quoting is applied by hand to the description column only.
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(out);
        writer.write_record(CSV_HEADERS)?;
        let fmt = PlainFormatter;
        for expense in records {
            writer.write_record([
                fmt.date(expense.date),
                fmt.amount(expense.amount),
                expense.category.name().to_string(),
                quote(&expense.description),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes the CSV export to `path`, creating parent directories.
    pub fn export_to_path(records: &[Expense], path: &Path) -> Result<(), CoreError> {
        if records.is_empty() {
            return Err(CoreError::NothingToExport);
        }
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Self::write_csv(records, file)?;
        info!(path = %path.display(), rows = records.len(), "exported expenses");
        Ok(())
    }

    pub fn default_file_name(today: NaiveDate) -> String {
        format!("expenses_{}.csv", today.format("%Y-%m-%d"))
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use expense_domain::{Category, ExpenseDetails};

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

    #[test]
    fn renders_fixed_columns_and_escapes_descriptions() {
        let records = vec![
            expense((2024, 1, 5), 10.0, Category::Food, "Groceries"),
            expense((2024, 2, 10), 20.5, Category::Food, "Dinner \"out\", late"),
            expense((2024, 2, 15), 4.999, Category::Bills, "Phone"),
        ];
        let csv = ExportService::to_csv(&records).unwrap();
        insta::assert_snapshot!(csv, @r#"
        Date,Amount,Category,Description
        2024-01-05,10.00,Food,"Groceries"
        2024-02-10,20.50,Food,"Dinner ""out"", late"
        2024-02-15,5.00,Bills,"Phone"
        "#);
    }

    #[test]
    fn empty_export_is_refused() {
        assert!(matches!(
            ExportService::to_csv(&[]),
            Err(CoreError::NothingToExport)
        ));
    }

    #[test]
    fn default_file_name_carries_the_date() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        assert_eq!(ExportService::default_file_name(today), "expenses_2024-02-20.csv");
    }
}

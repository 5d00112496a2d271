use expense_core::{format::ExpenseFormatter, SummaryService, TrendService};

use crate::cli::core::{usage, CommandResult};
use crate::cli::io;
use crate::cli::output::{self, current_preferences};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::cli::table::{Table, TableColumn};

const BAR_WIDTH: usize = 30;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Totals, monthly spending, and category breakdown",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "trend",
            "Spending per month for the last six active months",
            "trend",
            cmd_trend,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage("summary"));
    }
    let today = context.today();
    let summary = SummaryService::summarize(&context.expenses, today);
    let fmt = &context.formatters;

    output::section("Summary");
    io::print_info(format!("  Total spending  : {}", fmt.amount(summary.total_spending)));
    io::print_info(format!(
        "  This month      : {} ({})",
        fmt.amount(summary.monthly_spending),
        today.format("%B %Y")
    ));
    io::print_info(format!("  Average expense : {}", fmt.amount(summary.average_expense)));
    io::print_info(format!("  Expenses        : {}", summary.expense_count));
    if let Some(top) = summary.top_category() {
        io::print_info(format!(
            "  Top category    : {} ({})",
            top.category,
            fmt.percentage(top.percentage)
        ));
    }

    if summary.category_breakdown.is_empty() {
        io::print_info("No expenses recorded yet.");
        return Ok(());
    }

    output::section("By category");
    let mut table = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::right("Amount"),
        TableColumn::right("Share"),
        TableColumn::left(""),
    ]);
    for row in &summary.category_breakdown {
        table.push(vec![
            row.category.to_string(),
            fmt.amount(row.amount),
            fmt.percentage(row.percentage),
            bar(row.percentage / 100.0),
        ]);
    }
    io::print_info(table.render());
    Ok(())
}

fn cmd_trend(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage("trend"));
    }
    let buckets = TrendService::bin_by_month(&context.expenses);
    if buckets.is_empty() {
        io::print_info("No spending history to chart yet.");
        return Ok(());
    }

    output::section("Monthly trend");
    let peak = buckets
        .iter()
        .map(|bucket| bucket.total_amount)
        .fold(0.0_f64, f64::max);
    let mut table = Table::new(vec![
        TableColumn::left("Month"),
        TableColumn::right("Spent"),
        TableColumn::right("Count"),
        TableColumn::left(""),
    ]);
    for bucket in &buckets {
        let ratio = if peak > 0.0 {
            bucket.total_amount / peak
        } else {
            0.0
        };
        table.push(vec![
            bucket.label.clone(),
            context.formatters.amount(bucket.total_amount),
            bucket.count.to_string(),
            bar(ratio),
        ]);
    }
    io::print_info(table.render());
    Ok(())
}

/// Horizontal bar for a ratio in `0..=1`; non-zero ratios get at least one cell.
fn bar(ratio: f64) -> String {
    let glyph = if current_preferences().plain_mode {
        "#"
    } else {
        "█"
    };
    let cells = (ratio.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    let cells = if ratio > 0.0 { cells.max(1) } else { 0 };
    glyph.repeat(cells)
}

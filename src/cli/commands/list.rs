use expense_core::{
    format::ExpenseFormatter, CategoryFilter, ExpenseFilter, FilterService, SummaryService,
};
use expense_domain::{SortDirection, SortKey};

use crate::cli::commands::{parse_options, ParsedArgs};
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::cli::table::{Table, TableColumn};

const LIST_USAGE: &str = "list [--category NAME|All] [--from YYYY-MM-DD] [--to YYYY-MM-DD] \
[--search TEXT] [--sort date|amount] [--order asc|desc]";

pub(crate) const LIST_OPTIONS: [&str; 6] = ["category", "from", "to", "search", "sort", "order"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "list",
        "Show expenses with optional filters and sorting",
        LIST_USAGE,
        cmd_list,
    )
    .with_aliases(&["ls"])]
}

/// Builds the filter described by `--category`, `--from`, `--to`, and `--search`.
pub(crate) fn filter_from(parsed: &ParsedArgs) -> Result<ExpenseFilter, CommandError> {
    let category = match parsed.option("category") {
        Some(raw) => raw
            .parse::<CategoryFilter>()
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?,
        None => CategoryFilter::All,
    };
    let mut filter = ExpenseFilter::new()
        .with_category(category)
        .with_start_str(parsed.option("from"))?
        .with_end_str(parsed.option("to"))?;
    if let Some(term) = parsed.option("search") {
        filter = filter.with_search(term);
    }
    Ok(filter)
}

/// Sort order from `--sort`/`--order`, falling back to the configured default.
pub(crate) fn ordering_from(
    context: &ShellContext,
    parsed: &ParsedArgs,
) -> Result<(SortKey, SortDirection), CommandError> {
    let key = match parsed.option("sort") {
        Some(raw) => raw
            .parse::<SortKey>()
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?,
        None => context.config.default_sort_key,
    };
    let direction = match parsed.option("order") {
        Some(raw) => raw
            .parse::<SortDirection>()
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?,
        None => context.config.default_sort_direction,
    };
    Ok((key, direction))
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = parse_options(args, &LIST_OPTIONS)?;
    if !parsed.positionals.is_empty() {
        return Err(CommandError::InvalidArguments(format!("usage: {LIST_USAGE}")));
    }
    let filter = filter_from(&parsed)?;
    let (key, direction) = ordering_from(context, &parsed)?;

    if context.expenses.is_empty() {
        io::print_info("No expenses recorded yet. Add one with `add`.");
        return Ok(());
    }

    let rows = FilterService::filter_and_sort(&context.expenses, &filter, key, direction);
    output::section(format!("Expenses ({key}, {direction})"));
    if rows.is_empty() {
        io::print_info("No expenses match the current filters.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Date"),
        TableColumn::left("Category"),
        TableColumn::right("Amount"),
        TableColumn::left("Description").capped(40),
    ]);
    for expense in &rows {
        table.push(vec![
            expense.short_id(),
            context.formatters.date(expense.date),
            expense.category.to_string(),
            context.formatters.amount(expense.amount),
            expense.description.clone(),
        ]);
    }
    io::print_info(table.render());

    let shown_total: f64 = rows.iter().map(|expense| expense.amount).sum();
    if filter.is_empty() {
        io::print_info(format!(
            "{} expense(s) · total {}",
            rows.len(),
            context.formatters.amount(shown_total)
        ));
        return Ok(());
    }
    io::print_info(format!(
        "{} of {} expense(s) · total {}",
        rows.len(),
        context.expenses.len(),
        context.formatters.amount(shown_total)
    ));
    if let CategoryFilter::Only(category) = filter.category {
        let all_time = SummaryService::category_total(&context.expenses, category);
        io::print_info(format!(
            "{category} across all dates: {}",
            context.formatters.amount(all_time)
        ));
    }
    Ok(())
}

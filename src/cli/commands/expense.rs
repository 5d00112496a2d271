use expense_core::{format::ExpenseFormatter, validate_draft, ExpenseService};
use expense_domain::{Expense, ExpenseDraft};

use crate::cli::commands::parse_options;
use crate::cli::core::{usage, CommandError, CommandResult};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

const ADD_USAGE: &str = "add <date> <amount> <category> <description...>";
const EDIT_USAGE: &str =
    "edit <id> [--date YYYY-MM-DD] [--amount N] [--category NAME] [--description TEXT]";
const EDIT_OPTIONS: [&str; 4] = ["date", "amount", "category", "description"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("add", "Record a new expense", ADD_USAGE, cmd_add),
        CommandEntry::new("edit", "Change fields of an expense", EDIT_USAGE, cmd_edit),
        CommandEntry::new("delete", "Remove an expense", "delete <id>", cmd_delete)
            .with_aliases(&["rm"]),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = if args.is_empty() && context.can_prompt() {
        prompt_draft(context, &ExpenseDraft::default())?
    } else if args.len() < 4 {
        return Err(usage(ADD_USAGE));
    } else {
        ExpenseDraft::new(args[0], args[1], args[2], args[3..].join(" "))
    };

    let details = validate_draft(&draft, context.today())?;
    let expense = ExpenseService::create(details, context.now());
    let message = format!("Added {}", describe(context, &expense));
    let updated = ExpenseService::add(&context.expenses, expense);
    context.commit(updated)?;
    io::print_success(message);
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = parse_options(args, &EDIT_OPTIONS)?;
    let [reference] = parsed.positionals.as_slice() else {
        return Err(usage(EDIT_USAGE));
    };
    let id = ExpenseService::resolve_id(&context.expenses, reference)?;
    let current = ExpenseService::find(&context.expenses, id)
        .cloned()
        .ok_or_else(|| CommandError::Message(format!("expense {reference} disappeared")))?;

    let mut draft = ExpenseDraft::from_expense(&current);
    if parsed.has_options() {
        if let Some(date) = parsed.option("date") {
            draft.date = date.to_string();
        }
        if let Some(amount) = parsed.option("amount") {
            draft.amount = amount.to_string();
        }
        if let Some(category) = parsed.option("category") {
            draft.category = category.to_string();
        }
        if let Some(description) = parsed.option("description") {
            draft.description = description.to_string();
        }
    } else if context.can_prompt() {
        draft = prompt_draft(context, &draft)?;
    } else {
        return Err(CommandError::InvalidArguments(
            "nothing to change; pass at least one of --date, --amount, --category, --description"
                .into(),
        ));
    }

    let details = validate_draft(&draft, context.today())?;
    if details == current.details() {
        io::print_info(format!("No changes to {}", describe(context, &current)));
        return Ok(());
    }
    let updated = ExpenseService::update(&context.expenses, id, details)?;
    context.commit(updated)?;
    if let Some(expense) = ExpenseService::find(&context.expenses, id) {
        io::print_success(format!("Updated {}", describe(context, expense)));
    }
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [reference] = args else {
        return Err(usage("delete <id>"));
    };
    let id = ExpenseService::resolve_id(&context.expenses, reference)?;
    let label = ExpenseService::find(&context.expenses, id)
        .map(|expense| describe(context, expense))
        .unwrap_or_else(|| reference.to_string());

    if !context.confirm(&format!("Delete {label}?"))? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }

    let updated = ExpenseService::remove(&context.expenses, id)?;
    context.commit(updated)?;
    io::print_success(format!("Deleted {label}"));
    Ok(())
}

fn prompt_draft(context: &ShellContext, initial: &ExpenseDraft) -> Result<ExpenseDraft, CommandError> {
    let today = context.today().format("%Y-%m-%d").to_string();
    let date_default = if initial.date.is_empty() {
        today.as_str()
    } else {
        initial.date.as_str()
    };
    Ok(ExpenseDraft {
        date: io::prompt_text(&context.theme, "Date (YYYY-MM-DD)", date_default)?,
        amount: io::prompt_text(&context.theme, "Amount", &initial.amount)?,
        category: io::select_category(&context.theme, "Category", &initial.category)?,
        description: io::prompt_text(&context.theme, "Description", &initial.description)?,
    })
}

fn describe(context: &ShellContext, expense: &Expense) -> String {
    context.formatters.expense_line(expense)
}

use std::path::PathBuf;

use expense_core::{CoreError, ExportService, FilterService};
use expense_storage_json::BackupInfo;

use crate::cli::commands::list::{filter_from, ordering_from, LIST_OPTIONS};
use crate::cli::commands::parse_options;
use crate::cli::core::{usage, CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::cli::table::{Table, TableColumn};

const EXPORT_USAGE: &str = "export [path] [list filters...]";
const BACKUPS_USAGE: &str = "backups [delete <name|number>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "export",
            "Write expenses to a CSV file",
            EXPORT_USAGE,
            cmd_export,
        ),
        CommandEntry::new(
            "backup",
            "Snapshot the expense file",
            "backup [note]",
            cmd_backup,
        ),
        CommandEntry::new(
            "backups",
            "List or delete expense backups",
            BACKUPS_USAGE,
            cmd_backups,
        ),
        CommandEntry::new(
            "restore",
            "Replace expenses with a backup",
            "restore <name|number>",
            cmd_restore,
        ),
    ]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = parse_options(args, &LIST_OPTIONS)?;
    let target = match parsed.positionals.as_slice() {
        [] => PathBuf::from(ExportService::default_file_name(context.today())),
        [path] => {
            let path = PathBuf::from(path);
            if path.is_dir() {
                path.join(ExportService::default_file_name(context.today()))
            } else {
                path
            }
        }
        _ => return Err(usage(EXPORT_USAGE)),
    };

    let filter = filter_from(&parsed)?;
    let (key, direction) = ordering_from(context, &parsed)?;
    let rows = FilterService::filter_and_sort(&context.expenses, &filter, key, direction);
    match ExportService::export_to_path(&rows, &target) {
        Ok(()) => {
            io::print_success(format!(
                "Exported {} expense(s) to {}",
                rows.len(),
                target.display()
            ));
            Ok(())
        }
        Err(CoreError::NothingToExport) => {
            io::print_warning("Nothing to export.");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = if args.is_empty() {
        None
    } else {
        Some(args.join(" "))
    };
    let info = context.store.backup(note.as_deref())?;
    io::print_success(format!("Backup created: {}", info.id));
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => list_backups(context),
        [action, reference] if action.eq_ignore_ascii_case("delete") => {
            delete_backup(context, reference)
        }
        _ => Err(usage(BACKUPS_USAGE)),
    }
}

fn list_backups(context: &ShellContext) -> CommandResult {
    let backups = context.store.list_backups()?;
    if backups.is_empty() {
        io::print_info("No backups yet.");
        return Ok(());
    }

    output::section("Expense backups");
    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Name"),
        TableColumn::left("Created (UTC)"),
        TableColumn::right("Size"),
    ]);
    for (idx, info) in backups.iter().enumerate() {
        table.push(vec![
            (idx + 1).to_string(),
            info.id.clone(),
            info.created_at
                .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "unknown".into()),
            format!("{} B", info.size_bytes),
        ]);
    }
    io::print_info(table.render());
    io::print_info(format!(
        "Keeping the {} most recent backups in {}.",
        context.store.retention(),
        context.store.backups_dir().display()
    ));
    Ok(())
}

fn delete_backup(context: &ShellContext, reference: &str) -> CommandResult {
    let backups = context.store.list_backups()?;
    let chosen = find_backup(&backups, reference)?;
    if !context.confirm(&format!("Delete backup {}?", chosen.id))? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.store.delete_backup(&chosen.id)?;
    io::print_success(format!("Deleted backup {}", chosen.id));
    Ok(())
}

/// Picks a backup by its 1-based position in the listing or by file name.
fn find_backup<'a>(
    backups: &'a [BackupInfo],
    reference: &str,
) -> Result<&'a BackupInfo, CommandError> {
    match reference.parse::<usize>() {
        Ok(number) if number >= 1 => backups.get(number - 1),
        _ => backups.iter().find(|info| info.id == reference),
    }
    .ok_or_else(|| CommandError::InvalidArguments(format!("no backup named `{reference}`")))
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [reference] = args else {
        return Err(usage("restore <name|number>"));
    };
    let backups = context.store.list_backups()?;
    let chosen = find_backup(&backups, reference)?;

    if !context.confirm(&format!("Replace current expenses with {}?", chosen.id))? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }

    let restored = context.store.restore_backup(&chosen.id)?;
    context.expenses = restored;
    io::print_success(format!(
        "Restored {} expense(s) from {}",
        context.expenses.len(),
        chosen.id
    ));
    Ok(())
}

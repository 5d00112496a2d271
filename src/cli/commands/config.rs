use expense_config::ConfigKey;

use crate::cli::core::{usage, CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::cli::table::{Table, TableColumn};

const CONFIG_USAGE: &str = "config [show|set <key> <value>|backup [note]|backups [delete <name|number>]|\
restore <name|number>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and manage shell preferences",
        CONFIG_USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((action, rest)) = args.split_first() else {
        return show_config(context);
    };

    match action.to_ascii_lowercase().as_str() {
        "show" => show_config(context),
        "set" => {
            let [key, value @ ..] = rest else {
                return Err(set_usage());
            };
            if value.is_empty() {
                return Err(set_usage());
            }
            let key: ConfigKey = key.parse()?;
            context.config.set(key, &value.join(" "))?;
            context.persist_config()?;
            context.apply_config()?;
            io::print_success(format!("{} set to {}.", key, context.config.get(key)));
            Ok(())
        }
        "backup" => {
            let note = if rest.is_empty() {
                None
            } else {
                Some(rest.join(" "))
            };
            let backup = context
                .config_manager
                .backup(&context.config, note.as_deref())?;
            io::print_success(format!("Configuration backup created: {}", backup.name));
            Ok(())
        }
        "backups" => match rest {
            [] => list_backups(context),
            [action, reference] if action.eq_ignore_ascii_case("delete") => {
                let name = backup_name(context, reference)?;
                if !context.confirm(&format!("Delete configuration backup {name}?"))? {
                    io::print_info("Operation cancelled.");
                    return Ok(());
                }
                context.config_manager.delete_backup(&name)?;
                io::print_success(format!("Deleted configuration backup {name}."));
                Ok(())
            }
            _ => Err(usage("config backups [delete <name|number>]")),
        },
        "restore" => {
            let [reference] = rest else {
                return Err(usage("config restore <name|number>"));
            };
            let name = backup_name(context, reference)?;
            context.config = context.config_manager.restore(&name)?;
            context.apply_config()?;
            io::print_success(format!("Configuration restored from {name}."));
            Ok(())
        }
        _ => Err(usage(CONFIG_USAGE)),
    }
}

fn list_backups(context: &ShellContext) -> CommandResult {
    let backups = context.config_manager.list_backups()?;
    if backups.is_empty() {
        io::print_info("No configuration backups yet.");
        return Ok(());
    }
    output::section("Configuration backups");
    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Name"),
        TableColumn::left("Created (UTC)"),
        TableColumn::left("Note"),
    ]);
    for (idx, backup) in backups.iter().enumerate() {
        table.push(vec![
            (idx + 1).to_string(),
            backup.name.clone(),
            backup
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "unknown".into()),
            backup.note.clone().unwrap_or_default(),
        ]);
    }
    io::print_info(table.render());
    io::print_info(format!(
        "Stored in {}.",
        context.config_manager.backups_dir().display()
    ));
    Ok(())
}

/// Maps a 1-based listing number to a backup name; anything else is taken
/// as a name and checked by the manager.
fn backup_name(context: &ShellContext, reference: &str) -> Result<String, CommandError> {
    let Ok(number) = reference.parse::<usize>() else {
        return Ok(reference.to_string());
    };
    context
        .config_manager
        .list_backups()?
        .into_iter()
        .nth(number.wrapping_sub(1))
        .map(|backup| backup.name)
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!("no configuration backup #{reference}"))
        })
}

fn set_usage() -> CommandError {
    let keys: Vec<&str> = ConfigKey::ALL.iter().map(|key| key.name()).collect();
    usage(&format!("config set <{}> <value>", keys.join("|")))
}

fn show_config(context: &ShellContext) -> CommandResult {
    output::section("Configuration");
    for (key, value) in context.config.entries() {
        io::print_info(format!("  {:<10} {}", key.name(), value));
    }
    io::print_info(format!("  {:<10} {}", "data", context.data_root.display()));
    io::print_info(format!(
        "  {:<10} {}",
        "file",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

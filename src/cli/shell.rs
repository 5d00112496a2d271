use std::{
    borrow::Cow,
    io::{self, BufRead},
    path::PathBuf,
};

use expense_config::ConfigKey;
use expense_domain::Category;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cli::commands::list::LIST_OPTIONS;
use crate::cli::core::{CommandError, LoopControl};
use crate::cli::output::info as output_info;
use crate::cli::shell_context::{CliMode, ShellContext, SCRIPT_ENV};
use crate::errors::CliError;

const HISTORY_FILE: &str = "history.txt";
/// Commands whose arguments accept the listing options.
const FILTERED_COMMANDS: [&str; 2] = ["list", "export"];

/// Runs the shell until `exit`, end of input, or a fatal error.
pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<ExpenseCompleter, DefaultHistory>::new()?;
    editor.set_helper(Some(ExpenseCompleter::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    let history = history_path(context);
    if let Err(err) = editor.load_history(&history) {
        debug!(path = %history.display(), error = %err, "no shell history loaded");
    }

    output_info(format!(
        "Expense Tracker ready with {} expense(s). Type `help` for commands.",
        context.expenses.len()
    ));

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);
                if execute_line(context, line, None)? == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    if let Err(err) = editor.save_history(&history) {
        warn!(path = %history.display(), error = %err, "could not save shell history");
    }
    Ok(())
}

/// Executes stdin line by line; blank lines and `#` comments are skipped.
fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for (index, line) in io::stdin().lock().lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if execute_line(context, trimmed, Some(index + 1))? == LoopControl::Exit {
            break;
        }
        if !context.running {
            break;
        }
    }
    Ok(())
}

/// Runs one command line; command failures are reported and the shell
/// keeps going, only output failures abort it.
fn execute_line(
    context: &mut ShellContext,
    line: &str,
    line_number: Option<usize>,
) -> Result<LoopControl, CliError> {
    match dispatch_line(context, line) {
        Ok(control) => Ok(control),
        Err(LineError::Tokenize(err)) => {
            let message = match line_number {
                Some(number) => format!("line {number}: {err}"),
                None => err.to_string(),
            };
            context.print_warning(&message);
            Ok(LoopControl::Continue)
        }
        Err(LineError::Command(err)) => {
            context.report_error(err)?;
            Ok(LoopControl::Continue)
        }
    }
}

#[derive(Debug)]
pub(crate) enum LineError {
    Tokenize(TokenizeError),
    Command(CommandError),
}

/// Tokenizes `line` and runs it against the registry.
pub(crate) fn dispatch_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, LineError> {
    let tokens = parse_command_line(line).map_err(LineError::Tokenize)?;
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    debug!(command = %raw, args = args.len(), "dispatching");

    let control = context
        .dispatch(&raw.to_lowercase(), raw, &args)
        .map_err(LineError::Command)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

fn history_path(context: &ShellContext) -> PathBuf {
    context.data_root.join(HISTORY_FILE)
}

/// Splits a command line with shell quoting rules.
pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, TokenizeError> {
    shell_words::split(input).map_err(|err| TokenizeError(err.to_string()))
}

#[derive(Debug, Error)]
#[error("could not parse command: {0}")]
pub(crate) struct TokenizeError(String);

/// Tab completion aware of command names, listing options, category names
/// and configuration keys.
struct ExpenseCompleter {
    commands: Vec<String>,
}

impl ExpenseCompleter {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names.into_iter().map(str::to_ascii_lowercase).collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }

    /// Candidate words for the token being typed, given the tokens before it.
    fn candidates(&self, before: &[&str]) -> Vec<String> {
        let Some(command) = before.first().map(|word| word.to_ascii_lowercase()) else {
            return self.commands.clone();
        };
        let previous = before.last().map(|word| word.to_ascii_lowercase());

        if FILTERED_COMMANDS.contains(&command.as_str()) {
            return match previous.as_deref() {
                Some("--category") => std::iter::once("All")
                    .chain(Category::ALL.iter().map(|category| category.name()))
                    .map(String::from)
                    .collect(),
                Some("--sort") => vec!["date".into(), "amount".into()],
                Some("--order") => vec!["asc".into(), "desc".into()],
                _ => LIST_OPTIONS.iter().map(|name| format!("--{name}")).collect(),
            };
        }

        match (command.as_str(), before.len()) {
            ("add", 3) => Category::ALL.iter().map(|c| c.name().to_string()).collect(),
            ("help", 1) => self.commands.clone(),
            ("config", 1) => ["show", "set", "backup", "backups", "restore"]
                .into_iter()
                .map(String::from)
                .collect(),
            ("config", 2) if previous.as_deref() == Some("set") => ConfigKey::ALL
                .iter()
                .map(|key| key.name().to_string())
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl Helper for ExpenseCompleter {}

impl Completer for ExpenseCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let before: Vec<&str> = prefix[..start].split_whitespace().collect();
        let needle = prefix[start..].to_ascii_lowercase();

        let pairs = self
            .candidates(&before)
            .into_iter()
            .filter(|word| word.to_ascii_lowercase().starts_with(&needle))
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ExpenseCompleter {
    type Hint = String;
}

impl Highlighter for ExpenseCompleter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for ExpenseCompleter {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub mod config;
pub mod data;
pub mod expense;
pub mod list;
pub mod report;
pub mod system;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let groups = [
        expense::definitions(),
        list::definitions(),
        report::definitions(),
        data::definitions(),
        config::definitions(),
        system::definitions(),
    ];
    for entry in groups.into_iter().flatten() {
        registry.register(entry);
    }
}

/// Arguments split into positionals and `--name value` options.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs {
    pub positionals: Vec<String>,
    options: Vec<(&'static str, String)>,
}

impl ParsedArgs {
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .rev()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

/// Accepts `--name value` and `--name=value` for each name in `known`.
pub(crate) fn parse_options(
    args: &[&str],
    known: &[&'static str],
) -> Result<ParsedArgs, CommandError> {
    let mut parsed = ParsedArgs::default();
    let mut idx = 0;
    while idx < args.len() {
        let token = args[idx];
        let Some(flag) = token.strip_prefix("--") else {
            parsed.positionals.push(token.to_string());
            idx += 1;
            continue;
        };

        let (name, inline) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (flag, None),
        };
        let lowered = name.to_ascii_lowercase();
        let key = known
            .iter()
            .copied()
            .find(|candidate| *candidate == lowered)
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "unknown option `--{}` (expected one of: {})",
                    name,
                    known
                        .iter()
                        .map(|k| format!("--{k}"))
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;

        let value = match inline {
            Some(value) => value,
            None => {
                idx += 1;
                args.get(idx)
                    .map(|value| value.to_string())
                    .ok_or_else(|| {
                        CommandError::InvalidArguments(format!("option `--{key}` needs a value"))
                    })?
            }
        };
        parsed.options.push((key, value));
        idx += 1;
    }
    Ok(parsed)
}

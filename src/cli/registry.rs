use std::collections::HashMap;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Edit distance within which an unknown word is matched to a command.
const SUGGESTION_DISTANCE: usize = 3;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub aliases: &'static [&'static str],
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            aliases: &[],
            handler,
        }
    }

    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }
}

/// Shell commands keyed by name, with aliases resolving to the same entry.
///
/// Listing follows registration order so help output groups related commands.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    lookup: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry`; a name or alias that is already taken keeps its first owner.
    pub fn register(&mut self, entry: CommandEntry) {
        if self.lookup.contains_key(entry.name) {
            return;
        }
        let slot = self.entries.len();
        for key in std::iter::once(entry.name).chain(entry.aliases.iter().copied()) {
            self.lookup.entry(key).or_insert(slot);
        }
        self.entries.push(entry);
    }

    /// Looks up a command by name or alias.
    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.lookup.get(name).map(|slot| &self.entries[*slot])
    }

    pub fn list(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Closest command for a mistyped word, compared against names and
    /// aliases but always reported by canonical name. Swapped neighbouring
    /// letters count as a single edit.
    pub fn suggest(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_ascii_lowercase();
        self.lookup
            .iter()
            .map(|(key, slot)| (strsim::osa_distance(key, &needle), self.entries[*slot].name))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .min_by_key(|(distance, name)| (*distance, *name))
            .map(|(_, name)| name)
    }
}

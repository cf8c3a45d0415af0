use std::{collections::BTreeMap, fmt};

pub mod config;
pub mod fuel;
pub mod garage;
pub mod maintenance;
pub mod system;
pub mod vehicle;

use crate::cli::core::{CommandResult, ShellContext};

/// Sections used to lay out `help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommandGroup {
    General,
    Garage,
    Vehicles,
    Fuel,
    Maintenance,
    Settings,
}

impl fmt::Display for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self {
            CommandGroup::General => "General",
            CommandGroup::Garage => "Garages & backups",
            CommandGroup::Vehicles => "Vehicles",
            CommandGroup::Fuel => "Fuel log",
            CommandGroup::Maintenance => "Oil changes",
            CommandGroup::Settings => "Settings",
        };
        f.write_str(title)
    }
}

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    [
        (CommandGroup::General, system::definitions()),
        (CommandGroup::Garage, garage::definitions()),
        (CommandGroup::Vehicles, vehicle::definitions()),
        (CommandGroup::Fuel, fuel::definitions()),
        (CommandGroup::Maintenance, maintenance::definitions()),
        (CommandGroup::Settings, config::definitions()),
    ]
    .into_iter()
    .flat_map(|(group, definitions)| {
        definitions.into_iter().map(move |definition| CommandDefinition {
            group,
            ..definition
        })
    })
    .collect()
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub group: CommandGroup,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            group: CommandGroup::General,
            aliases: &[],
            description,
            usage,
            handler,
        }
    }

    pub const fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }
}

/// Commands in registration order plus a lookup table covering names and aliases.
pub struct CommandRegistry {
    commands: Vec<CommandDefinition>,
    lookup: BTreeMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new(commands: Vec<CommandDefinition>) -> Self {
        let mut lookup = BTreeMap::new();
        for (index, command) in commands.iter().enumerate() {
            lookup.insert(command.name, index);
            for alias in command.aliases {
                lookup.entry(*alias).or_insert(index);
            }
        }
        Self { commands, lookup }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.lookup.get(name).map(|&index| &self.commands[index])
    }

    /// Every word the shell accepts, aliases included, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.lookup.keys().copied()
    }

    pub fn group(&self, group: CommandGroup) -> impl Iterator<Item = &CommandDefinition> {
        self.commands
            .iter()
            .filter(move |command| command.group == group)
    }

    pub fn groups(&self) -> Vec<CommandGroup> {
        let mut groups: Vec<_> = self.commands.iter().map(|command| command.group).collect();
        groups.sort();
        groups.dedup();
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_and_alias_resolves_once() {
        let registry = CommandRegistry::new(all_definitions());
        let definitions = all_definitions();
        let words: usize = definitions
            .iter()
            .map(|command| 1 + command.aliases.len())
            .sum();
        assert_eq!(registry.names().count(), words, "duplicate command word");

        for required in ["add-fuel", "status", "record-service", "average", "backups"] {
            assert!(registry.get(required).is_some(), "missing {required}");
        }
        assert_eq!(registry.get("quit").map(|command| command.name), Some("exit"));
    }

    #[test]
    fn commands_are_filed_under_their_topic() {
        let registry = CommandRegistry::new(all_definitions());
        assert_eq!(
            registry.get("add-fuel").map(|command| command.group),
            Some(CommandGroup::Fuel)
        );
        assert_eq!(
            registry.get("record-service").map(|command| command.group),
            Some(CommandGroup::Maintenance)
        );
        let groups = registry.groups();
        assert_eq!(groups.first(), Some(&CommandGroup::General));
        assert_eq!(groups.len(), 6);
        assert!(registry.group(CommandGroup::Vehicles).any(|c| c.name == "use"));
    }
}

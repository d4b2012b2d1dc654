//! Command catalog loader.
//!
//! A catalog is a RON list of [`Command`] definitions. Rosters refer to
//! commands by id and receive their own copy of each definition.

use std::collections::BTreeMap;
use std::path::Path;

use battle_core::{Command, CommandId};

use crate::loaders::{LoadResult, read_file};

/// Commands keyed by id.
#[derive(Clone, Debug, Default)]
pub struct CommandCatalog {
    commands: BTreeMap<CommandId, Command>,
}

impl CommandCatalog {
    /// Load a catalog from a RON file.
    ///
    /// RON format: `Vec<Command>`
    pub fn load(path: &Path) -> LoadResult<Self> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load catalog {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<Self> {
        let raw: Vec<Command> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse command catalog RON: {}", e))?;
        Self::from_commands(raw)
    }

    /// Builds a catalog, rejecting duplicate ids.
    pub fn from_commands(commands: impl IntoIterator<Item = Command>) -> LoadResult<Self> {
        let mut catalog = Self::default();
        for command in commands {
            if command.kind.spends_resource() && command.id == Command::BASIC_ATTACK_ID {
                anyhow::bail!(
                    "Command '{}' uses the reserved basic attack id {}",
                    command.name,
                    command.id
                );
            }
            let id = command.id;
            if let Some(previous) = catalog.commands.insert(id, command) {
                anyhow::bail!("Duplicate command id {} ('{}')", id, previous.name);
            }
        }
        Ok(catalog)
    }

    pub fn get(&self, id: CommandId) -> Option<&Command> {
        self.commands.get(&id)
    }

    /// Copies the named commands in the given order.
    pub fn resolve(&self, ids: &[CommandId]) -> LoadResult<Vec<Command>> {
        ids.iter()
            .map(|id| {
                self.get(*id)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("Unknown command id {}", id))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }
}

//! Roster loader.
//!
//! A roster describes who fights and with which stats and commands. Loading
//! one yields a battle snapshot that has not started yet; the caller opens it
//! with `start_battle`.

use std::collections::BTreeSet;
use std::path::Path;

use battle_core::{BattleSnapshot, Combatant, CommandId, Role, Stats, Team, UnitId};
use serde::{Deserialize, Serialize};

use crate::loaders::{CommandCatalog, LoadResult, read_file};

/// One combatant as authored in a roster file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    pub id: UnitId,
    pub name: String,
    pub team: Team,
    #[serde(default)]
    pub role: Role,
    pub max_hp: u32,
    /// Starting hp; defaults to `max_hp`.
    #[serde(default)]
    pub hp: Option<u32>,
    pub atk: u32,
    #[serde(default)]
    pub shield: u32,
    /// Catalog ids, in the order the unit lists them.
    #[serde(default)]
    pub commands: Vec<CommandId>,
}

/// Roster file structure for RON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterFile {
    pub seed: u64,
    pub max_team_resource: u32,
    #[serde(default)]
    pub team_resource: u32,
    pub units: Vec<UnitSpec>,
}

/// Loader for rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster file and build the battle it describes.
    pub fn load(path: &Path, catalog: &CommandCatalog) -> LoadResult<BattleSnapshot> {
        let content = read_file(path)?;
        let roster = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load roster {}: {}", path.display(), e))?;
        Self::build(&roster, catalog)
    }

    pub fn parse(content: &str) -> LoadResult<RosterFile> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))
    }

    /// Turns a roster into a not-yet-started snapshot.
    pub fn build(roster: &RosterFile, catalog: &CommandCatalog) -> LoadResult<BattleSnapshot> {
        let mut seen = BTreeSet::new();
        let mut units = Vec::with_capacity(roster.units.len());

        for spec in &roster.units {
            if spec.id.is_system() {
                anyhow::bail!("Unit '{}' uses the reserved id {}", spec.name, spec.id);
            }
            if !seen.insert(spec.id) {
                anyhow::bail!("Duplicate unit id {} ('{}')", spec.id, spec.name);
            }
            let hp = spec.hp.unwrap_or(spec.max_hp);
            if hp > spec.max_hp {
                anyhow::bail!(
                    "Unit '{}' starts with {} hp above its max of {}",
                    spec.name,
                    hp,
                    spec.max_hp
                );
            }
            let commands = catalog
                .resolve(&spec.commands)
                .map_err(|e| anyhow::anyhow!("Unit '{}': {}", spec.name, e))?;

            let stats = Stats::new(spec.max_hp, spec.atk)
                .with_hp(hp)
                .with_shield(spec.shield);
            units.push(
                Combatant::new(spec.id, spec.name.clone(), spec.team, spec.role, stats)
                    .with_commands(commands),
            );
        }

        tracing::debug!(
            target: "battle::content",
            units = units.len(),
            seed = roster.seed,
            "roster built"
        );

        Ok(BattleSnapshot::new(units, roster.max_team_resource, roster.seed)
            .with_team_resource(roster.team_resource))
    }
}

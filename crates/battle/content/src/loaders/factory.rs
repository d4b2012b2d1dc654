//! Content factory for building battles from data files.

use std::path::{Path, PathBuf};

use battle_core::{BattleSnapshot, EngineConfig};

use crate::loaders::{CommandCatalog, ConfigLoader, LoadResult, RosterLoader};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── commands.ron
/// └── rosters/
///     ├── skirmish.ron
///     └── ambush.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The data directory shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load engine configuration from `config.toml`.
    ///
    /// A missing file yields the default configuration.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(EngineConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the command catalog from `commands.ron`.
    pub fn load_commands(&self) -> LoadResult<CommandCatalog> {
        let path = self.data_dir.join("commands.ron");
        CommandCatalog::load(&path)
    }

    /// Build a not-yet-started battle from `rosters/{roster_name}.ron`.
    ///
    /// `seed` overrides the seed stored in the roster file.
    pub fn load_battle(&self, roster_name: &str, seed: Option<u64>) -> LoadResult<BattleSnapshot> {
        let catalog = self.load_commands()?;
        let path = self.roster_path(roster_name);
        let mut snapshot = RosterLoader::load(&path, &catalog)?;
        if let Some(seed) = seed {
            snapshot.rng.seed = seed;
        }
        Ok(snapshot)
    }

    pub fn roster_path(&self, roster_name: &str) -> PathBuf {
        self.data_dir
            .join("rosters")
            .join(format!("{}.ron", roster_name))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{BattleState, start_battle};

    #[test]
    fn factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
        assert_eq!(
            factory.roster_path("skirmish"),
            Path::new("/tmp/data/rosters/skirmish.ron")
        );
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap(), EngineConfig::default());
    }

    #[test]
    fn bundled_content_loads() {
        let factory = ContentFactory::bundled();
        let config = factory.load_config().unwrap();
        let catalog = factory.load_commands().unwrap();
        assert!(!catalog.is_empty());

        for roster in ["skirmish", "ambush"] {
            let snapshot = factory.load_battle(roster, None).unwrap();
            assert!(snapshot.validate().is_ok(), "{roster}");
            assert!(
                snapshot
                    .units
                    .iter()
                    .all(|unit| unit.commands.len() <= EngineConfig::MAX_COMMANDS)
            );

            let started = battle_core::BattleEngine::new(config.clone()).start_battle(&snapshot);
            assert_eq!(started.battle_state, BattleState::Ongoing, "{roster}");
        }
    }

    #[test]
    fn seed_override_changes_the_opening_order() {
        let factory = ContentFactory::bundled();
        let base = factory.load_battle("skirmish", Some(1)).unwrap();
        assert_eq!(base.rng.seed, 1);

        let orders: std::collections::BTreeSet<_> = (0..16)
            .map(|seed| {
                let snapshot = factory.load_battle("skirmish", Some(seed)).unwrap();
                start_battle(&snapshot).turn_order
            })
            .collect();
        assert!(orders.len() > 1);
    }
}

//! Create a snapshot from a roster file
//!
//! Loads `rosters/<ROSTER>.ron` and the command catalog from a content
//! directory and writes the resulting snapshot as JSON or RON.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use battle_content::{ContentFactory, SnapshotLoader};
use battle_core::{BattleEngine, BattleState};

use crate::{dirs, utils};

/// Build a snapshot from a roster file
#[derive(Parser)]
pub struct NewBattle {
    /// Roster name under `<content>/rosters/` (e.g., skirmish)
    #[arg(value_name = "ROSTER")]
    roster: String,

    /// Content directory (defaults to the bundled data)
    #[arg(short, long, value_name = "DIR")]
    content: Option<PathBuf>,

    /// Override the roster's rng seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Open round 1 before saving
    #[arg(long)]
    start: bool,

    /// Output file (.json or .ron); defaults to the battles directory
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,
}

impl NewBattle {
    pub fn execute(self) -> Result<()> {
        let factory = match &self.content {
            Some(dir) => ContentFactory::new(dir),
            None => ContentFactory::bundled(),
        };

        let mut snapshot = factory
            .load_battle(&self.roster, self.seed)
            .with_context(|| format!("Failed to build roster '{}'", self.roster))?;

        if self.start {
            let engine = BattleEngine::new(factory.load_config()?);
            snapshot = engine.start_battle(&snapshot);
            if snapshot.battle_state == BattleState::Error {
                anyhow::bail!("Battle failed to start: {}", snapshot.battle_message);
            }
        }

        let out = match self.out {
            Some(path) => path,
            None => {
                let dir = dirs::battles_dir()?;
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
                dir.join(format!("{}_{}.json", self.roster, snapshot.rng.seed))
            }
        };

        SnapshotLoader::save(&out, &snapshot)?;

        println!(
            "{} {} ({} units, seed {})",
            style("✓ Wrote").green().bold(),
            out.display(),
            snapshot.units.len(),
            snapshot.rng.seed
        );
        if snapshot.is_started() {
            utils::print_outcome(&snapshot);
        }
        Ok(())
    }
}

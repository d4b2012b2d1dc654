//! Validate snapshot invariants
//!
//! Runs the engine's structural validation and the scheduler invariants
//! that hold between operations. Exits with an error when any check fails.

use anyhow::Result;
use clap::Parser;
use console::style;
use std::collections::BTreeSet;
use std::path::PathBuf;

use battle_core::{BattleSnapshot, BattleState, UnitId, UnitStatus};

use crate::utils;

/// Validate snapshot invariants
#[derive(Parser)]
pub struct Check {
    /// Snapshot files (.json or .ron)
    #[arg(value_name = "FILE", required = true)]
    paths: Vec<PathBuf>,
}

impl Check {
    pub fn execute(self) -> Result<()> {
        let mut failed = 0;

        for path in &self.paths {
            let problems = match utils::load_snapshot(path) {
                Ok(snapshot) => problems(&snapshot),
                Err(err) => vec![format!("{err:#}")],
            };

            if problems.is_empty() {
                println!("{} {}", style("✓").green().bold(), path.display());
            } else {
                failed += 1;
                println!("{} {}", style("✗").red().bold(), path.display());
                for problem in problems {
                    println!("    {} {}", style("→").red(), problem);
                }
            }
        }

        if failed > 0 {
            anyhow::bail!("{} of {} snapshot(s) failed", failed, self.paths.len());
        }
        Ok(())
    }
}

/// Every violated invariant, in a stable order.
fn problems(snapshot: &BattleSnapshot) -> Vec<String> {
    let mut problems = Vec::new();

    if let Err(err) = snapshot.validate() {
        problems.push(err.to_string());
    }
    if snapshot.battle_state == BattleState::Error {
        problems.push(format!("battle is in error state: {}", snapshot.battle_message));
    }

    for unit in &snapshot.units {
        if unit.stats.hp > unit.stats.max_hp {
            problems.push(format!("{} has hp above max", unit.id));
        }
    }

    if snapshot.is_started() {
        let active = snapshot
            .units
            .iter()
            .filter(|unit| unit.status == UnitStatus::Active)
            .count();
        let ongoing = snapshot.battle_state == BattleState::Ongoing;
        if ongoing && active > 1 {
            problems.push(format!("{active} units are active"));
        }
        if !ongoing && active > 0 {
            problems.push("a decided battle still has an active unit".to_string());
        }

        if ongoing {
            let queued: BTreeSet<UnitId> = snapshot.turn_order.iter().copied().collect();
            let living: BTreeSet<UnitId> = snapshot
                .units
                .iter()
                .filter(|unit| unit.is_alive())
                .map(|unit| unit.id)
                .collect();
            if queued.len() != snapshot.turn_order.len() {
                problems.push("turn order lists a unit twice".to_string());
            }
            if queued != living {
                problems.push("turn order differs from the living units".to_string());
            }
        }
    }

    if snapshot.team_resource > snapshot.max_team_resource {
        problems.push(format!(
            "team resource {} exceeds max {}",
            snapshot.team_resource, snapshot.max_team_resource
        ));
    }

    problems.dedup();
    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_content::ContentFactory;
    use battle_core::start_battle;

    #[test]
    fn fresh_and_started_battles_pass() {
        let snapshot = ContentFactory::bundled().load_battle("skirmish", None).unwrap();
        assert!(problems(&snapshot).is_empty());
        assert!(problems(&start_battle(&snapshot)).is_empty());
    }

    #[test]
    fn tampered_snapshots_are_reported() {
        let mut snapshot =
            start_battle(&ContentFactory::bundled().load_battle("skirmish", None).unwrap());
        snapshot.turn_order.pop();
        snapshot.team_resource = snapshot.max_team_resource + 1;
        let found = problems(&snapshot);
        assert!(found.iter().any(|p| p.contains("turn order")));
        assert!(found.iter().any(|p| p.contains("team resource")));
    }
}

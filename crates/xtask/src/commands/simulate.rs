//! Play a snapshot to the end
//!
//! Drives the full turn loop the way an orchestrator would: start phase,
//! action, end phase, end turn. Enemies use the engine's decision procedure;
//! allies basic-attack the weakest opponent in reach.

use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::PathBuf;

use battle_content::SnapshotLoader;
use battle_core::targeting::resolve_primary_targets;
use battle_core::{
    BattleEngine, BattleSnapshot, BattleState, Command, CommandRef, Team, TriggerPhase, UnitId,
};

use crate::utils;

/// Play a snapshot to the end with scripted allies
#[derive(Parser)]
pub struct Simulate {
    /// Snapshot file (.json or .ron); started automatically when needed
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Engine configuration TOML (defaults to the bundled config)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stop after this many turns
    #[arg(long, default_value_t = 200)]
    max_turns: u32,

    /// Save the final snapshot
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,
}

impl Simulate {
    pub fn execute(self) -> Result<()> {
        let engine = utils::engine(self.config.as_deref())?;
        let mut snapshot = utils::load_snapshot(&self.path)?;
        if !snapshot.is_started() {
            snapshot = engine.start_battle(&snapshot);
        }

        let mut turns = 0;
        while snapshot.battle_state == BattleState::Ongoing && turns < self.max_turns {
            snapshot = play_turn(&engine, &snapshot);
            turns += 1;
        }

        println!();
        println!(
            "{} {} after {} turns ({} rounds)",
            style("Result:").bold().cyan(),
            utils::state_label(snapshot.battle_state),
            turns,
            snapshot.round
        );
        if snapshot.battle_state == BattleState::Error {
            println!("{} {}", style("Error:").bold().red(), snapshot.battle_message);
        }
        if !snapshot.defeated_enemies.is_empty() {
            let names: Vec<String> = snapshot
                .defeated_enemies
                .iter()
                .filter_map(|id| snapshot.unit(*id).map(|unit| unit.name.clone()))
                .collect();
            println!("{} {}", style("Defeated:").bold().cyan(), names.join(", "));
        }

        if let Some(out) = &self.out {
            SnapshotLoader::save(out, &snapshot)?;
            println!("{} {}", style("Saved:").bold().cyan(), out.display());
        }
        Ok(())
    }
}

fn play_turn(engine: &BattleEngine, snapshot: &BattleSnapshot) -> BattleSnapshot {
    let Some(actor) = snapshot.active().cloned() else {
        return snapshot.clone();
    };
    let label = format!("R{}.{}", snapshot.round, snapshot.turn_in_round);

    let (next, _) = engine.process_phase(snapshot, TriggerPhase::StartOfTurn);
    let next = match actor.team {
        Team::Enemy => engine.decide_and_act(&next),
        Team::Ally => {
            let targets = weakest_in_reach(engine, &next, actor.id);
            engine.apply_action(&next, actor.id, CommandRef::BasicAttack, &targets)
        }
    };
    println!("{} {}", style(label).dim(), next.battle_message);

    let (next, _) = engine.process_phase(&next, TriggerPhase::EndOfTurn);
    engine.end_turn(&next)
}

/// Lowest-hp opponent the actor's basic attack can select, if any.
fn weakest_in_reach(
    engine: &BattleEngine,
    snapshot: &BattleSnapshot,
    actor: UnitId,
) -> Vec<UnitId> {
    let Some(unit) = snapshot.unit(actor) else {
        return Vec::new();
    };
    let command = unit
        .basic_attack()
        .cloned()
        .unwrap_or_else(|| Command::basic_attack(engine.config().reach(unit.role)));

    resolve_primary_targets(unit, &command, &snapshot.units)
        .into_iter()
        .filter_map(|id| snapshot.unit(id))
        .min_by_key(|target| (target.stats.hp, target.id))
        .map(|target| vec![target.id])
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_content::ContentFactory;
    use battle_core::EngineConfig;

    #[test]
    fn bundled_skirmish_never_errors() {
        let factory = ContentFactory::bundled();
        let engine = BattleEngine::new(factory.load_config().unwrap());
        let mut snapshot = engine.start_battle(&factory.load_battle("skirmish", None).unwrap());

        // Ranged units may stall once the ring is too small for their reach,
        // so only the absence of errors is guaranteed.
        for _ in 0..200 {
            if snapshot.battle_state != BattleState::Ongoing {
                break;
            }
            snapshot = play_turn(&engine, &snapshot);
            assert_ne!(snapshot.battle_state, BattleState::Error, "{}", snapshot.battle_message);
        }
        assert!(snapshot.round >= 1);
    }

    #[test]
    fn weakest_target_is_preferred() {
        let factory = ContentFactory::bundled();
        let engine = BattleEngine::new(EngineConfig::default());
        let snapshot = engine.start_battle(&factory.load_battle("ambush", None).unwrap());
        let Some(ally) = snapshot.living(Team::Ally).next().map(|unit| unit.id) else {
            panic!("roster has allies");
        };
        let picked = weakest_in_reach(&engine, &snapshot, ally);
        assert!(picked.len() <= 1);
        if let Some(target) = picked.first() {
            assert_eq!(snapshot.unit(*target).unwrap().team, Team::Enemy);
        }
    }
}

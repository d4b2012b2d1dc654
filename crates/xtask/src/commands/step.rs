//! Run one engine operation on a snapshot file
//!
//! Reads the snapshot, applies the chosen operation and writes the result
//! back (in place unless `--out` is given).

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;

use battle_content::SnapshotLoader;
use battle_core::{BattleSnapshot, CommandId, CommandRef, TriggerPhase, UnitId};

use crate::utils;

/// Run one engine operation on a snapshot file
#[derive(Parser)]
pub struct Step {
    /// Snapshot file (.json or .ron)
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Engine configuration TOML (defaults to the bundled config)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Write the result here instead of overwriting FILE
    #[arg(short, long, value_name = "FILE", global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    operation: Operation,
}

#[derive(Subcommand)]
enum Operation {
    /// Open round 1
    Start,
    /// Fire lingering effects for a trigger phase
    Phase {
        #[arg(value_enum)]
        phase: PhaseArg,
    },
    /// The active ally uses a command
    Act {
        /// Acting unit id
        #[arg(short, long)]
        actor: u32,
        /// Command id, or `basic` for the basic attack
        #[arg(short = 'm', long, default_value = "basic")]
        command: String,
        /// Primary target ids
        #[arg(short, long, num_args = 0..)]
        target: Vec<u32>,
    },
    /// The active enemy decides and acts
    Enemy,
    /// Close the active unit's turn
    EndTurn,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum PhaseArg {
    Start,
    End,
}

impl From<PhaseArg> for TriggerPhase {
    fn from(phase: PhaseArg) -> Self {
        match phase {
            PhaseArg::Start => TriggerPhase::StartOfTurn,
            PhaseArg::End => TriggerPhase::EndOfTurn,
        }
    }
}

impl Step {
    pub fn execute(self) -> Result<()> {
        let engine = utils::engine(self.config.as_deref())?;
        let snapshot = utils::load_snapshot(&self.path)?;

        let next: BattleSnapshot = match &self.operation {
            Operation::Start => engine.start_battle(&snapshot),
            Operation::Phase { phase } => {
                let (next, fired) = engine.process_phase(&snapshot, (*phase).into());
                println!(
                    "{} {}",
                    style("Effects fired:").bold().cyan(),
                    if fired { "yes" } else { "no" }
                );
                next
            }
            Operation::Act {
                actor,
                command,
                target,
            } => {
                let command = parse_command(command)?;
                let targets: Vec<UnitId> = target.iter().copied().map(UnitId).collect();
                engine.apply_action(&snapshot, UnitId(*actor), command, &targets)
            }
            Operation::Enemy => engine.decide_and_act(&snapshot),
            Operation::EndTurn => engine.end_turn(&snapshot),
        };

        let out = utils::output_path(&self.path, self.out.as_ref());
        SnapshotLoader::save(&out, &next)?;

        println!(
            "{} {}  round {} turn {}  nonce {} → {}",
            style("State:").bold().cyan(),
            utils::state_label(next.battle_state),
            next.round,
            next.turn_in_round,
            snapshot.rng.nonce,
            next.rng.nonce
        );
        utils::print_outcome(&next);
        println!("{} {}", style("Saved:").bold().cyan(), out.display());
        Ok(())
    }
}

fn parse_command(raw: &str) -> Result<CommandRef> {
    if raw.eq_ignore_ascii_case("basic") {
        return Ok(CommandRef::BasicAttack);
    }
    let id: u32 = raw
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid command '{}': expected an id or 'basic'", raw))?;
    Ok(CommandRef::Id(CommandId(id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_argument_forms() {
        assert_eq!(parse_command("basic").unwrap(), CommandRef::BasicAttack);
        assert_eq!(parse_command("BASIC").unwrap(), CommandRef::BasicAttack);
        assert_eq!(
            parse_command("7").unwrap(),
            CommandRef::Id(CommandId(7))
        );
        assert!(parse_command("fireball").is_err());
    }
}

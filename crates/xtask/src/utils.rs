//! Utility functions for xtask commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use battle_content::{ConfigLoader, ContentFactory, SnapshotLoader};
use battle_core::{BattleEngine, BattleSnapshot, BattleState, EngineConfig, Team, UnitStatus};
use console::style;

/// Engine built from `--config`, or from the bundled content when absent.
pub fn engine(config: Option<&Path>) -> Result<BattleEngine> {
    let config: EngineConfig = match config {
        Some(path) => ConfigLoader::load(path)?,
        None => ContentFactory::bundled().load_config()?,
    };
    Ok(BattleEngine::new(config))
}

pub fn load_snapshot(path: &Path) -> Result<BattleSnapshot> {
    if !path.exists() {
        anyhow::bail!("Snapshot file not found: {}", path.display());
    }
    SnapshotLoader::load(path).with_context(|| format!("Failed to load {}", path.display()))
}

/// `--out` when given, otherwise the input path.
pub fn output_path(input: &Path, out: Option<&PathBuf>) -> PathBuf {
    out.cloned().unwrap_or_else(|| input.to_path_buf())
}

pub fn digest_hex(snapshot: &BattleSnapshot) -> String {
    hex::encode(snapshot.digest())
}

/// One-screen view of a snapshot.
pub fn print_summary(snapshot: &BattleSnapshot) {
    println!("{}", style("=== Battle Summary ===").bold().green());
    println!();

    println!("{}", style("Turn Information:").bold().yellow());
    println!("  State: {}", state_label(snapshot.battle_state));
    println!(
        "  Round: {}  Turn: {}",
        snapshot.round, snapshot.turn_in_round
    );
    match snapshot.active() {
        Some(unit) => println!("  Active: {} ({})", unit.name, unit.id),
        None => println!("  Active: -"),
    }
    let order: Vec<String> = snapshot
        .turn_order
        .iter()
        .map(|id| {
            snapshot
                .unit(*id)
                .map_or_else(|| id.to_string(), |unit| unit.name.clone())
        })
        .collect();
    println!("  Order: {}", order.join(" → "));
    println!(
        "  Team Resource: {}/{}",
        snapshot.team_resource, snapshot.max_team_resource
    );
    println!("  Nonce: {}", snapshot.rng.nonce);
    println!();

    for team in [Team::Ally, Team::Enemy] {
        println!("{}", style(format!("{team}:")).bold().yellow());
        for unit in snapshot.units.iter().filter(|unit| unit.team == team) {
            let status = match unit.status {
                UnitStatus::Active => style(unit.status.to_string()).green().bold(),
                UnitStatus::Defeated => style(unit.status.to_string()).red(),
                _ => style(unit.status.to_string()).dim(),
            };
            print!(
                "  {:>4} {:<12} HP {:>4}/{:<4} SH {:<3} pos {:>3}  {}",
                unit.id.to_string(),
                unit.name,
                unit.stats.hp,
                unit.stats.max_hp,
                unit.stats.shield_hp,
                unit.pseudo_position,
                status
            );
            let view = snapshot.status_view(unit.id);
            for entry in view.buffs.iter() {
                print!("  {}", style(format!("+{}({})", entry.name, entry.duration)).cyan());
            }
            for entry in view.debuffs.iter() {
                print!("  {}", style(format!("-{}({})", entry.name, entry.duration)).magenta());
            }
            println!();
        }
        println!();
    }

    print_outcome(snapshot);
}

/// Message and last action lines.
pub fn print_outcome(snapshot: &BattleSnapshot) {
    if !snapshot.battle_message.is_empty() {
        println!("{} {}", style("Message:").bold().cyan(), snapshot.battle_message);
    }
    if let Some(summary) = &snapshot.last_action {
        println!(
            "{} {} [{}] {}",
            style("Last Action:").bold().cyan(),
            summary.command,
            summary.outcome,
            summary.effects_summary
        );
    }
}

pub fn state_label(state: BattleState) -> console::StyledObject<String> {
    let label = state.to_string();
    match state {
        BattleState::Ongoing => style(label).yellow(),
        BattleState::Win => style(label).green().bold(),
        BattleState::Lose | BattleState::Error => style(label).red().bold(),
        BattleState::Draw => style(label).dim(),
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

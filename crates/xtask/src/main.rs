//! Development tasks for the battle engine
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod dirs;
mod utils;

use anyhow::Result;
use clap::Parser;
use commands::{Check, Clean, NewBattle, ReadSnapshot, Simulate, Step};
use tracing_subscriber::EnvFilter;

/// Development tasks for the battle engine
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for battle snapshots", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Build a snapshot from a roster file
    NewBattle(NewBattle),

    /// Read and inspect a snapshot file
    ReadSnapshot(ReadSnapshot),

    /// Run one engine operation on a snapshot file
    Step(Step),

    /// Play a snapshot to the end with scripted allies
    Simulate(Simulate),

    /// Validate snapshot invariants
    Check(Check),

    /// Delete saved snapshots
    Clean(Clean),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for BATTLE_DATA_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::NewBattle(cmd) => cmd.execute(),
        Command::ReadSnapshot(cmd) => cmd.execute(),
        Command::Step(cmd) => cmd.execute(),
        Command::Simulate(cmd) => cmd.execute(),
        Command::Check(cmd) => cmd.execute(),
        Command::Clean(cmd) => cmd.execute(),
    }
}

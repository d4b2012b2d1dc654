//! Read and inspect snapshot files
//!
//! Loads a JSON or RON snapshot and displays its contents.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use battle_core::BattleSnapshot;

use crate::utils;

/// Read and inspect a snapshot file
#[derive(Parser)]
pub struct ReadSnapshot {
    /// Snapshot file (.json or .ron)
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Summary view (turn info, unit table, last action)
    Summary,
    /// Full JSON output
    Json,
    /// Pretty-printed debug format
    Debug,
}

impl ReadSnapshot {
    pub fn execute(self) -> Result<()> {
        let snapshot = utils::load_snapshot(&self.path)?;
        let size = std::fs::metadata(&self.path)
            .with_context(|| format!("Failed to stat {}", self.path.display()))?
            .len();

        println!(
            "{} {}",
            style("Snapshot File:").bold().cyan(),
            self.path.display()
        );
        println!(
            "{} {}",
            style("File Size:").bold().cyan(),
            utils::format_bytes(size)
        );
        println!(
            "{} {}",
            style("Digest:").bold().cyan(),
            utils::digest_hex(&snapshot)
        );
        println!();

        match self.format {
            OutputFormat::Summary => utils::print_summary(&snapshot),
            OutputFormat::Json => print_json(&snapshot)?,
            OutputFormat::Debug => println!("{:#?}", snapshot),
        }

        Ok(())
    }
}

fn print_json(snapshot: &BattleSnapshot) -> Result<()> {
    let json =
        serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot to JSON")?;
    println!("{}", json);
    Ok(())
}

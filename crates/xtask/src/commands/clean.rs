//! Delete saved snapshots
//!
//! Removes the battles directory that `new-battle` writes to when no `--out`
//! is given.
//!
//! Safety: Always prompts for confirmation before deletion.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::io::{self, Write};

use crate::dirs;

/// Delete saved snapshots
#[derive(Parser, Debug)]
pub struct Clean {
    /// Skip confirmation prompt (dangerous!)
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl Clean {
    pub fn execute(self) -> Result<()> {
        let battles = dirs::battles_dir()?;
        if !battles.exists() {
            println!(
                "{}",
                style("Nothing to clean - no saved battles yet").dim()
            );
            return Ok(());
        }

        let count = std::fs::read_dir(&battles)
            .with_context(|| format!("Failed to read {}", battles.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .count();

        println!("{}", style("Clean Saved Battles").yellow().bold());
        println!();
        println!("The following will be deleted:");
        println!(
            "  {} {} snapshot file(s)",
            style("→").cyan(),
            style(count).bold()
        );
        println!("    {}", style(battles.display()).dim());
        println!();

        if !self.yes && !confirm()? {
            println!("{}", style("Cancelled").dim());
            return Ok(());
        }

        std::fs::remove_dir_all(&battles)
            .with_context(|| format!("Failed to delete: {}", battles.display()))?;
        println!("{}", style("✓ Cleanup complete!").green().bold());
        Ok(())
    }
}

/// Prompt user for confirmation
fn confirm() -> Result<bool> {
    print!("{} ", style("Proceed? [y/N]").yellow().bold());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

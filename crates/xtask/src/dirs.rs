//! Platform-specific directory utilities
//!
//! Provides consistent directory paths across different operating systems,
//! following platform conventions for data directories.

use anyhow::Result;
use std::path::PathBuf;

/// Environment override for [`data_dir`].
pub const DATA_DIR_ENV: &str = "BATTLE_DATA_DIR";

/// Get the platform-specific data directory for saved battles
///
/// Follows platform conventions:
/// - macOS: `~/Library/Application Support/battle`
/// - Linux: `~/.local/share/battle` (or `$XDG_DATA_HOME/battle`)
/// - Windows: `%APPDATA%\battle`
/// - Fallback: `./battle_data`
///
/// `BATTLE_DATA_DIR` takes precedence when set.
pub fn data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV)
        && !dir.is_empty()
    {
        return Ok(PathBuf::from(dir));
    }

    let dir = directories::ProjectDirs::from("", "", "battle")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./battle_data"));

    Ok(dir)
}

/// Directory holding snapshots written by `new-battle` without `--out`.
pub fn battles_dir() -> Result<PathBuf> {
    Ok(data_dir()?.join("battles"))
}

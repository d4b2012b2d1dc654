//! Battle snapshot persistence.
//!
//! Snapshots travel between engine calls as JSON or RON. The format follows
//! the file extension.

use std::path::Path;

use battle_core::BattleSnapshot;

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Ron,
}

impl SnapshotFormat {
    /// `.json` or `.ron`, case-insensitive.
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("ron") => Ok(Self::Ron),
            _ => anyhow::bail!(
                "Unsupported snapshot file {} (expected .json or .ron)",
                path.display()
            ),
        }
    }

    pub fn decode(self, content: &str) -> LoadResult<BattleSnapshot> {
        match self {
            Self::Json => serde_json::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse snapshot JSON: {}", e)),
            Self::Ron => ron::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse snapshot RON: {}", e)),
        }
    }

    pub fn encode(self, snapshot: &BattleSnapshot) -> LoadResult<String> {
        match self {
            Self::Json => serde_json::to_string_pretty(snapshot)
                .map_err(|e| anyhow::anyhow!("Failed to encode snapshot JSON: {}", e)),
            Self::Ron => ron::ser::to_string_pretty(snapshot, ron::ser::PrettyConfig::default())
                .map_err(|e| anyhow::anyhow!("Failed to encode snapshot RON: {}", e)),
        }
    }
}

/// Reads and writes snapshot files.
pub struct SnapshotLoader;

impl SnapshotLoader {
    pub fn load(path: &Path) -> LoadResult<BattleSnapshot> {
        let format = SnapshotFormat::from_path(path)?;
        let content = read_file(path)?;
        format
            .decode(&content)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }

    pub fn save(path: &Path, snapshot: &BattleSnapshot) -> LoadResult<()> {
        let format = SnapshotFormat::from_path(path)?;
        let content = format.encode(snapshot)?;
        std::fs::write(path, content)
            .map_err(|e| anyhow::anyhow!("Failed to write file {}: {}", path.display(), e))?;
        tracing::debug!(
            target: "battle::content",
            path = %path.display(),
            round = snapshot.round,
            nonce = snapshot.rng.nonce,
            "snapshot saved"
        );
        Ok(())
    }
}

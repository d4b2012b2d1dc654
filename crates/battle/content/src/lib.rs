//! Data-driven battle content and loaders.
//!
//! This crate turns data files into values the rules engine consumes:
//! - Engine configuration (TOML)
//! - Command catalogs (RON)
//! - Rosters that become a fresh, not-yet-started battle (RON)
//! - Persisted battle snapshots (JSON or RON)
//!
//! Content never feeds back into the engine between calls; every loader
//! produces plain `battle-core` values.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CommandCatalog, ConfigLoader, ContentFactory, RosterFile, RosterLoader, SnapshotFormat,
    SnapshotLoader, UnitSpec,
};

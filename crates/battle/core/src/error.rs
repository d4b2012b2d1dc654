//! Common error infrastructure for battle-core.
//!
//! Every transition reports failures through its own `thiserror` enum. The
//! [`BattleError`] trait classifies them so the engine boundary can decide how
//! a failure shows up in the returned snapshot:
//!
//! - **Recoverable**: rule violation, the call becomes a no-op with a message
//! - **Validation**: malformed input, the snapshot moves to the `Error` state
//! - **Internal** / **Fatal**: broken invariants, also reported as `Error`

use crate::state::{ActionOutcome, UnitId};

/// Severity level of an error, used to map failures onto the snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Rule violation. The action is refused and the battle continues.
    ///
    /// Examples: insufficient team resource, actor already defeated
    Recoverable,

    /// Malformed input that the caller must fix.
    ///
    /// Examples: unknown actor, unknown command, acting out of turn
    Validation,

    /// Unexpected state inconsistency produced by the engine itself.
    Internal,

    /// Snapshot is corrupted beyond use.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Where in the battle an error surfaced. Captured at the engine boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Unit that triggered the error, if any.
    pub unit: Option<UnitId>,

    /// Round in which the error occurred.
    pub round: u32,

    /// Rng nonce at the time of the error. Identifies the call in a replay.
    pub nonce: u64,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(round: u32, nonce: u64) -> Self {
        Self {
            unit: None,
            round,
            nonce,
        }
    }

    #[must_use]
    pub const fn with_unit(mut self, unit: UnitId) -> Self {
        self.unit = Some(unit);
        self
    }
}

/// Common trait for all battle-core errors.
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity by how the boundary must react, not by impact
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    /// Typed outcome recorded on the last-action summary for rule violations.
    fn outcome(&self) -> ActionOutcome {
        ActionOutcome::Rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Internal.is_internal());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert_eq!(ErrorSeverity::Validation.as_str(), "validation");
    }

    #[test]
    fn context_builder_attaches_unit() {
        let ctx = ErrorContext::new(3, 17).with_unit(UnitId(4));
        assert_eq!(ctx.unit, Some(UnitId(4)));
        assert_eq!(ctx.round, 3);
        assert_eq!(ctx.nonce, 17);
    }
}

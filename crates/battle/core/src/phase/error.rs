use crate::error::{BattleError, ErrorSeverity};
use crate::state::SnapshotError;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhaseError {
    #[error("invalid snapshot: {0}")]
    Snapshot(SnapshotError),

    #[error("phase processing broke a snapshot invariant: {0}")]
    Invariant(SnapshotError),
}

impl BattleError for PhaseError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            PhaseError::Snapshot(_) => ErrorSeverity::Validation,
            PhaseError::Invariant(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            PhaseError::Snapshot(inner) => inner.error_code(),
            PhaseError::Invariant(_) => "PHASE_INVARIANT_VIOLATED",
        }
    }
}

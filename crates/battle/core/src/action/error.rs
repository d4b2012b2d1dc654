//! Action resolver errors.

use crate::command::CommandId;
use crate::error::{BattleError, ErrorSeverity};
use crate::state::{ActionOutcome, SnapshotError, UnitId};

// ============================================================================
// Action Errors
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    /// Input snapshot failed validation.
    #[error("invalid snapshot: {0}")]
    Snapshot(SnapshotError),

    #[error("actor {0} not found")]
    ActorNotFound(UnitId),

    #[error("actor {actor} does not hold the turn (active: {active:?})")]
    NotActorsTurn {
        actor: UnitId,
        active: Option<UnitId>,
    },

    #[error("actor {actor} has no command {command}")]
    CommandNotFound { actor: UnitId, command: CommandId },

    #[error("actor {0} is defeated")]
    ActorDefeated(UnitId),

    #[error("actor {0} has already acted this turn")]
    AlreadyActed(UnitId),

    #[error("actor {0} is stunned and cannot act")]
    Stunned(UnitId),

    #[error("insufficient resource: requires {required}, have {available}")]
    InsufficientResource { required: u32, available: u32 },

    #[error("no valid target selected")]
    NoValidTarget,

    /// The action left the snapshot in an inconsistent state.
    #[error("action broke a snapshot invariant: {0}")]
    Invariant(SnapshotError),
}

impl BattleError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        use ActionError::*;
        match self {
            Snapshot(_) | ActorNotFound(_) | NotActorsTurn { .. } | CommandNotFound { .. } => {
                ErrorSeverity::Validation
            }
            ActorDefeated(_) | AlreadyActed(_) | Stunned(_) => ErrorSeverity::Recoverable,
            InsufficientResource { .. } | NoValidTarget => ErrorSeverity::Recoverable,
            Invariant(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            Snapshot(inner) => inner.error_code(),
            ActorNotFound(_) => "ACTION_ACTOR_NOT_FOUND",
            NotActorsTurn { .. } => "ACTION_NOT_ACTORS_TURN",
            CommandNotFound { .. } => "ACTION_COMMAND_NOT_FOUND",
            ActorDefeated(_) => "ACTION_ACTOR_DEFEATED",
            AlreadyActed(_) => "ACTION_ALREADY_ACTED",
            Stunned(_) => "ACTION_STUNNED",
            InsufficientResource { .. } => "ACTION_INSUFFICIENT_RESOURCE",
            NoValidTarget => "ACTION_NO_VALID_TARGET",
            Invariant(_) => "ACTION_INVARIANT_VIOLATED",
        }
    }

    fn outcome(&self) -> ActionOutcome {
        use ActionError::*;
        match self {
            ActorDefeated(_) => ActionOutcome::ActorDefeated,
            Stunned(_) => ActionOutcome::Stunned,
            InsufficientResource { .. } => ActionOutcome::InsufficientResource,
            NoValidTarget => ActionOutcome::NoValidTarget,
            _ => ActionOutcome::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_violations_are_recoverable() {
        let error = ActionError::InsufficientResource {
            required: 3,
            available: 1,
        };
        assert!(error.severity().is_recoverable());
        assert_eq!(error.outcome(), ActionOutcome::InsufficientResource);
        assert!(error.to_string().starts_with("insufficient resource"));
    }

    #[test]
    fn malformed_input_is_validation() {
        let error = ActionError::ActorNotFound(UnitId(9));
        assert_eq!(error.severity(), ErrorSeverity::Validation);
        assert_eq!(error.error_code(), "ACTION_ACTOR_NOT_FOUND");

        let error = ActionError::Snapshot(SnapshotError::NotStarted);
        assert_eq!(error.error_code(), "SNAPSHOT_NOT_STARTED");
    }
}

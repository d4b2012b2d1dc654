use crate::error::{BattleError, ErrorSeverity};
use crate::state::{ActionOutcome, SnapshotError, UnitId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecisionError {
    #[error("invalid snapshot: {0}")]
    Snapshot(SnapshotError),

    #[error("active unit {0} is not an enemy")]
    NotEnemyTurn(UnitId),

    #[error("enemy {0} is defeated")]
    ActorDefeated(UnitId),

    #[error("enemy {0} has already acted this turn")]
    AlreadyActed(UnitId),

    #[error("enemy action broke a snapshot invariant: {0}")]
    Invariant(SnapshotError),
}

impl BattleError for DecisionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            DecisionError::Snapshot(_) | DecisionError::NotEnemyTurn(_) => {
                ErrorSeverity::Validation
            }
            DecisionError::ActorDefeated(_) | DecisionError::AlreadyActed(_) => {
                ErrorSeverity::Recoverable
            }
            DecisionError::Invariant(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            DecisionError::Snapshot(inner) => inner.error_code(),
            DecisionError::NotEnemyTurn(_) => "DECISION_NOT_ENEMY_TURN",
            DecisionError::ActorDefeated(_) => "DECISION_ACTOR_DEFEATED",
            DecisionError::AlreadyActed(_) => "DECISION_ALREADY_ACTED",
            DecisionError::Invariant(_) => "DECISION_INVARIANT_VIOLATED",
        }
    }

    fn outcome(&self) -> ActionOutcome {
        match self {
            DecisionError::ActorDefeated(_) => ActionOutcome::ActorDefeated,
            _ => ActionOutcome::Rejected,
        }
    }
}

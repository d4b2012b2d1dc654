//! Snapshot validation errors.

use crate::error::{BattleError, ErrorSeverity};

use super::{EffectId, Team, UnitId};

/// Structural problems detected by [`BattleSnapshot::validate`].
///
/// [`BattleSnapshot::validate`]: super::BattleSnapshot::validate
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SnapshotError {
    #[error("roster has {count} units, more than the limit of {limit}")]
    TooManyUnits { count: usize, limit: usize },

    #[error("unit {0} appears more than once in the roster")]
    DuplicateUnit(UnitId),

    #[error("unit {unit} has hp {hp} above max_hp {max_hp}")]
    HpAboveMax { unit: UnitId, hp: u32, max_hp: u32 },

    #[error("unit {0} has hp 0 but is not defeated, or is defeated with hp left")]
    DefeatMismatch(UnitId),

    #[error("unit {unit} carries {count} commands, more than the limit of {limit}")]
    TooManyCommands {
        unit: UnitId,
        count: usize,
        limit: usize,
    },

    #[error("team resource {value} exceeds the maximum {max}")]
    ResourceAboveMax { value: u32, max: u32 },

    #[error("turn order lists {0} more than once")]
    DuplicateInTurnOrder(UnitId),

    #[error("turn order does not match the living roster")]
    TurnOrderMismatch,

    #[error("turn order head does not hold the active unit {0}")]
    TurnOrderHead(UnitId),

    #[error("active unit pointer is missing while the battle is ongoing")]
    MissingActiveUnit,

    #[error("active unit pointer {0} names no unit in the roster")]
    UnknownActiveUnit(UnitId),

    #[error("unit {0} is marked active but does not hold the turn")]
    StrayActiveUnit(UnitId),

    #[error("battle has not started but unit {0} is active")]
    ActiveBeforeStart(UnitId),

    #[error("battle is decided but unit {0} is still active")]
    ActiveAfterEnd(UnitId),

    #[error("effect {effect} is bound to missing or defeated unit {unit}")]
    DanglingEffect { effect: EffectId, unit: UnitId },

    #[error("lingering effect store holds {count} effects, more than the limit of {limit}")]
    TooManyEffects { count: usize, limit: usize },

    #[error("the {0} team has no living units")]
    EmptyTeam(Team),

    #[error("battle has not started")]
    NotStarted,

    #[error("battle has already started")]
    AlreadyStarted,
}

impl BattleError for SnapshotError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use SnapshotError::*;
        match self {
            TooManyUnits { .. } => "SNAPSHOT_TOO_MANY_UNITS",
            DuplicateUnit(_) => "SNAPSHOT_DUPLICATE_UNIT",
            HpAboveMax { .. } => "SNAPSHOT_HP_ABOVE_MAX",
            DefeatMismatch(_) => "SNAPSHOT_DEFEAT_MISMATCH",
            TooManyCommands { .. } => "SNAPSHOT_TOO_MANY_COMMANDS",
            ResourceAboveMax { .. } => "SNAPSHOT_RESOURCE_ABOVE_MAX",
            DuplicateInTurnOrder(_) => "SNAPSHOT_DUPLICATE_IN_TURN_ORDER",
            TurnOrderMismatch => "SNAPSHOT_TURN_ORDER_MISMATCH",
            TurnOrderHead(_) => "SNAPSHOT_TURN_ORDER_HEAD",
            MissingActiveUnit => "SNAPSHOT_MISSING_ACTIVE_UNIT",
            UnknownActiveUnit(_) => "SNAPSHOT_UNKNOWN_ACTIVE_UNIT",
            StrayActiveUnit(_) => "SNAPSHOT_STRAY_ACTIVE_UNIT",
            ActiveBeforeStart(_) => "SNAPSHOT_ACTIVE_BEFORE_START",
            ActiveAfterEnd(_) => "SNAPSHOT_ACTIVE_AFTER_END",
            DanglingEffect { .. } => "SNAPSHOT_DANGLING_EFFECT",
            TooManyEffects { .. } => "SNAPSHOT_TOO_MANY_EFFECTS",
            EmptyTeam(_) => "SNAPSHOT_EMPTY_TEAM",
            NotStarted => "SNAPSHOT_NOT_STARTED",
            AlreadyStarted => "SNAPSHOT_ALREADY_STARTED",
        }
    }
}

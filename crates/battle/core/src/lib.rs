//! Deterministic rules engine for pseudo-positional, turn-based battles.
//!
//! `battle-core` resolves turn order, targeting geometry, command effects and
//! lingering status effects over a serializable [`BattleSnapshot`]. Every
//! operation is a pure function from a snapshot (plus inputs) to the next
//! snapshot; the caller decides which operation to invoke and persists the
//! result between calls. All operations go through [`engine::BattleEngine`].
pub mod action;
pub mod ai;
pub mod combat;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod phase;
pub mod rng;
pub mod state;
pub mod targeting;
pub mod transition;

#[cfg(test)]
pub(crate) mod fixtures;

pub use action::{ActionError, UseCommand};
pub use ai::{DecideAndAct, DecisionError};
pub use command::{
    ActAgainTrigger, Area, AreaShape, Command, CommandId, CommandKind, CommandRef, Direction,
    EffectKind, EffectScope, EffectSpec, Origin, Selection, SelectionPattern, TargetTypes,
    TargetingParams,
};
pub use config::{EngineConfig, ShieldCapPolicy};
pub use engine::{
    BattleEngine, EndTurn, StartBattle, TransitionPhase, TransitionPhaseError, TurnError,
    apply_action, decide_and_act, end_turn, process_phase, start_battle,
};
pub use error::{BattleError, ErrorContext, ErrorSeverity};
pub use phase::{PhaseError, ProcessPhase};
pub use rng::{PcgRng, RngOracle};
pub use state::{
    ActionOutcome, BattleSnapshot, BattleState, Combatant, EffectGrant, EffectId, EffectSource,
    EffectTarget, LastActionSummary, LingeringEffect, Polarity, RngState, Role, SnapshotError,
    Stats, StatusEntry, StatusKind, StatusView, Team, TeamScope, TriggerPhase, TurnFlags, UnitId,
    UnitStatus,
};
pub use transition::{BattleEnv, BattleTransition};

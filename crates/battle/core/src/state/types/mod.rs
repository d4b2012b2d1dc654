mod common;
mod effect;
mod summary;
mod turn;
mod unit;

pub use common::{EffectId, Role, Team, UnitId};
pub use effect::{
    EffectGrant, EffectSource, EffectTarget, LingeringEffect, Polarity, StatusEntry, StatusKind,
    StatusView, TeamScope, TriggerPhase,
};
pub use summary::{ActionOutcome, LastActionSummary};
pub use turn::{BattleState, RngState, TurnFlags};
pub use unit::{Combatant, Stats, UnitStatus};

//! Lingering effects.
//!
//! Every lingering effect lives exactly once in [`BattleSnapshot::effects`].
//! Per-unit buff/debuff lists are derived on demand through
//! [`BattleSnapshot::status_view`], so there is no mirror to keep in sync.
//!
//! Two ownership models exist and are upkept differently by the scheduler:
//!
//! - [`EffectTarget::Unit`]: decremented once at the end of the bound unit's
//!   own turn and dropped when that unit is defeated.
//! - [`EffectTarget::Team`]: decremented once whenever any unit of the scoped
//!   team ends its turn.
//!
//! [`BattleSnapshot::effects`]: crate::state::BattleSnapshot::effects
//! [`BattleSnapshot::status_view`]: crate::state::BattleSnapshot::status_view

use super::common::{EffectId, Team, UnitId};

/// Checkpoint at which a lingering effect fires.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TriggerPhase {
    #[default]
    StartOfTurn,
    EndOfTurn,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Polarity {
    Buff,
    Debuff,
}

/// What a lingering effect does when its phase fires.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    /// The unit cannot act this turn.
    Stun,
    /// Direct hp loss that ignores shields.
    DamageOverTime { amount: u32 },
    /// Random gain in `[min, max]` to the team resource pool.
    ResourceOverTime { min: u32, max: u32 },
    /// Named passive status with no phase behaviour of its own.
    Marker { name: String },
}

impl StatusKind {
    /// Display name, also the identity used when refreshing a status.
    pub fn name(&self) -> &str {
        match self {
            Self::Stun => "Stun",
            Self::DamageOverTime { .. } => "DamageOverTime",
            Self::ResourceOverTime { .. } => "ResourceOverTime",
            Self::Marker { name } => name,
        }
    }

    /// Markers never fire on a phase.
    pub fn is_passive(&self) -> bool {
        matches!(self, Self::Marker { .. })
    }
}

/// Team an effect is scoped to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TeamScope {
    TeamAllies,
    TeamEnemies,
}

impl TeamScope {
    pub const fn team(self) -> Team {
        match self {
            Self::TeamAllies => Team::Ally,
            Self::TeamEnemies => Team::Enemy,
        }
    }

    pub const fn of(team: Team) -> Self {
        match team {
            Team::Ally => Self::TeamAllies,
            Team::Enemy => Self::TeamEnemies,
        }
    }
}

/// Owner of a lingering effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectTarget {
    Unit(UnitId),
    Team(TeamScope),
}

/// Who created a lingering effect.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectSource {
    Unit(UnitId),
    /// Consumable or scripted item, by name.
    Item(String),
    #[default]
    System,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LingeringEffect {
    pub id: EffectId,
    pub kind: StatusKind,
    pub polarity: Polarity,
    pub trigger: TriggerPhase,
    pub target: EffectTarget,
    /// Turns remaining. Only upkeep decrements it.
    pub duration: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub source: EffectSource,
}

impl LingeringEffect {
    pub fn targets_unit(&self, unit: UnitId) -> bool {
        self.target == EffectTarget::Unit(unit)
    }

    pub fn targets_team(&self, team: Team) -> bool {
        matches!(self.target, EffectTarget::Team(scope) if scope.team() == team)
    }
}

/// A new lingering effect before the store assigns its id.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectGrant {
    pub kind: StatusKind,
    pub polarity: Polarity,
    pub trigger: TriggerPhase,
    pub target: EffectTarget,
    pub duration: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub source: EffectSource,
}

/// One line of a unit's buff or debuff list.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEntry {
    pub name: String,
    pub duration: u32,
    pub source: EffectSource,
}

/// Computed per-unit view over the lingering-effect store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusView {
    pub buffs: Vec<StatusEntry>,
    pub debuffs: Vec<StatusEntry>,
}

impl StatusView {
    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty() && self.debuffs.is_empty()
    }

    pub fn debuff(&self, name: &str) -> Option<&StatusEntry> {
        self.debuffs.iter().find(|entry| entry.name == name)
    }

    pub fn buff(&self, name: &str) -> Option<&StatusEntry> {
        self.buffs.iter().find(|entry| entry.name == name)
    }
}

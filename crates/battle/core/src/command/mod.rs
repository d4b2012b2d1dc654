//! Command catalog types.
//!
//! Commands are static data authored outside the engine and attached to each
//! combatant. The engine reads them but never changes their shape.

mod effect;
mod targeting;

use std::fmt;

pub use effect::{ActAgainTrigger, EffectKind, EffectScope, EffectSpec};
pub use targeting::{
    Area, AreaShape, Direction, Origin, Selection, SelectionPattern, TargetTypes, TargetingParams,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CommandId(pub u32);

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cmd{}", self.0)
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CommandKind {
    /// Free; grants team resource.
    BasicAttack,
    Skill,
    Ultimate,
}

impl CommandKind {
    /// Skills and ultimates draw from the team resource pool.
    pub const fn spends_resource(self) -> bool {
        matches!(self, Self::Skill | Self::Ultimate)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Command {
    pub id: CommandId,
    pub name: String,
    pub kind: CommandKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resource_cost: u32,
    pub targeting: TargetingParams,
    /// Applied in order.
    pub effects: Vec<EffectSpec>,
}

impl Command {
    /// Reserved id of the synthesized basic attack.
    pub const BASIC_ATTACK_ID: CommandId = CommandId(0);

    pub fn new(
        id: CommandId,
        name: impl Into<String>,
        kind: CommandKind,
        targeting: TargetingParams,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            resource_cost: 0,
            targeting,
            effects: Vec::new(),
        }
    }

    pub fn with_cost(mut self, resource_cost: u32) -> Self {
        self.resource_cost = resource_cost;
        self
    }

    pub fn with_effect(mut self, effect: EffectSpec) -> Self {
        self.effects.push(effect);
        self
    }

    /// Basic attack for units whose catalog defines none: one hit at exactly
    /// `reach` pseudo-positions forward or backward, against opponents only.
    pub fn basic_attack(reach: u32) -> Self {
        let reach = i32::try_from(reach).unwrap_or(i32::MAX);
        let pattern = SelectionPattern::SpecificPositions {
            offsets: vec![-reach, reach],
            circular: false,
        };
        Self::new(
            Self::BASIC_ATTACK_ID,
            "Basic Attack",
            CommandKind::BasicAttack,
            TargetingParams::single(pattern, TargetTypes::ENEMY),
        )
        .with_effect(EffectSpec::damage(1.0))
    }

    /// True when the action cannot proceed without a primary target.
    pub fn requires_selection(&self) -> bool {
        self.targeting.area.origin == Origin::Selected
    }
}

/// How a caller names the command to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandRef {
    Id(CommandId),
    /// The actor's basic attack, synthesized from its role when its catalog
    /// has none.
    BasicAttack,
}

impl fmt::Display for CommandRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => id.fmt(f),
            Self::BasicAttack => f.write_str("basic_attack"),
        }
    }
}

impl From<CommandId> for CommandRef {
    fn from(id: CommandId) -> Self {
        Self::Id(id)
    }
}

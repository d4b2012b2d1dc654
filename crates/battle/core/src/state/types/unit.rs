//! Combatant state.

use crate::command::{Command, CommandId, CommandKind};

use super::common::{Role, Team, UnitId};

/// Turn lifecycle of a combatant.
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
pub enum UnitStatus {
    /// Alive and still waiting for its turn this round.
    #[default]
    Idle,
    /// Currently holding the turn.
    Active,
    /// Already acted this round.
    EndTurn,
    /// `hp == 0`. Never present in the turn order.
    Defeated,
}

/// Combat statistics consumed by the engine.
///
/// The engine never computes these from levels or gear; an external
/// initializer supplies them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub hp: u32,
    pub max_hp: u32,
    pub atk: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shield_hp: u32,
}

impl Stats {
    /// Full-health stats with no shield.
    pub fn new(max_hp: u32, atk: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            atk,
            shield_hp: 0,
        }
    }

    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = hp;
        self
    }

    pub fn with_shield(mut self, shield_hp: u32) -> Self {
        self.shield_hp = shield_hp;
        self
    }
}

/// A unit taking part in the battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: UnitId,
    pub name: String,
    pub team: Team,
    #[cfg_attr(feature = "serde", serde(default))]
    pub role: Role,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: UnitStatus,
    pub stats: Stats,
    /// Signed offset from the active unit on the circular track.
    /// Recomputed by the scheduler every turn.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pseudo_position: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub commands: Vec<Command>,
}

impl Combatant {
    pub fn new(id: UnitId, name: impl Into<String>, team: Team, role: Role, stats: Stats) -> Self {
        let status = if stats.hp == 0 {
            UnitStatus::Defeated
        } else {
            UnitStatus::Idle
        };
        Self {
            id,
            name: name.into(),
            team,
            role,
            status,
            stats,
            pseudo_position: 0,
            commands: Vec::new(),
        }
    }

    pub fn with_commands(mut self, commands: impl IntoIterator<Item = Command>) -> Self {
        self.commands = commands.into_iter().collect();
        self
    }

    pub fn with_pseudo_position(mut self, pseudo_position: i32) -> Self {
        self.pseudo_position = pseudo_position;
        self
    }

    #[inline]
    pub fn is_defeated(&self) -> bool {
        self.status == UnitStatus::Defeated
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.is_defeated()
    }

    pub fn command(&self, id: CommandId) -> Option<&Command> {
        self.commands.iter().find(|command| command.id == id)
    }

    /// The unit's own basic-attack command, if its catalog defines one.
    pub fn basic_attack(&self) -> Option<&Command> {
        self.commands
            .iter()
            .find(|command| command.kind == CommandKind::BasicAttack)
    }
}

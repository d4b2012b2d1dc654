use bitflags::bitflags;

/// Lifecycle of the encounter.
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
pub enum BattleState {
    #[default]
    Ongoing,
    Win,
    Lose,
    Draw,
    /// Malformed input was received. The snapshot is kept for diagnosis.
    Error,
}

impl BattleState {
    /// Win, Lose or Draw.
    pub const fn is_decided(self) -> bool {
        matches!(self, Self::Win | Self::Lose | Self::Draw)
    }
}

bitflags! {
    /// One-shot flags scoped to the current turn.
    ///
    /// Cleared by the scheduler whenever the turn passes or is re-granted.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TurnFlags: u8 {
        /// A stun fired this turn. The active unit may not act.
        const STUNNED   = 1 << 0;
        /// The active unit keeps the turn at the next `end_turn`.
        const ACT_AGAIN = 1 << 1;
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TurnFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bitflags::serde::serialize(self, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TurnFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bitflags::serde::deserialize(deserializer)
    }
}

/// Deterministic randomness carried by the snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RngState {
    /// Fixed for the whole battle.
    pub seed: u64,
    /// Advanced once by every successful engine call.
    pub nonce: u64,
}

impl RngState {
    pub const fn new(seed: u64) -> Self {
        Self { seed, nonce: 0 }
    }
}

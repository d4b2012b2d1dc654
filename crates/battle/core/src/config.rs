/// Upper bound applied to accumulated shield points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ShieldCapPolicy {
    /// Shields stack without limit.
    #[default]
    Uncapped,
    /// Shields never exceed the holder's `max_hp`.
    MaxHp,
    /// Shields never exceed a fixed amount.
    Fixed(u32),
}

impl ShieldCapPolicy {
    /// Clamps a prospective shield total for a unit with the given `max_hp`.
    pub fn clamp(self, shield: u32, max_hp: u32) -> u32 {
        match self {
            Self::Uncapped => shield,
            Self::MaxHp => shield.min(max_hp),
            Self::Fixed(cap) => shield.min(cap),
        }
    }
}

/// Rule constants and tunable parameters for the battle engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Pseudo-position distance a melee unit reaches with its basic attack.
    pub melee_reach: u32,
    /// Pseudo-position distance a ranged unit reaches with its basic attack.
    pub ranged_reach: u32,
    /// Team resource granted to the ally pool by every basic attack.
    pub basic_attack_resource_gain: u32,
    pub shield_cap: ShieldCapPolicy,
}

impl EngineConfig {
    // ===== compile-time limits checked by snapshot validation =====
    pub const MAX_UNITS: usize = 32;
    pub const MAX_COMMANDS: usize = 8;
    pub const MAX_LINGERING_EFFECTS: usize = 128;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MELEE_REACH: u32 = 1;
    pub const DEFAULT_RANGED_REACH: u32 = 2;
    pub const DEFAULT_BASIC_ATTACK_RESOURCE_GAIN: u32 = 1;

    pub fn new() -> Self {
        Self {
            melee_reach: Self::DEFAULT_MELEE_REACH,
            ranged_reach: Self::DEFAULT_RANGED_REACH,
            basic_attack_resource_gain: Self::DEFAULT_BASIC_ATTACK_RESOURCE_GAIN,
            shield_cap: ShieldCapPolicy::Uncapped,
        }
    }

    pub fn with_shield_cap(mut self, shield_cap: ShieldCapPolicy) -> Self {
        self.shield_cap = shield_cap;
        self
    }

    /// Basic-attack reach for a role.
    pub fn reach(&self, role: crate::state::Role) -> u32 {
        match role {
            crate::state::Role::Melee => self.melee_reach,
            crate::state::Role::Ranged => self.ranged_reach,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

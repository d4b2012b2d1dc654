//! Effect specifications carried by commands.

use crate::state::{Polarity, StatusKind, TeamScope, TriggerPhase};

/// Which units an effect spec is applied to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EffectScope {
    Caster,
    /// The resolved area of effect.
    #[default]
    Targets,
    /// Opponents at order-index distance 1 from the caster.
    CasterAdjacentEnemies,
    /// Living member of the caster's team with the lowest hp.
    LowestHpAlly,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActAgainTrigger {
    #[default]
    Always,
    /// Only when this action defeated at least one unit.
    OnDefeat,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// `round(atk * multiplier)`, shield first, then hp.
    Damage { multiplier: f32 },
    /// `round(atk * multiplier) + flat`, clamped to `max_hp`.
    Heal {
        multiplier: f32,
        #[cfg_attr(feature = "serde", serde(default))]
        flat: u32,
    },
    /// `round(atk * multiplier) + flat`, bounded by the configured shield cap.
    Shield {
        multiplier: f32,
        #[cfg_attr(feature = "serde", serde(default))]
        flat: u32,
    },
    /// Bernoulli roll at `chance`; on success the status is added or refreshed.
    ApplyStatus {
        status: StatusKind,
        polarity: Polarity,
        duration: u32,
        chance: f32,
        #[cfg_attr(feature = "serde", serde(default))]
        trigger: TriggerPhase,
    },
    /// Only affects defeated targets.
    Revive { hp_percentage: f32 },
    ActAgain {
        #[cfg_attr(feature = "serde", serde(default))]
        trigger: ActAgainTrigger,
    },
    /// Registers a team-scoped lingering effect. Ignores `EffectSpec::scope`.
    TeamEffect {
        status: StatusKind,
        polarity: Polarity,
        team: TeamScope,
        duration: u32,
        #[cfg_attr(feature = "serde", serde(default))]
        trigger: TriggerPhase,
    },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSpec {
    pub kind: EffectKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scope: EffectScope,
}

impl EffectSpec {
    pub fn new(kind: EffectKind, scope: EffectScope) -> Self {
        Self { kind, scope }
    }

    pub fn damage(multiplier: f32) -> Self {
        Self::new(EffectKind::Damage { multiplier }, EffectScope::Targets)
    }

    pub fn heal(multiplier: f32, flat: u32) -> Self {
        Self::new(EffectKind::Heal { multiplier, flat }, EffectScope::Targets)
    }

    pub fn shield(multiplier: f32, flat: u32) -> Self {
        Self::new(EffectKind::Shield { multiplier, flat }, EffectScope::Targets)
    }

    pub fn with_scope(mut self, scope: EffectScope) -> Self {
        self.scope = scope;
        self
    }
}

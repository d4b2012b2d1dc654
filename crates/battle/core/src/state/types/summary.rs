use super::common::UnitId;

/// Typed result of the most recent action attempt.
///
/// Distinguishes "something happened" from "nothing happened because of a
/// rule" for the scheduler and the presentation layer.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActionOutcome {
    #[default]
    Applied,
    InsufficientResource,
    ActorDefeated,
    NoValidTarget,
    Stunned,
    NoTargetInRange,
    /// Any other refused action.
    Rejected,
}

impl ActionOutcome {
    /// True when the action took effect.
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LastActionSummary {
    pub actor: Option<UnitId>,
    pub command: String,
    pub targets: Vec<UnitId>,
    /// Human-readable effect lines joined with `"; "`, e.g. `"Bob: -15 HP"`.
    pub effects_summary: String,
    pub outcome: ActionOutcome,
}

impl LastActionSummary {
    pub fn new(actor: UnitId, command: impl Into<String>) -> Self {
        Self {
            actor: Some(actor),
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn with_outcome(mut self, outcome: ActionOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn with_targets(mut self, targets: impl IntoIterator<Item = UnitId>) -> Self {
        self.targets = targets.into_iter().collect();
        self
    }

    pub fn with_effects(mut self, lines: &[String]) -> Self {
        self.effects_summary = lines.join("; ");
        self
    }
}

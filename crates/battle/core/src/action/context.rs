use crate::config::EngineConfig;
use crate::rng::Roller;
use crate::state::{BattleSnapshot, UnitId};

/// Mutable state threaded through the effect list of one command.
pub struct EffectContext<'a> {
    pub actor: UnitId,
    pub snapshot: &'a mut BattleSnapshot,
    pub config: &'a EngineConfig,
    pub roller: Roller<'a>,
    /// Units defeated by this action, in defeat order.
    pub defeated: Vec<UnitId>,
    /// Human-readable effect lines for the action summary.
    pub lines: Vec<String>,
}

impl<'a> EffectContext<'a> {
    pub fn new(
        actor: UnitId,
        snapshot: &'a mut BattleSnapshot,
        config: &'a EngineConfig,
        roller: Roller<'a>,
    ) -> Self {
        Self {
            actor,
            snapshot,
            config,
            roller,
            defeated: Vec::new(),
            lines: Vec::new(),
        }
    }

    pub fn actor_atk(&self) -> u32 {
        self.snapshot
            .unit(self.actor)
            .map(|unit| unit.stats.atk)
            .unwrap_or(0)
    }

    pub fn name_of(&self, id: UnitId) -> String {
        self.snapshot
            .unit(id)
            .map(|unit| unit.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn note(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

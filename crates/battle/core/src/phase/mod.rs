//! Turn-phase effect processor.
//!
//! Fires the lingering effects bound to the active unit, or to its team, whose
//! trigger matches the requested checkpoint. Durations are left alone; only
//! the scheduler's upkeep ticks them down.

mod error;

pub use error::PhaseError;

use crate::combat::apply_direct_damage;
use crate::rng::Roller;
use crate::state::{
    BattleSnapshot, EffectTarget, LingeringEffect, SnapshotError, StatusKind, Team, TriggerPhase,
    TurnFlags,
};
use crate::transition::{BattleEnv, BattleTransition};

/// Processes one checkpoint of the active unit's turn.
///
/// The output is `true` when at least one effect fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcessPhase {
    pub phase: TriggerPhase,
}

impl ProcessPhase {
    pub fn new(phase: TriggerPhase) -> Self {
        Self { phase }
    }
}

impl BattleTransition for ProcessPhase {
    type Error = PhaseError;
    type Output = bool;

    const NAME: &'static str = "process_phase";

    fn pre_validate(
        &self,
        snapshot: &BattleSnapshot,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        snapshot.validate().map_err(PhaseError::Snapshot)?;
        if !snapshot.is_started() {
            return Err(PhaseError::Snapshot(SnapshotError::NotStarted));
        }
        Ok(())
    }

    fn apply(
        &self,
        snapshot: &mut BattleSnapshot,
        env: &BattleEnv<'_>,
    ) -> Result<Self::Output, Self::Error> {
        let active_id = snapshot
            .active_unit
            .ok_or(PhaseError::Snapshot(SnapshotError::MissingActiveUnit))?;
        let Some(active) = snapshot.unit(active_id).cloned() else {
            return Err(PhaseError::Snapshot(SnapshotError::UnknownActiveUnit(active_id)));
        };
        if active.is_defeated() {
            return Ok(false);
        }

        let matched: Vec<LingeringEffect> = snapshot
            .effects
            .iter()
            .filter(|effect| effect.trigger == self.phase && !effect.kind.is_passive())
            .filter(|effect| effect.targets_unit(active_id) || effect.targets_team(active.team))
            .cloned()
            .collect();
        if matched.is_empty() {
            return Ok(false);
        }

        let stunned_now = matched.iter().any(|effect| effect.kind == StatusKind::Stun);
        let mut roller = Roller::new(env.rng, snapshot.rng, active_id);
        let mut lines = Vec::new();

        for effect in &matched {
            match &effect.kind {
                StatusKind::Stun => {
                    snapshot.turn_flags.insert(TurnFlags::STUNNED);
                    lines.push(format!("{} is stunned and cannot act", active.name));
                }
                StatusKind::ResourceOverTime { min, max } => {
                    if stunned_now {
                        lines.push(format!("{}: resource gain lost to stun", active.name));
                        continue;
                    }
                    let team = match effect.target {
                        EffectTarget::Team(scope) => scope.team(),
                        EffectTarget::Unit(_) => active.team,
                    };
                    // Only the allies own a resource pool.
                    if team != Team::Ally {
                        continue;
                    }
                    let amount = roller.range(*min, (*max).max(*min));
                    let gained = snapshot.grant_resource(amount);
                    lines.push(format!("{team}: +{gained} SP"));
                }
                StatusKind::DamageOverTime { amount } => {
                    let Some(unit) = snapshot.unit_mut(active_id) else {
                        continue;
                    };
                    if unit.is_defeated() {
                        continue;
                    }
                    let report = apply_direct_damage(&mut unit.stats, *amount);
                    lines.push(format!(
                        "{}: -{} HP ({})",
                        active.name,
                        report.hp_lost,
                        effect.kind.name()
                    ));
                    if report.lethal {
                        snapshot.mark_defeated(active_id);
                        lines.push(format!("{} is defeated", active.name));
                    }
                }
                StatusKind::Marker { .. } => {}
            }
        }

        tracing::debug!(
            target: "battle::phase",
            unit = %active_id,
            phase = %self.phase,
            fired = matched.len(),
            "phase processed"
        );

        if !lines.is_empty() {
            snapshot.battle_message = lines.join("; ");
        }
        Ok(true)
    }

    fn post_validate(
        &self,
        snapshot: &BattleSnapshot,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        snapshot.validate().map_err(PhaseError::Invariant)
    }
}

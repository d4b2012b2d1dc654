//! Turn and round scheduling.
//!
//! Turn order is a queue of living unit ids rotated so that the active unit
//! sits at the head. A round ends when no `Idle` unit remains in the queue;
//! the next round reshuffles every living unit.

use crate::error::{BattleError, ErrorSeverity};
use crate::rng::Roller;
use crate::state::{BattleSnapshot, BattleState, SnapshotError, Team, TurnFlags, UnitId, UnitStatus};
use crate::transition::{BattleEnv, BattleTransition};

/// Errors that can occur during turn operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnError {
    #[error("invalid snapshot: {0}")]
    Snapshot(SnapshotError),

    #[error("turn change broke a snapshot invariant: {0}")]
    Invariant(SnapshotError),
}

impl BattleError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TurnError::Snapshot(_) => ErrorSeverity::Validation,
            TurnError::Invariant(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TurnError::Snapshot(inner) => inner.error_code(),
            TurnError::Invariant(_) => "TURN_INVARIANT_VIOLATED",
        }
    }
}

// ============================================================================
// Start
// ============================================================================

/// Opens round 1: shuffles the living roster into a turn order and activates
/// its head.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StartBattle;

impl BattleTransition for StartBattle {
    type Error = TurnError;
    type Output = UnitId;

    const NAME: &'static str = "start_battle";

    fn pre_validate(
        &self,
        snapshot: &BattleSnapshot,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        snapshot.validate().map_err(TurnError::Snapshot)?;
        if snapshot.is_started() {
            return Err(TurnError::Snapshot(SnapshotError::AlreadyStarted));
        }
        for team in [Team::Ally, Team::Enemy] {
            if snapshot.living_count(team) == 0 {
                return Err(TurnError::Snapshot(SnapshotError::EmptyTeam(team)));
            }
        }
        Ok(())
    }

    fn apply(
        &self,
        snapshot: &mut BattleSnapshot,
        env: &BattleEnv<'_>,
    ) -> Result<Self::Output, Self::Error> {
        snapshot.round = 1;
        snapshot.turn_in_round = 1;
        snapshot.battle_state = BattleState::Ongoing;
        snapshot.last_action = None;

        let head = reshuffle(snapshot, env)
            .ok_or(TurnError::Invariant(SnapshotError::MissingActiveUnit))?;
        snapshot.battle_message = "Round 1 begins".to_owned();

        tracing::info!(
            target: "battle::turn",
            units = snapshot.turn_order.len(),
            first = %head,
            "battle started"
        );
        Ok(head)
    }

    fn post_validate(
        &self,
        snapshot: &BattleSnapshot,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        snapshot.validate().map_err(TurnError::Invariant)
    }
}

// ============================================================================
// End of turn
// ============================================================================

/// Closes the active unit's turn: upkeep, outcome check, then hands the turn
/// to the next unit or opens a new round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EndTurn;

impl BattleTransition for EndTurn {
    type Error = TurnError;
    type Output = BattleState;

    const NAME: &'static str = "end_turn";

    fn pre_validate(
        &self,
        snapshot: &BattleSnapshot,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        snapshot.validate().map_err(TurnError::Snapshot)?;
        if !snapshot.is_started() {
            return Err(TurnError::Snapshot(SnapshotError::NotStarted));
        }
        Ok(())
    }

    fn apply(
        &self,
        snapshot: &mut BattleSnapshot,
        env: &BattleEnv<'_>,
    ) -> Result<Self::Output, Self::Error> {
        let acted = snapshot
            .active_unit
            .ok_or(TurnError::Snapshot(SnapshotError::MissingActiveUnit))?;
        let (acted_team, acted_name) = snapshot
            .unit(acted)
            .map(|unit| (unit.team, unit.name.clone()))
            .ok_or(TurnError::Snapshot(SnapshotError::UnknownActiveUnit(acted)))?;

        upkeep(snapshot, acted, acted_team);

        if let Some(outcome) = decide(snapshot) {
            conclude(snapshot, outcome);
            return Ok(outcome);
        }

        let acted_alive = snapshot.unit(acted).is_some_and(|unit| unit.is_alive());
        if acted_alive && snapshot.turn_flags.contains(TurnFlags::ACT_AGAIN) {
            if let Some(unit) = snapshot.unit_mut(acted) {
                unit.status = UnitStatus::Active;
            }
            snapshot.turn_flags = TurnFlags::empty();
            // A kill that earned the extra turn leaves a gap in the frame.
            snapshot.recompute_pseudo_positions();
            snapshot.battle_message = format!("{acted_name} acts again");
            tracing::debug!(target: "battle::turn", unit = %acted, "extra turn granted");
            return Ok(BattleState::Ongoing);
        }

        if let Some(unit) = snapshot.unit_mut(acted)
            && unit.is_alive()
        {
            unit.status = UnitStatus::EndTurn;
        }
        let living: Vec<UnitId> = snapshot
            .turn_order
            .iter()
            .copied()
            .filter(|id| snapshot.unit(*id).is_some_and(|unit| unit.is_alive()))
            .collect();
        snapshot.turn_order = living;

        let skip = usize::from(snapshot.turn_order.first() == Some(&acted));
        let next = snapshot
            .turn_order
            .iter()
            .enumerate()
            .skip(skip)
            .find(|(_, id)| {
                snapshot
                    .unit(**id)
                    .is_some_and(|unit| unit.status == UnitStatus::Idle)
            })
            .map(|(index, _)| index);

        match next {
            Some(index) => {
                snapshot.turn_order.rotate_left(index);
                let head = snapshot.turn_order[0];
                snapshot.active_unit = Some(head);
                snapshot.turn_in_round += 1;
                let name = match snapshot.unit_mut(head) {
                    Some(unit) => {
                        unit.status = UnitStatus::Active;
                        unit.name.clone()
                    }
                    None => head.to_string(),
                };
                snapshot.battle_message = format!("{name}'s turn");
            }
            None => {
                snapshot.round += 1;
                snapshot.turn_in_round = 1;
                reshuffle(snapshot, env)
                    .ok_or(TurnError::Invariant(SnapshotError::MissingActiveUnit))?;
                snapshot.battle_message = format!("Round {} begins", snapshot.round);
                tracing::info!(target: "battle::turn", round = snapshot.round, "new round");
            }
        }

        snapshot.turn_flags = TurnFlags::empty();
        snapshot.recompute_pseudo_positions();

        tracing::debug!(
            target: "battle::turn",
            acted = %acted,
            next = ?snapshot.active_unit,
            round = snapshot.round,
            turn = snapshot.turn_in_round,
            "turn advanced"
        );
        Ok(BattleState::Ongoing)
    }

    fn post_validate(
        &self,
        snapshot: &BattleSnapshot,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        snapshot.validate().map_err(TurnError::Invariant)
    }
}

/// Ticks down the effects owned by the unit that just acted and the group
/// effects of its team, dropping the ones that run out.
fn upkeep(snapshot: &mut BattleSnapshot, acted: UnitId, team: Team) {
    snapshot.effects.retain_mut(|effect| {
        if !(effect.targets_unit(acted) || effect.targets_team(team)) {
            return true;
        }
        effect.duration = effect.duration.saturating_sub(1);
        if effect.duration == 0 {
            tracing::trace!(
                target: "battle::turn",
                effect = %effect.id,
                status = effect.kind.name(),
                "effect expired"
            );
        }
        effect.duration > 0
    });
}

fn decide(snapshot: &BattleSnapshot) -> Option<BattleState> {
    let allies = snapshot.living_count(Team::Ally);
    let enemies = snapshot.living_count(Team::Enemy);
    match (allies, enemies) {
        (0, 0) => Some(BattleState::Draw),
        (_, 0) => Some(BattleState::Win),
        (0, _) => Some(BattleState::Lose),
        _ => None,
    }
}

fn conclude(snapshot: &mut BattleSnapshot, outcome: BattleState) {
    snapshot.battle_state = outcome;
    snapshot.active_unit = None;
    snapshot.turn_flags = TurnFlags::empty();
    for unit in snapshot.units.iter_mut().filter(|unit| unit.is_alive()) {
        unit.status = UnitStatus::Idle;
    }
    snapshot.battle_message = match outcome {
        BattleState::Win => "Victory".to_owned(),
        BattleState::Lose => "Defeat".to_owned(),
        _ => "Draw".to_owned(),
    };
    tracing::info!(
        target: "battle::turn",
        outcome = %outcome,
        round = snapshot.round,
        "battle decided"
    );
}

/// Shuffles every living unit into a fresh turn order, resets them to `Idle`
/// and activates the head. Returns the new head.
fn reshuffle(snapshot: &mut BattleSnapshot, env: &BattleEnv<'_>) -> Option<UnitId> {
    let mut order: Vec<UnitId> = snapshot
        .units
        .iter()
        .filter(|unit| unit.is_alive())
        .map(|unit| unit.id)
        .collect();
    order.sort_unstable();

    let mut roller = Roller::new(env.rng, snapshot.rng, UnitId::SYSTEM);
    roller.shuffle(&mut order);

    for unit in snapshot.units.iter_mut().filter(|unit| unit.is_alive()) {
        unit.status = UnitStatus::Idle;
    }
    let head = *order.first()?;
    if let Some(unit) = snapshot.unit_mut(head) {
        unit.status = UnitStatus::Active;
    }
    snapshot.active_unit = Some(head);
    snapshot.turn_order = order;
    snapshot.turn_flags = TurnFlags::empty();
    snapshot.recompute_pseudo_positions();
    Some(head)
}

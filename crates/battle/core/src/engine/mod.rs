//! Stateless battle engine.
//!
//! The [`BattleEngine`] maps `(snapshot, input)` to the next snapshot. Each
//! operation runs its transition on a private copy of the input and settles
//! the result at the boundary:
//!
//! - success: the copy is returned and the roll nonce advances;
//! - rule violation: the input is returned with a message and a typed outcome;
//! - malformed input or a broken invariant: the input is returned with
//!   `battle_state = Error` and a diagnostic message.
//!
//! No operation panics or returns an error past this boundary.

mod errors;
mod transition;
mod turns;

pub use errors::{TransitionPhase, TransitionPhaseError};
pub(crate) use transition::drive_transition;
pub use turns::{EndTurn, StartBattle, TurnError};

use crate::action::UseCommand;
use crate::ai::DecideAndAct;
use crate::command::CommandRef;
use crate::config::EngineConfig;
use crate::error::{BattleError, ErrorContext};
use crate::phase::ProcessPhase;
use crate::rng::{PcgRng, RngOracle};
use crate::state::{BattleSnapshot, BattleState, TriggerPhase, UnitId};
use crate::transition::{BattleEnv, BattleTransition};

/// Rules engine over [`BattleSnapshot`] values.
///
/// Holds only configuration and the random oracle; every battle fact lives in
/// the snapshot.
#[derive(Clone, Debug, Default)]
pub struct BattleEngine<R: RngOracle = PcgRng> {
    config: EngineConfig,
    rng: R,
}

impl BattleEngine<PcgRng> {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            rng: PcgRng,
        }
    }
}

impl<R: RngOracle> BattleEngine<R> {
    pub fn with_rng(config: EngineConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Opens round 1 on a snapshot that has not started.
    pub fn start_battle(&self, snapshot: &BattleSnapshot) -> BattleSnapshot {
        self.run(snapshot, &StartBattle).0
    }

    /// The active unit uses a command on the selected primary targets.
    pub fn apply_action(
        &self,
        snapshot: &BattleSnapshot,
        actor: UnitId,
        command: impl Into<CommandRef>,
        selected: &[UnitId],
    ) -> BattleSnapshot {
        let action = UseCommand::new(actor, command, selected.to_vec());
        self.run(snapshot, &action).0
    }

    /// Fires the lingering effects of the active unit for `phase`.
    ///
    /// The flag is `true` when at least one effect fired.
    pub fn process_phase(
        &self,
        snapshot: &BattleSnapshot,
        phase: TriggerPhase,
    ) -> (BattleSnapshot, bool) {
        let (next, fired) = self.run(snapshot, &ProcessPhase::new(phase));
        (next, fired.unwrap_or(false))
    }

    /// Closes the active unit's turn and advances the scheduler.
    pub fn end_turn(&self, snapshot: &BattleSnapshot) -> BattleSnapshot {
        self.run(snapshot, &EndTurn).0
    }

    /// Lets the active enemy choose and perform its action.
    pub fn decide_and_act(&self, snapshot: &BattleSnapshot) -> BattleSnapshot {
        self.run(snapshot, &DecideAndAct).0
    }

    fn run<T>(
        &self,
        snapshot: &BattleSnapshot,
        transition: &T,
    ) -> (BattleSnapshot, Option<T::Output>)
    where
        T: BattleTransition,
    {
        if snapshot.battle_state != BattleState::Ongoing {
            tracing::debug!(
                target: "battle::engine",
                transition = T::NAME,
                state = %snapshot.battle_state,
                "battle is not ongoing, input returned unchanged"
            );
            return (snapshot.clone(), None);
        }

        let env = BattleEnv::new(&self.config, &self.rng);
        let mut next = snapshot.clone();
        match drive_transition(transition, &mut next, &env) {
            Ok(output) => {
                next.rng.nonce = next.rng.nonce.wrapping_add(1);
                tracing::trace!(
                    target: "battle::engine",
                    transition = T::NAME,
                    nonce = next.rng.nonce,
                    "transition applied"
                );
                (next, Some(output))
            }
            Err(failure) => (settle_failure(snapshot, transition, &failure), None),
        }
    }
}

/// Maps a failed transition onto the input snapshot.
fn settle_failure<T>(
    original: &BattleSnapshot,
    transition: &T,
    failure: &TransitionPhaseError<T::Error>,
) -> BattleSnapshot
where
    T: BattleTransition,
{
    let mut next = original.clone();
    let error = &failure.error;
    let context = match original.active_unit {
        Some(unit) => ErrorContext::new(original.round, original.rng.nonce).with_unit(unit),
        None => ErrorContext::new(original.round, original.rng.nonce),
    };

    if error.severity().is_recoverable() {
        tracing::debug!(
            target: "battle::engine",
            transition = T::NAME,
            code = error.error_code(),
            round = context.round,
            nonce = context.nonce,
            "rule violation: {error}"
        );
        next.battle_message = error.to_string();
        if let Some(summary) = transition.refused_summary(original) {
            next.last_action = Some(summary.with_outcome(error.outcome()));
        }
        return next;
    }

    tracing::warn!(
        target: "battle::engine",
        transition = T::NAME,
        phase = failure.phase.as_str(),
        code = error.error_code(),
        severity = error.severity().as_str(),
        unit = ?context.unit,
        round = context.round,
        nonce = context.nonce,
        "{error}"
    );
    next.battle_state = BattleState::Error;
    next.battle_message = format!("{}: {}", error.error_code(), failure);
    next
}

// ============================================================================
// Default-configured entry points
// ============================================================================

/// [`BattleEngine::start_battle`] with the default configuration.
pub fn start_battle(snapshot: &BattleSnapshot) -> BattleSnapshot {
    BattleEngine::new(EngineConfig::default()).start_battle(snapshot)
}

/// [`BattleEngine::apply_action`] with the default configuration.
pub fn apply_action(
    snapshot: &BattleSnapshot,
    actor: UnitId,
    command: impl Into<CommandRef>,
    selected: &[UnitId],
) -> BattleSnapshot {
    BattleEngine::new(EngineConfig::default()).apply_action(snapshot, actor, command, selected)
}

/// [`BattleEngine::process_phase`] with the default configuration.
pub fn process_phase(snapshot: &BattleSnapshot, phase: TriggerPhase) -> (BattleSnapshot, bool) {
    BattleEngine::new(EngineConfig::default()).process_phase(snapshot, phase)
}

/// [`BattleEngine::end_turn`] with the default configuration.
pub fn end_turn(snapshot: &BattleSnapshot) -> BattleSnapshot {
    BattleEngine::new(EngineConfig::default()).end_turn(snapshot)
}

/// [`BattleEngine::decide_and_act`] with the default configuration.
pub fn decide_and_act(snapshot: &BattleSnapshot) -> BattleSnapshot {
    BattleEngine::new(EngineConfig::default()).decide_and_act(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, ANN, BLAST, BOB, ORC};
    use crate::state::{ActionOutcome, SnapshotError, UnitStatus};

    #[test]
    fn success_advances_the_nonce() {
        let snapshot = fixtures::duel();
        let next = apply_action(&snapshot, ANN, CommandRef::BasicAttack, &[ORC]);
        assert_eq!(next.rng.nonce, snapshot.rng.nonce + 1);
        assert_eq!(next.battle_state, BattleState::Ongoing);
    }

    #[test]
    fn rule_violation_leaves_the_battle_untouched() {
        let snapshot = fixtures::skirmish().with_team_resource(1);
        let next = apply_action(&snapshot, ANN, BLAST, &[ORC]);

        assert_eq!(next.battle_state, BattleState::Ongoing);
        assert_eq!(next.units, snapshot.units);
        assert_eq!(next.team_resource, 1);
        assert_eq!(next.rng, snapshot.rng);
        assert!(next.battle_message.contains("insufficient resource"));

        let summary = next.last_action.unwrap();
        assert_eq!(summary.outcome, ActionOutcome::InsufficientResource);
        assert_eq!(summary.command, "Blast");
        assert_eq!(summary.actor, Some(ANN));
    }

    #[test]
    fn malformed_input_moves_to_error_state() {
        let snapshot = fixtures::skirmish();
        let next = apply_action(&snapshot, BOB, CommandRef::BasicAttack, &[ORC]);

        assert_eq!(next.battle_state, BattleState::Error);
        assert!(next.battle_message.starts_with("ACTION_NOT_ACTORS_TURN"));
        assert_eq!(next.units, snapshot.units);
    }

    #[test]
    fn broken_snapshot_moves_to_error_state() {
        let mut snapshot = fixtures::skirmish();
        snapshot.units[1].stats.hp = 0;
        let next = end_turn(&snapshot);

        assert_eq!(next.battle_state, BattleState::Error);
        assert!(
            next.battle_message
                .starts_with(SnapshotError::DefeatMismatch(BOB).error_code())
        );
    }

    #[test]
    fn decided_battles_are_returned_unchanged() {
        let mut snapshot = fixtures::duel();
        snapshot.battle_state = BattleState::Win;
        snapshot.active_unit = None;
        snapshot.unit_mut(ANN).unwrap().status = UnitStatus::Idle;

        assert_eq!(end_turn(&snapshot), snapshot);
        assert_eq!(decide_and_act(&snapshot), snapshot);
        let (next, fired) = process_phase(&snapshot, TriggerPhase::StartOfTurn);
        assert_eq!(next, snapshot);
        assert!(!fired);
    }

    #[test]
    fn start_refuses_an_empty_team() {
        let snapshot = BattleSnapshot::new(
            vec![fixtures::ally(
                ANN,
                "Ann",
                crate::state::Role::Melee,
                crate::state::Stats::new(10, 1),
            )],
            5,
            7,
        );
        let next = start_battle(&snapshot);
        assert_eq!(next.battle_state, BattleState::Error);
        assert!(next.battle_message.starts_with("SNAPSHOT_EMPTY_TEAM"));
    }
}

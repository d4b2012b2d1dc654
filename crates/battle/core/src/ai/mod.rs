//! Enemy decision procedure.
//!
//! Enemies only basic-attack: the target is drawn uniformly from living allies
//! standing exactly at the enemy's reach in either direction.

mod error;

pub use error::DecisionError;

use crate::combat::{apply_damage, scaled};
use crate::rng::Roller;
use crate::state::{
    ActionOutcome, BattleSnapshot, LastActionSummary, SnapshotError, Team, TurnFlags, UnitId,
    UnitStatus,
};
use crate::transition::{BattleEnv, BattleTransition};

const ENEMY_ATTACK: &str = "Basic Attack";

/// Lets the active enemy pick a target and attack it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecideAndAct;

impl DecideAndAct {
    /// Living allies at exactly `±reach` pseudo-positions from the enemy,
    /// ordered by id.
    pub fn candidates(snapshot: &BattleSnapshot, enemy: UnitId, reach: u32) -> Vec<UnitId> {
        let Some(actor) = snapshot.unit(enemy) else {
            return Vec::new();
        };
        let reach = i32::try_from(reach).unwrap_or(i32::MAX);
        let positions = [
            actor.pseudo_position.saturating_sub(reach),
            actor.pseudo_position.saturating_add(reach),
        ];
        let mut found: Vec<UnitId> = snapshot
            .living(Team::Ally)
            .filter(|unit| positions.contains(&unit.pseudo_position))
            .map(|unit| unit.id)
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }
}

impl BattleTransition for DecideAndAct {
    type Error = DecisionError;
    type Output = LastActionSummary;

    const NAME: &'static str = "decide_and_act";

    fn pre_validate(
        &self,
        snapshot: &BattleSnapshot,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        snapshot.validate().map_err(DecisionError::Snapshot)?;
        if !snapshot.is_started() {
            return Err(DecisionError::Snapshot(SnapshotError::NotStarted));
        }
        let actor = snapshot
            .active()
            .ok_or(DecisionError::Snapshot(SnapshotError::MissingActiveUnit))?;
        if actor.team != Team::Enemy {
            return Err(DecisionError::NotEnemyTurn(actor.id));
        }
        if actor.is_defeated() {
            return Err(DecisionError::ActorDefeated(actor.id));
        }
        if actor.status == UnitStatus::EndTurn
            || snapshot.turn_flags.contains(TurnFlags::ACT_AGAIN)
        {
            return Err(DecisionError::AlreadyActed(actor.id));
        }
        Ok(())
    }

    fn apply(
        &self,
        snapshot: &mut BattleSnapshot,
        env: &BattleEnv<'_>,
    ) -> Result<Self::Output, Self::Error> {
        let actor = snapshot
            .active()
            .cloned()
            .ok_or(DecisionError::Snapshot(SnapshotError::MissingActiveUnit))?;
        let summary = LastActionSummary::new(actor.id, ENEMY_ATTACK);

        let summary = if snapshot.is_stunned(actor.id) {
            snapshot.battle_message = format!("{} is stunned and cannot act", actor.name);
            summary.with_outcome(ActionOutcome::Stunned)
        } else {
            let candidates = Self::candidates(snapshot, actor.id, env.config.reach(actor.role));
            if candidates.is_empty() {
                snapshot.battle_message = format!("{} has no target in range", actor.name);
                summary.with_outcome(ActionOutcome::NoTargetInRange)
            } else {
                let mut roller = Roller::new(env.rng, snapshot.rng, actor.id);
                let target = candidates[roller.pick(candidates.len())];
                let lines = strike(snapshot, &actor.name, actor.stats.atk, target);
                snapshot.battle_message = format!(
                    "{} uses {ENEMY_ATTACK}: {}",
                    actor.name,
                    lines.join("; ")
                );
                summary
                    .with_targets([target])
                    .with_effects(&lines)
                    .with_outcome(ActionOutcome::Applied)
            }
        };

        if let Some(unit) = snapshot.unit_mut(actor.id) {
            unit.status = UnitStatus::EndTurn;
        }

        tracing::debug!(
            target: "battle::ai",
            enemy = %actor.id,
            outcome = ?summary.outcome,
            targets = ?summary.targets,
            "enemy acted"
        );

        snapshot.last_action = Some(summary.clone());
        Ok(summary)
    }

    fn post_validate(
        &self,
        snapshot: &BattleSnapshot,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        snapshot.validate().map_err(DecisionError::Invariant)
    }
}

fn strike(snapshot: &mut BattleSnapshot, attacker: &str, atk: u32, target: UnitId) -> Vec<String> {
    let mut lines = Vec::new();
    let Some(unit) = snapshot.unit_mut(target) else {
        return lines;
    };
    let report = apply_damage(&mut unit.stats, scaled(atk, 1.0));
    let name = unit.name.clone();

    if report.absorbed > 0 {
        lines.push(format!("{name}: -{} HP ({} absorbed)", report.hp_lost, report.absorbed));
    } else {
        lines.push(format!("{name}: -{} HP", report.hp_lost));
    }
    if report.lethal {
        snapshot.mark_defeated(target);
        lines.push(format!("{name} is defeated by {attacker}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::engine::drive_transition;
    use crate::fixtures::{self, ANN, BOB, IMP, ORC};
    use crate::rng::PcgRng;
    use crate::state::{
        EffectGrant, EffectSource, EffectTarget, Polarity, Role, Stats, StatusKind, TriggerPhase,
    };

    fn run(
        snapshot: &BattleSnapshot,
    ) -> Result<(BattleSnapshot, LastActionSummary), DecisionError> {
        let config = EngineConfig::default();
        let env = BattleEnv::new(&config, &PcgRng);
        let mut next = snapshot.clone();
        drive_transition(&DecideAndAct, &mut next, &env)
            .map(|summary| (next, summary))
            .map_err(|failure| failure.error)
    }

    /// Orc (melee, atk 8) at the head; Ann at +1, Bob at -1, Imp at +2.
    fn orc_turn() -> BattleSnapshot {
        fixtures::started(
            vec![
                fixtures::ally(ANN, "Ann", Role::Melee, Stats::new(50, 15)),
                fixtures::ally(BOB, "Bob", Role::Ranged, Stats::new(40, 12)),
                fixtures::enemy(ORC, "Orc", Role::Melee, Stats::new(60, 8)),
                fixtures::enemy(IMP, "Imp", Role::Ranged, Stats::new(20, 6)),
            ],
            &[ORC, ANN, IMP, BOB],
            5,
        )
    }

    #[test]
    fn melee_enemy_hits_an_adjacent_ally() {
        let snapshot = orc_turn();
        let (next, summary) = run(&snapshot).unwrap();

        assert_eq!(summary.outcome, ActionOutcome::Applied);
        assert_eq!(summary.targets.len(), 1);
        let target = summary.targets[0];
        assert!(target == ANN || target == BOB);

        let before = snapshot.unit(target).unwrap().stats.hp;
        assert_eq!(next.unit(target).unwrap().stats.hp, before - 8);
        assert_eq!(next.unit(ORC).unwrap().status, UnitStatus::EndTurn);
        // Enemies never feed the ally pool.
        assert_eq!(next.team_resource, 0);
    }

    #[test]
    fn candidates_sit_at_exact_reach() {
        let snapshot = orc_turn();
        assert_eq!(DecideAndAct::candidates(&snapshot, ORC, 1), vec![ANN, BOB]);
        // +2 is Imp, -2 does not exist in a four-unit order.
        assert!(DecideAndAct::candidates(&snapshot, ORC, 2).is_empty());
    }

    #[test]
    fn shield_soaks_the_hit_first() {
        let mut snapshot = orc_turn();
        for id in [ANN, BOB] {
            snapshot.unit_mut(id).unwrap().stats.shield_hp = 5;
        }
        let (next, summary) = run(&snapshot).unwrap();
        let target = next.unit(summary.targets[0]).unwrap();
        assert_eq!(target.stats.shield_hp, 0);
        assert_eq!(target.stats.hp, target.stats.max_hp - 3);
        assert!(summary.effects_summary.contains("absorbed"));
    }

    #[test]
    fn no_target_in_range_only_ends_the_turn() {
        let mut snapshot = orc_turn();
        snapshot.unit_mut(ORC).unwrap().role = Role::Ranged;
        let (next, summary) = run(&snapshot).unwrap();

        assert_eq!(summary.outcome, ActionOutcome::NoTargetInRange);
        assert!(summary.targets.is_empty());
        let stats = |s: &BattleSnapshot| s.units.iter().map(|u| u.stats).collect::<Vec<_>>();
        assert_eq!(stats(&next), stats(&snapshot));
        assert_eq!(next.unit(ORC).unwrap().status, UnitStatus::EndTurn);
    }

    #[test]
    fn stunned_enemy_records_the_outcome() {
        let mut snapshot = orc_turn();
        snapshot.add_lingering_effect(EffectGrant {
            kind: StatusKind::Stun,
            polarity: Polarity::Debuff,
            trigger: TriggerPhase::StartOfTurn,
            target: EffectTarget::Unit(ORC),
            duration: 1,
            source: EffectSource::Unit(ANN),
        });
        let (next, summary) = run(&snapshot).unwrap();

        assert_eq!(summary.outcome, ActionOutcome::Stunned);
        assert_eq!(next.unit(ANN).unwrap().stats.hp, 50);
        assert_eq!(next.unit(BOB).unwrap().stats.hp, 40);
    }

    #[test]
    fn ally_turn_is_malformed_input() {
        let snapshot = fixtures::duel();
        assert_eq!(run(&snapshot).unwrap_err(), DecisionError::NotEnemyTurn(ANN));
    }

    #[test]
    fn same_snapshot_same_choice() {
        let snapshot = orc_turn();
        let (first, _) = run(&snapshot).unwrap();
        let (second, _) = run(&snapshot).unwrap();
        assert_eq!(first, second);
    }
}

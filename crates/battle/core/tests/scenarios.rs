use std::collections::BTreeSet;

use battle_core::targeting::{Track, resolve_affected_targets};
use battle_core::{
    ActionOutcome, AreaShape, BattleSnapshot, BattleState, Combatant, Command, CommandId,
    CommandKind, CommandRef, EffectKind, EffectSpec, Origin, Polarity, Role, SelectionPattern,
    Stats, StatusKind, TargetTypes, TargetingParams, Team, TriggerPhase, UnitId, UnitStatus,
    apply_action, decide_and_act, end_turn, process_phase, start_battle,
};

const STUN: CommandId = CommandId(1);

/// Started snapshot with a fixed turn order. Pseudo-positions are laid out
/// the way the scheduler assigns them.
fn started(mut units: Vec<Combatant>, order: &[UnitId]) -> BattleSnapshot {
    let n = order.len() as i32;
    for (k, id) in order.iter().enumerate() {
        let k = k as i32;
        let position = if k <= n / 2 { k } else { k - n };
        let unit = units.iter_mut().find(|unit| unit.id == *id).unwrap();
        unit.pseudo_position = position;
    }
    let mut snapshot = BattleSnapshot::new(units, 5, 99).with_team_resource(5);
    snapshot.round = 1;
    snapshot.turn_in_round = 1;
    snapshot.turn_order = order.to_vec();
    snapshot.active_unit = Some(order[0]);
    for unit in &mut snapshot.units {
        if unit.id == order[0] {
            unit.status = UnitStatus::Active;
        }
    }
    snapshot
}

fn stun_skill() -> Command {
    Command::new(
        STUN,
        "Concussive Shot",
        CommandKind::Skill,
        TargetingParams::single(
            SelectionPattern::WithinDistance {
                distance: 1,
                direction: Default::default(),
            },
            TargetTypes::ENEMY,
        ),
    )
    .with_cost(1)
    .with_effect(EffectSpec::new(
        EffectKind::ApplyStatus {
            status: StatusKind::Stun,
            polarity: Polarity::Debuff,
            duration: 2,
            chance: 1.0,
            trigger: TriggerPhase::StartOfTurn,
        },
        Default::default(),
    ))
}

fn count_active(snapshot: &BattleSnapshot) -> usize {
    snapshot
        .units
        .iter()
        .filter(|unit| unit.status == UnitStatus::Active)
        .count()
}

#[test]
fn basic_attack_takes_atk_from_hp() {
    let a = Combatant::new(UnitId(1), "A", Team::Ally, Role::Melee, Stats::new(50, 15));
    let b = Combatant::new(UnitId(2), "B", Team::Enemy, Role::Melee, Stats::new(60, 9));
    let snapshot = started(vec![a, b], &[UnitId(1), UnitId(2)]);

    let next = apply_action(&snapshot, UnitId(1), CommandRef::BasicAttack, &[UnitId(2)]);

    assert_eq!(next.battle_state, BattleState::Ongoing);
    assert_eq!(next.unit(UnitId(2)).unwrap().stats.hp, 45);
    assert_eq!(next.unit(UnitId(1)).unwrap().status, UnitStatus::EndTurn);
    let summary = next.last_action.as_ref().unwrap();
    assert_eq!(summary.outcome, ActionOutcome::Applied);
    assert!(summary.effects_summary.contains("-15 HP"));
}

#[test]
fn stun_runs_out_after_two_of_its_holders_turns() {
    let c = Combatant::new(UnitId(1), "C", Team::Ally, Role::Ranged, Stats::new(40, 10))
        .with_commands([stun_skill()]);
    let d = Combatant::new(UnitId(2), "D", Team::Enemy, Role::Melee, Stats::new(80, 5));
    let snapshot = started(vec![c, d], &[UnitId(1), UnitId(2)]);

    let mut snapshot = apply_action(&snapshot, UnitId(1), STUN, &[UnitId(2)]);
    let stun = snapshot.status_view(UnitId(2));
    assert_eq!(stun.debuff("Stun").map(|entry| entry.duration), Some(2));

    snapshot = end_turn(&snapshot);
    let mut holder_turns = Vec::new();
    for _ in 0..10 {
        if holder_turns.len() == 2 {
            break;
        }
        if snapshot.active_unit == Some(UnitId(2)) {
            let (next, fired) = process_phase(&snapshot, TriggerPhase::StartOfTurn);
            assert!(fired);
            let next = decide_and_act(&next);
            assert_eq!(
                next.last_action.as_ref().map(|summary| summary.outcome),
                Some(ActionOutcome::Stunned)
            );
            snapshot = end_turn(&next);
            holder_turns.push(
                snapshot
                    .status_view(UnitId(2))
                    .debuff("Stun")
                    .map(|entry| entry.duration),
            );
        } else {
            snapshot = end_turn(&snapshot);
        }
        assert_eq!(snapshot.battle_state, BattleState::Ongoing);
    }

    assert_eq!(holder_turns, vec![Some(1), None]);
    assert!(snapshot.effects.is_empty());
}

#[test]
fn last_enemy_down_is_a_win() {
    let a = Combatant::new(UnitId(1), "A", Team::Ally, Role::Melee, Stats::new(50, 30));
    let b = Combatant::new(UnitId(2), "B", Team::Enemy, Role::Melee, Stats::new(60, 9).with_hp(20));
    let snapshot = started(vec![a, b], &[UnitId(1), UnitId(2)]);

    let next = apply_action(&snapshot, UnitId(1), CommandRef::BasicAttack, &[UnitId(2)]);
    assert!(next.unit(UnitId(2)).unwrap().is_defeated());
    assert_eq!(next.battle_state, BattleState::Ongoing);

    let next = end_turn(&next);
    assert_eq!(next.battle_state, BattleState::Win);
    assert_eq!(next.active_unit, None);
    assert_eq!(count_active(&next), 0);
    assert_eq!(next.defeated_enemies, vec![UnitId(2)]);
}

#[test]
fn last_ally_down_is_a_loss() {
    let a = Combatant::new(UnitId(1), "A", Team::Ally, Role::Melee, Stats::new(50, 5).with_hp(4));
    let b = Combatant::new(UnitId(2), "B", Team::Enemy, Role::Melee, Stats::new(60, 9));
    let snapshot = started(vec![a, b], &[UnitId(2), UnitId(1)]);

    let next = decide_and_act(&snapshot);
    assert!(next.unit(UnitId(1)).unwrap().is_defeated());

    let next = end_turn(&next);
    assert_eq!(next.battle_state, BattleState::Lose);
    assert_eq!(count_active(&next), 0);

    // Decided battles ignore further calls.
    assert_eq!(end_turn(&next), next);
}

#[test]
fn radius_one_hits_origin_and_circular_neighbours() {
    let units: Vec<Combatant> = [(1, 0), (2, 1), (3, 2), (4, -2), (5, -1)]
        .into_iter()
        .map(|(id, position)| {
            let team = if id % 2 == 0 { Team::Enemy } else { Team::Ally };
            Combatant::new(UnitId(id), format!("u{id}"), team, Role::Melee, Stats::new(30, 5))
                .with_pseudo_position(position)
        })
        .collect();
    let everyone = TargetTypes::SELF | TargetTypes::ALLY | TargetTypes::ENEMY;
    let command = Command::new(
        CommandId(9),
        "Nova",
        CommandKind::Skill,
        TargetingParams::single(SelectionPattern::Adjacent, everyone).with_area(
            Origin::Selected,
            AreaShape::RadiusAroundOrigin { distance: 1 },
            everyone,
        ),
    );

    let track = Track::new(&units);
    let ring: Vec<UnitId> = track.iter().map(|(_, unit)| unit.id).collect();
    assert_eq!(ring.len(), 5);

    for (index, origin) in ring.iter().enumerate() {
        let expected: BTreeSet<UnitId> = [
            ring[(index + 4) % 5],
            ring[index],
            ring[(index + 1) % 5],
        ]
        .into_iter()
        .collect();
        let hit = resolve_affected_targets(Some(*origin), &units[0], &command, &units);
        assert_eq!(hit, expected, "origin {origin}");
    }
}

#[test]
fn start_battle_activates_exactly_one_unit() {
    let roster = || {
        vec![
            Combatant::new(UnitId(1), "A", Team::Ally, Role::Melee, Stats::new(30, 5)),
            Combatant::new(UnitId(2), "B", Team::Ally, Role::Ranged, Stats::new(30, 5)),
            Combatant::new(UnitId(3), "C", Team::Enemy, Role::Melee, Stats::new(30, 5)),
            Combatant::new(UnitId(4), "D", Team::Enemy, Role::Ranged, Stats::new(30, 5)),
            Combatant::new(UnitId(5), "E", Team::Enemy, Role::Melee, Stats::new(0, 5)),
        ]
    };
    let snapshot = start_battle(&BattleSnapshot::new(roster(), 5, 1234));

    assert_eq!(snapshot.battle_state, BattleState::Ongoing);
    assert_eq!(snapshot.round, 1);
    assert_eq!(snapshot.turn_in_round, 1);
    assert_eq!(count_active(&snapshot), 1);
    assert_eq!(snapshot.turn_order.len(), 4);
    assert!(!snapshot.turn_order.contains(&UnitId(5)));
    let head = snapshot.turn_order[0];
    assert_eq!(snapshot.active_unit, Some(head));
    assert_eq!(snapshot.unit(head).unwrap().pseudo_position, 0);

    // Same seed, same order.
    let again = start_battle(&BattleSnapshot::new(roster(), 5, 1234));
    assert_eq!(again, snapshot);
}

use std::collections::BTreeSet;

use battle_core::combat::apply_damage;
use battle_core::{
    BattleSnapshot, BattleState, Combatant, CommandRef, Role, Stats, Team, TriggerPhase, TurnFlags,
    UnitId, UnitStatus, apply_action, decide_and_act, end_turn, process_phase, start_battle,
};
use proptest::prelude::*;

#[derive(Clone, Debug)]
struct UnitSeed {
    max_hp: u32,
    hp: u32,
    atk: u32,
    shield: u32,
    ranged: bool,
}

fn unit_seed() -> impl Strategy<Value = UnitSeed> {
    (1u32..80, 1u32..25, 0u32..15, any::<bool>()).prop_flat_map(|(max_hp, atk, shield, ranged)| {
        (1..=max_hp).prop_map(move |hp| UnitSeed {
            max_hp,
            hp,
            atk,
            shield,
            ranged,
        })
    })
}

fn roster(allies: &[UnitSeed], enemies: &[UnitSeed]) -> Vec<Combatant> {
    let sides = allies
        .iter()
        .map(|seed| (Team::Ally, seed))
        .chain(enemies.iter().map(|seed| (Team::Enemy, seed)));
    sides
        .enumerate()
        .map(|(index, (team, seed))| {
            let role = if seed.ranged { Role::Ranged } else { Role::Melee };
            let stats = Stats::new(seed.max_hp, seed.atk)
                .with_hp(seed.hp)
                .with_shield(seed.shield);
            Combatant::new(UnitId(index as u32 + 1), format!("u{index}"), team, role, stats)
        })
        .collect()
}

fn living(snapshot: &BattleSnapshot) -> BTreeSet<UnitId> {
    snapshot
        .units
        .iter()
        .filter(|unit| unit.is_alive())
        .map(|unit| unit.id)
        .collect()
}

/// `settled` snapshots come straight out of the scheduler; mid-turn ones may
/// have an active unit that already acted.
fn check_invariants(snapshot: &BattleSnapshot, settled: bool) -> Result<(), TestCaseError> {
    prop_assert_ne!(snapshot.battle_state, BattleState::Error, "{}", snapshot.battle_message);

    for unit in &snapshot.units {
        prop_assert!(unit.stats.hp <= unit.stats.max_hp);
        prop_assert_eq!(unit.stats.hp == 0, unit.status == UnitStatus::Defeated);
    }

    let active = snapshot
        .units
        .iter()
        .filter(|unit| unit.status == UnitStatus::Active)
        .count();
    let ongoing = snapshot.battle_state == BattleState::Ongoing;
    prop_assert!(active <= 1);
    if settled {
        prop_assert_eq!(active == 1, ongoing);
    }

    let queued: BTreeSet<UnitId> = snapshot.turn_order.iter().copied().collect();
    prop_assert_eq!(queued.len(), snapshot.turn_order.len());
    prop_assert_eq!(queued, living(snapshot));

    // Settled turns always run on a freshly computed frame.
    if settled && ongoing {
        let n = snapshot.turn_order.len() as i32;
        for (k, id) in (0i32..).zip(&snapshot.turn_order) {
            let expected = if k <= n / 2 { k } else { k - n };
            let unit = snapshot.unit(*id).unwrap();
            prop_assert_eq!(unit.pseudo_position, expected, "{}", unit.name);
        }
    }
    Ok(())
}

/// Whether `end_turn` on `before` must open a new round.
fn expects_rollover(before: &BattleSnapshot) -> bool {
    let acted = before.active_unit;
    let acted_alive = acted
        .and_then(|id| before.unit(id))
        .is_some_and(|unit| unit.is_alive());
    if acted_alive && before.turn_flags.contains(TurnFlags::ACT_AGAIN) {
        return false;
    }
    !before
        .turn_order
        .iter()
        .filter(|id| Some(**id) != acted)
        .filter_map(|id| before.unit(*id))
        .any(|unit| unit.status == UnitStatus::Idle)
}

proptest! {
    #[test]
    fn shield_then_hp_accounting(
        max_hp in 1u32..500,
        hp_cut in 0u32..500,
        shield in 0u32..200,
        amount in 0u32..1_000,
    ) {
        let hp = max_hp - hp_cut.min(max_hp - 1);
        let mut stats = Stats::new(max_hp, 1).with_hp(hp).with_shield(shield);
        let report = apply_damage(&mut stats, amount);

        prop_assert_eq!(report.absorbed + report.hp_lost, amount.min(shield + hp));
        prop_assert_eq!(stats.shield_hp, shield - report.absorbed);
        prop_assert_eq!(stats.hp, hp - report.hp_lost);
        prop_assert_eq!(report.lethal, stats.hp == 0);
    }

    #[test]
    fn scripted_battles_keep_their_invariants(
        seed in any::<u64>(),
        allies in prop::collection::vec(unit_seed(), 1..4),
        enemies in prop::collection::vec(unit_seed(), 1..4),
    ) {
        let enemy_ids: Vec<UnitId> = (0..enemies.len())
            .map(|offset| UnitId((allies.len() + offset) as u32 + 1))
            .collect();
        let mut snapshot = start_battle(&BattleSnapshot::new(roster(&allies, &enemies), 10, seed));
        check_invariants(&snapshot, true)?;

        for _ in 0..120 {
            if snapshot.battle_state != BattleState::Ongoing {
                break;
            }
            let actor = snapshot.active_unit.expect("ongoing battle has an active unit");
            let (next, _) = process_phase(&snapshot, TriggerPhase::StartOfTurn);
            let next = match next.unit(actor).map(|unit| unit.team) {
                Some(Team::Enemy) => decide_and_act(&next),
                _ => apply_action(&next, actor, CommandRef::BasicAttack, &enemy_ids),
            };
            check_invariants(&next, false)?;
            let (next, _) = process_phase(&next, TriggerPhase::EndOfTurn);

            let rollover = expects_rollover(&next);
            let after = end_turn(&next);
            check_invariants(&after, true)?;

            prop_assert!(after.round >= next.round);
            if after.battle_state == BattleState::Ongoing {
                prop_assert_eq!(after.round > next.round, rollover);
                if rollover {
                    prop_assert_eq!(after.round, next.round + 1);
                    prop_assert_eq!(after.turn_in_round, 1);
                }
            }
            snapshot = after;
        }
    }
}

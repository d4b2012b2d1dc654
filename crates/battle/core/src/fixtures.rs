//! Deterministic rosters for unit tests.

use crate::command::{
    AreaShape, Command, CommandId, CommandKind, EffectKind, EffectSpec, Origin, SelectionPattern,
    TargetTypes, TargetingParams,
};
use crate::state::{
    BattleSnapshot, Combatant, Polarity, Role, Stats, StatusKind, Team, TriggerPhase, UnitId,
    UnitStatus,
};

pub const ANN: UnitId = UnitId(1);
pub const BOB: UnitId = UnitId(2);
pub const ORC: UnitId = UnitId(3);
pub const IMP: UnitId = UnitId(4);

pub const STUN_BOLT: CommandId = CommandId(10);
pub const BLAST: CommandId = CommandId(11);
pub const RAISE: CommandId = CommandId(12);
pub const FRENZY: CommandId = CommandId(13);

pub fn ally(id: UnitId, name: &str, role: Role, stats: Stats) -> Combatant {
    Combatant::new(id, name, Team::Ally, role, stats)
}

pub fn enemy(id: UnitId, name: &str, role: Role, stats: Stats) -> Combatant {
    Combatant::new(id, name, Team::Enemy, role, stats)
}

/// Marks the battle as started with a fixed turn order; the head is active.
pub fn started(units: Vec<Combatant>, order: &[UnitId], max_team_resource: u32) -> BattleSnapshot {
    let mut snapshot = BattleSnapshot::new(units, max_team_resource, 42);
    snapshot.round = 1;
    snapshot.turn_in_round = 1;
    snapshot.turn_order = order.to_vec();
    snapshot.active_unit = order.first().copied();
    if let Some(head) = order.first().and_then(|id| snapshot.unit_mut(*id)) {
        head.status = UnitStatus::Active;
    }
    snapshot.recompute_pseudo_positions();
    snapshot
}

/// Ann (ally, atk 15) is active against Orc (enemy, 60 hp).
pub fn duel() -> BattleSnapshot {
    started(
        vec![
            ally(ANN, "Ann", Role::Melee, Stats::new(50, 15)),
            enemy(ORC, "Orc", Role::Melee, Stats::new(60, 8)),
        ],
        &[ANN, ORC],
        5,
    )
}

/// Skills used across the action tests.
pub fn spellbook() -> Vec<Command> {
    vec![
        Command::new(
            STUN_BOLT,
            "Stun Bolt",
            CommandKind::Skill,
            TargetingParams::single(
                SelectionPattern::WithinDistance {
                    distance: 2,
                    direction: Default::default(),
                },
                TargetTypes::ENEMY,
            ),
        )
        .with_cost(2)
        .with_effect(EffectSpec::damage(0.5))
        .with_effect(EffectSpec::new(
            EffectKind::ApplyStatus {
                status: StatusKind::Stun,
                polarity: Polarity::Debuff,
                duration: 2,
                chance: 1.0,
                trigger: TriggerPhase::StartOfTurn,
            },
            Default::default(),
        )),
        Command::new(
            BLAST,
            "Blast",
            CommandKind::Ultimate,
            TargetingParams::single(
                SelectionPattern::WithinDistance {
                    distance: 2,
                    direction: Default::default(),
                },
                TargetTypes::ENEMY,
            )
            .with_area(
                Origin::Selected,
                AreaShape::RadiusAroundOrigin { distance: 2 },
                TargetTypes::ENEMY,
            ),
        )
        .with_cost(3)
        .with_effect(EffectSpec::damage(1.0)),
        Command::new(
            RAISE,
            "Raise",
            CommandKind::Skill,
            TargetingParams::single(SelectionPattern::AnyDefeatedAlly, TargetTypes::ALLY),
        )
        .with_cost(1)
        .with_effect(EffectSpec::new(
            EffectKind::Revive { hp_percentage: 0.5 },
            Default::default(),
        )),
        Command::new(
            FRENZY,
            "Frenzy",
            CommandKind::Skill,
            TargetingParams::single(
                SelectionPattern::WithinDistance {
                    distance: 2,
                    direction: Default::default(),
                },
                TargetTypes::ENEMY,
            ),
        )
        .with_effect(EffectSpec::damage(2.0))
        .with_effect(EffectSpec::new(
            EffectKind::ActAgain {
                trigger: crate::command::ActAgainTrigger::OnDefeat,
            },
            Default::default(),
        )),
    ]
}

/// Ann and Bob (allies) against Orc and Imp, in order Ann, Orc, Bob, Imp.
///
/// Pseudo-positions: Ann 0, Orc 1, Bob 2, Imp -1.
pub fn skirmish() -> BattleSnapshot {
    started(
        vec![
            ally(ANN, "Ann", Role::Melee, Stats::new(50, 15)).with_commands(spellbook()),
            ally(BOB, "Bob", Role::Ranged, Stats::new(40, 12)),
            enemy(ORC, "Orc", Role::Melee, Stats::new(60, 8)),
            enemy(IMP, "Imp", Role::Ranged, Stats::new(20, 6)),
        ],
        &[ANN, ORC, BOB, IMP],
        5,
    )
    .with_team_resource(5)
}

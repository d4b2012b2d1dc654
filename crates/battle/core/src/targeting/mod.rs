//! Targeting resolver.
//!
//! Pure functions from (actor, command, roster) to sets of unit ids. Nothing
//! here mutates the roster.
//!
//! Geometry uses the [`Track`] frame: living units sorted by pseudo-position,
//! where a unit's index is its order-index. The actor is excluded from every
//! primary pattern except [`SelectionPattern::SelfOnly`], and results are
//! deduplicated sets.

mod track;

use std::collections::BTreeSet;

pub use track::Track;

use crate::command::{AreaShape, Command, Direction, Origin, SelectionPattern, TargetTypes};
use crate::state::{Combatant, UnitId};

/// Whether `unit` falls in `types` from the actor's point of view.
pub fn matches_types(types: TargetTypes, actor: &Combatant, unit: &Combatant) -> bool {
    if unit.id == actor.id {
        types.contains(TargetTypes::SELF)
    } else if unit.team == actor.team {
        types.contains(TargetTypes::ALLY)
    } else {
        types.contains(TargetTypes::ENEMY)
    }
}

/// Units the actor may pick as primary target for `command`.
pub fn resolve_primary_targets(
    actor: &Combatant,
    command: &Command,
    units: &[Combatant],
) -> BTreeSet<UnitId> {
    let selection = &command.targeting.selection;
    let types = selection.targetable;
    let track = Track::new(units);

    if let SelectionPattern::SelfOnly = selection.pattern {
        return if types.contains(TargetTypes::SELF) {
            BTreeSet::from([actor.id])
        } else {
            BTreeSet::new()
        };
    }
    if let SelectionPattern::AnyDefeatedAlly = selection.pattern {
        return units
            .iter()
            .filter(|unit| unit.is_defeated() && unit.team == actor.team && unit.id != actor.id)
            .map(|unit| unit.id)
            .collect();
    }

    let Some(origin) = track.index_of(actor.id) else {
        return BTreeSet::new();
    };
    let candidate = |unit: &Combatant| unit.id != actor.id && matches_types(types, actor, unit);

    match &selection.pattern {
        SelectionPattern::Adjacent => [origin as isize - 1, origin as isize + 1]
            .into_iter()
            .filter_map(|index| track.get_signed(index))
            .filter(|unit| candidate(*unit))
            .map(|unit| unit.id)
            .collect(),

        SelectionPattern::WithinDistance {
            distance,
            direction,
        } => track
            .iter()
            .filter(|(index, _)| {
                let in_direction = match direction {
                    Direction::Forward => *index > origin,
                    Direction::Backward => *index < origin,
                    Direction::Both => true,
                };
                in_direction && index.abs_diff(origin) <= *distance as usize
            })
            .map(|(_, unit)| unit)
            .filter(|unit| candidate(*unit))
            .map(|unit| unit.id)
            .collect(),

        SelectionPattern::SpecificPositions { offsets, circular } => {
            if *circular {
                offsets
                    .iter()
                    .filter_map(|offset| track.get_wrapped(origin as isize + *offset as isize))
                    .filter(|unit| candidate(*unit))
                    .map(|unit| unit.id)
                    .collect()
            } else {
                offsets
                    .iter()
                    .filter_map(|offset| actor.pseudo_position.checked_add(*offset))
                    .flat_map(|position| {
                        track
                            .iter()
                            .map(|(_, unit)| unit)
                            .filter(move |unit| unit.pseudo_position == position)
                    })
                    .filter(|unit| candidate(*unit))
                    .map(|unit| unit.id)
                    .collect()
            }
        }

        SelectionPattern::NearestEnemy => {
            let nearest = track
                .iter()
                .filter(|(_, unit)| unit.team != actor.team)
                .min_by_key(|(index, _)| (index.abs_diff(origin), *index))
                .map(|(_, unit)| unit.id);
            tracing::warn!(
                target: "battle::targeting",
                actor = %actor.id,
                command = %command.name,
                fallback = ?nearest,
                "command uses the nearest-enemy fallback pattern"
            );
            nearest.into_iter().collect()
        }

        SelectionPattern::SelfOnly | SelectionPattern::AnyDefeatedAlly => BTreeSet::new(),
    }
}

/// Units hit by the area of `command` centred on `primary` (or on the caster,
/// depending on the area's origin).
///
/// Returns an empty set when the origin cannot be resolved; the caller treats
/// that as the ability whiffing.
pub fn resolve_affected_targets(
    primary: Option<UnitId>,
    actor: &Combatant,
    command: &Command,
    units: &[Combatant],
) -> BTreeSet<UnitId> {
    let area = &command.targeting.area;
    let origin_id = match area.origin {
        Origin::Caster => Some(actor.id),
        Origin::Selected => primary,
    };
    let Some(origin_id) = origin_id else {
        return BTreeSet::new();
    };
    let Some(origin_unit) = units.iter().find(|unit| unit.id == origin_id) else {
        return BTreeSet::new();
    };
    let affected = |unit: &Combatant| matches_types(area.affected, actor, unit);

    // Single-target areas work on defeated units too (revive).
    if let AreaShape::SingleOnSelected = area.shape {
        return if affected(origin_unit) {
            BTreeSet::from([origin_id])
        } else {
            BTreeSet::new()
        };
    }

    let track = Track::new(units);
    let Some(origin) = track.index_of(origin_id) else {
        return BTreeSet::new();
    };

    match area.shape {
        AreaShape::RadiusAroundOrigin { distance } => track
            .iter()
            .filter(|(index, _)| track.circular_distance(*index, origin) <= distance as usize)
            .map(|(_, unit)| unit)
            .filter(|unit| affected(*unit))
            .map(|unit| unit.id)
            .collect(),

        AreaShape::LineThroughTarget { distance } => {
            let step = distance as isize;
            [origin as isize - step, origin as isize, origin as isize + step]
                .into_iter()
                .filter_map(|index| track.get_signed(index))
                .filter(|unit| affected(*unit))
                .map(|unit| unit.id)
                .collect()
        }

        AreaShape::SingleOnSelected => BTreeSet::new(),
    }
}

/// Opponents of the caster at order-index distance 1.
pub fn adjacent_opponents(actor: &Combatant, units: &[Combatant]) -> BTreeSet<UnitId> {
    let track = Track::new(units);
    let Some(origin) = track.index_of(actor.id) else {
        return BTreeSet::new();
    };
    [origin as isize - 1, origin as isize + 1]
        .into_iter()
        .filter_map(|index| track.get_signed(index))
        .filter(|unit| unit.team != actor.team)
        .map(|unit| unit.id)
        .collect()
}

/// Living member of the caster's team with the lowest hp; ties go to the
/// lowest id.
pub fn lowest_hp_ally(actor: &Combatant, units: &[Combatant]) -> Option<UnitId> {
    units
        .iter()
        .filter(|unit| unit.team == actor.team && unit.is_alive())
        .min_by_key(|unit| (unit.stats.hp, unit.id))
        .map(|unit| unit.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandId, CommandKind, TargetingParams};
    use crate::state::{Role, Stats, Team, UnitStatus};

    fn unit(id: u32, team: Team, position: i32) -> Combatant {
        Combatant::new(UnitId(id), format!("u{id}"), team, Role::Melee, Stats::new(30, 5))
            .with_pseudo_position(position)
    }

    /// Actor #1 at 0, allies at -2/+1, enemies at -1/+2.
    fn roster() -> Vec<Combatant> {
        vec![
            unit(1, Team::Ally, 0),
            unit(2, Team::Ally, 1),
            unit(3, Team::Enemy, 2),
            unit(4, Team::Ally, -2),
            unit(5, Team::Enemy, -1),
        ]
    }

    fn command(targeting: TargetingParams) -> Command {
        Command::new(CommandId(7), "Test", CommandKind::Skill, targeting)
    }

    fn ids(values: &[u32]) -> BTreeSet<UnitId> {
        values.iter().map(|v| UnitId(*v)).collect()
    }

    #[test]
    fn adjacent_picks_both_neighbours_of_matching_team() {
        let units = roster();
        let any = TargetTypes::ALLY | TargetTypes::ENEMY;
        let cmd = command(TargetingParams::single(SelectionPattern::Adjacent, any));
        assert_eq!(resolve_primary_targets(&units[0], &cmd, &units), ids(&[2, 5]));

        let cmd = command(TargetingParams::single(
            SelectionPattern::Adjacent,
            TargetTypes::ENEMY,
        ));
        assert_eq!(resolve_primary_targets(&units[0], &cmd, &units), ids(&[5]));
    }

    #[test]
    fn within_distance_honours_direction() {
        let units = roster();
        let any = TargetTypes::ALLY | TargetTypes::ENEMY;
        let forward = command(TargetingParams::single(
            SelectionPattern::WithinDistance {
                distance: 2,
                direction: Direction::Forward,
            },
            any,
        ));
        assert_eq!(resolve_primary_targets(&units[0], &forward, &units), ids(&[2, 3]));

        let backward = command(TargetingParams::single(
            SelectionPattern::WithinDistance {
                distance: 1,
                direction: Direction::Backward,
            },
            any,
        ));
        assert_eq!(resolve_primary_targets(&units[0], &backward, &units), ids(&[5]));
    }

    #[test]
    fn specific_positions_circular_and_absolute() {
        let units = roster();
        let any = TargetTypes::ALLY | TargetTypes::ENEMY;

        // Track: #4(-2) #5(-1) #1(0) #2(1) #3(2); actor index 2.
        let circular = command(TargetingParams::single(
            SelectionPattern::SpecificPositions {
                offsets: vec![3, 3, -5],
                circular: true,
            },
            any,
        ));
        // +3 wraps to index 0 (#4); -5 wraps back onto the actor and is dropped.
        assert_eq!(resolve_primary_targets(&units[0], &circular, &units), ids(&[4]));

        let absolute = command(TargetingParams::single(
            SelectionPattern::SpecificPositions {
                offsets: vec![2, 3],
                circular: false,
            },
            any,
        ));
        assert_eq!(resolve_primary_targets(&units[0], &absolute, &units), ids(&[3]));
    }

    #[test]
    fn self_requires_self_type() {
        let units = roster();
        let cmd = command(TargetingParams::self_only());
        assert_eq!(resolve_primary_targets(&units[0], &cmd, &units), ids(&[1]));

        let cmd = command(TargetingParams::single(
            SelectionPattern::SelfOnly,
            TargetTypes::ALLY,
        ));
        assert!(resolve_primary_targets(&units[0], &cmd, &units).is_empty());
    }

    #[test]
    fn any_defeated_ally_ignores_geometry() {
        let mut units = roster();
        units[3].stats.hp = 0;
        units[3].status = UnitStatus::Defeated;
        units[4].stats.hp = 0;
        units[4].status = UnitStatus::Defeated;

        let cmd = command(TargetingParams::single(
            SelectionPattern::AnyDefeatedAlly,
            TargetTypes::ALLY,
        ));
        assert_eq!(resolve_primary_targets(&units[0], &cmd, &units), ids(&[4]));
    }

    #[test]
    fn nearest_enemy_fallback_prefers_lower_index_on_ties() {
        let units = roster();
        let cmd = command(TargetingParams::single(
            SelectionPattern::NearestEnemy,
            TargetTypes::ENEMY,
        ));
        assert_eq!(resolve_primary_targets(&units[0], &cmd, &units), ids(&[5]));
    }

    #[test]
    fn radius_hits_origin_and_circular_neighbours_from_any_seat() {
        let units = roster();
        let everyone = TargetTypes::SELF | TargetTypes::ALLY | TargetTypes::ENEMY;
        let cmd = command(
            TargetingParams::single(SelectionPattern::Adjacent, everyone).with_area(
                Origin::Selected,
                AreaShape::RadiusAroundOrigin { distance: 1 },
                everyone,
            ),
        );

        // Track order: 4, 5, 1, 2, 3
        let expected = [
            (4, [3, 4, 5]),
            (5, [4, 5, 1]),
            (1, [5, 1, 2]),
            (2, [1, 2, 3]),
            (3, [2, 3, 4]),
        ];
        for (origin, hit) in expected {
            assert_eq!(
                resolve_affected_targets(Some(UnitId(origin)), &units[0], &cmd, &units),
                ids(&hit),
                "origin #{origin}"
            );
        }
    }

    #[test]
    fn line_through_target_takes_both_ends() {
        let units = roster();
        let any = TargetTypes::ALLY | TargetTypes::ENEMY;
        let cmd = command(TargetingParams::single(SelectionPattern::Adjacent, any).with_area(
            Origin::Selected,
            AreaShape::LineThroughTarget { distance: 2 },
            any,
        ));
        // Origin #5 at index 1: index -1 does not exist, index 3 is #2.
        assert_eq!(
            resolve_affected_targets(Some(UnitId(5)), &units[0], &cmd, &units),
            ids(&[5, 2])
        );
    }

    #[test]
    fn unresolvable_origin_whiffs() {
        let units = roster();
        let cmd = command(TargetingParams::single(
            SelectionPattern::Adjacent,
            TargetTypes::ENEMY,
        ));
        assert!(resolve_affected_targets(None, &units[0], &cmd, &units).is_empty());
        assert!(resolve_affected_targets(Some(UnitId(42)), &units[0], &cmd, &units).is_empty());
    }

    #[test]
    fn helper_selectors() {
        let mut units = roster();
        units[1].stats.hp = 4;
        assert_eq!(adjacent_opponents(&units[0], &units), ids(&[5]));
        assert_eq!(lowest_hp_ally(&units[0], &units), Some(UnitId(2)));
    }
}

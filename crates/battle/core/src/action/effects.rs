//! Per-kind effect application.
//!
//! Every function here assumes the actor exists and is alive. Defeated
//! targets are skipped by everything except revive, which only touches
//! defeated targets.

use std::collections::BTreeSet;

use crate::combat::{apply_damage, scaled};
use crate::command::{ActAgainTrigger, EffectKind, EffectScope, EffectSpec};
use crate::config::EngineConfig;
use crate::state::{
    EffectGrant, EffectSource, EffectTarget, Polarity, StatusKind, TeamScope, TriggerPhase,
    TurnFlags, UnitId,
};
use crate::targeting;

use super::context::EffectContext;

/// Units an effect spec lands on, resolved against the roster as it is when
/// the effect runs.
pub fn scope_targets(
    scope: EffectScope,
    affected: &BTreeSet<UnitId>,
    ctx: &EffectContext<'_>,
) -> Vec<UnitId> {
    let Some(actor) = ctx.snapshot.unit(ctx.actor) else {
        return Vec::new();
    };
    match scope {
        EffectScope::Caster => vec![ctx.actor],
        EffectScope::Targets => affected.iter().copied().collect(),
        EffectScope::CasterAdjacentEnemies => {
            targeting::adjacent_opponents(actor, &ctx.snapshot.units)
                .into_iter()
                .collect()
        }
        EffectScope::LowestHpAlly => targeting::lowest_hp_ally(actor, &ctx.snapshot.units)
            .into_iter()
            .collect(),
    }
}

pub fn apply_effect(spec: &EffectSpec, targets: &[UnitId], ctx: &mut EffectContext<'_>) {
    match &spec.kind {
        EffectKind::Damage { multiplier } => damage(*multiplier, targets, ctx),
        EffectKind::Heal { multiplier, flat } => heal(*multiplier, *flat, targets, ctx),
        EffectKind::Shield { multiplier, flat } => shield(*multiplier, *flat, targets, ctx),
        EffectKind::ApplyStatus {
            status,
            polarity,
            duration,
            chance,
            trigger,
        } => {
            for &target in targets {
                apply_status(target, status, *polarity, *duration, *chance, *trigger, ctx);
            }
        }
        EffectKind::Revive { hp_percentage } => revive(*hp_percentage, targets, ctx),
        EffectKind::ActAgain { trigger } => act_again(*trigger, ctx),
        EffectKind::TeamEffect {
            status,
            polarity,
            team,
            duration,
            trigger,
        } => team_effect(status, *polarity, *team, *duration, *trigger, ctx),
    }
}

fn is_alive(ctx: &EffectContext<'_>, id: UnitId) -> bool {
    ctx.snapshot.unit(id).is_some_and(|unit| unit.is_alive())
}

fn damage(multiplier: f32, targets: &[UnitId], ctx: &mut EffectContext<'_>) {
    let amount = scaled(ctx.actor_atk(), multiplier);
    for &target in targets {
        let Some(unit) = ctx.snapshot.unit_mut(target) else {
            continue;
        };
        if unit.is_defeated() {
            continue;
        }
        let report = apply_damage(&mut unit.stats, amount);
        let name = unit.name.clone();

        if report.absorbed > 0 {
            ctx.note(format!(
                "{name}: -{} HP ({} absorbed)",
                report.hp_lost, report.absorbed
            ));
        } else {
            ctx.note(format!("{name}: -{} HP", report.hp_lost));
        }
        if report.lethal {
            ctx.snapshot.mark_defeated(target);
            ctx.defeated.push(target);
            ctx.note(format!("{name} is defeated"));
        }
    }
}

fn heal(multiplier: f32, flat: u32, targets: &[UnitId], ctx: &mut EffectContext<'_>) {
    let amount = scaled(ctx.actor_atk(), multiplier).saturating_add(flat);
    for &target in targets {
        let Some(unit) = ctx.snapshot.unit_mut(target) else {
            continue;
        };
        if unit.is_defeated() {
            continue;
        }
        let before = unit.stats.hp;
        unit.stats.hp = before.saturating_add(amount).min(unit.stats.max_hp);
        let line = format!("{}: +{} HP", unit.name, unit.stats.hp - before);
        ctx.note(line);
    }
}

fn shield(multiplier: f32, flat: u32, targets: &[UnitId], ctx: &mut EffectContext<'_>) {
    let amount = scaled(ctx.actor_atk(), multiplier).saturating_add(flat);
    let cap = ctx.config.shield_cap;
    for &target in targets {
        let Some(unit) = ctx.snapshot.unit_mut(target) else {
            continue;
        };
        if unit.is_defeated() {
            continue;
        }
        let before = unit.stats.shield_hp;
        let raised = cap.clamp(before.saturating_add(amount), unit.stats.max_hp);
        unit.stats.shield_hp = raised.max(before);
        let line = format!("{}: +{} shield", unit.name, unit.stats.shield_hp - before);
        ctx.note(line);
    }
}

fn has_room_for(ctx: &EffectContext<'_>, grant: &EffectGrant) -> bool {
    ctx.snapshot.effects.len() < EngineConfig::MAX_LINGERING_EFFECTS
        || ctx
            .snapshot
            .effects
            .iter()
            .any(|effect| effect.target == grant.target && effect.kind.name() == grant.kind.name())
}

fn apply_status(
    target: UnitId,
    status: &StatusKind,
    polarity: Polarity,
    duration: u32,
    chance: f32,
    trigger: TriggerPhase,
    ctx: &mut EffectContext<'_>,
) {
    if !is_alive(ctx, target) {
        return;
    }
    let name = ctx.name_of(target);
    if !ctx.roller.chance(chance) {
        ctx.note(format!("{name} resisted {}", status.name()));
        return;
    }

    let grant = EffectGrant {
        kind: status.clone(),
        polarity,
        trigger,
        target: EffectTarget::Unit(target),
        duration,
        source: EffectSource::Unit(ctx.actor),
    };
    if !has_room_for(ctx, &grant) {
        tracing::warn!(
            target: "battle::action",
            unit = %target,
            status = status.name(),
            "lingering effect limit reached, status dropped"
        );
        return;
    }
    ctx.snapshot.refresh_or_add_effect(grant);
    ctx.note(format!("{name}: {} ({duration})", status.name()));
}

fn revive(hp_percentage: f32, targets: &[UnitId], ctx: &mut EffectContext<'_>) {
    for &target in targets {
        let Some(unit) = ctx.snapshot.unit(target) else {
            continue;
        };
        if unit.is_alive() {
            continue;
        }
        let hp = scaled(unit.stats.max_hp, hp_percentage).max(1);
        let name = unit.name.clone();
        ctx.snapshot.restore_from_defeat(target, hp);
        let restored = ctx.snapshot.unit(target).map_or(hp, |unit| unit.stats.hp);
        ctx.note(format!("{name} is revived with {restored} HP"));
    }
}

fn act_again(trigger: ActAgainTrigger, ctx: &mut EffectContext<'_>) {
    let earned = match trigger {
        ActAgainTrigger::Always => true,
        ActAgainTrigger::OnDefeat => !ctx.defeated.is_empty(),
    };
    if earned && is_alive(ctx, ctx.actor) {
        ctx.snapshot.turn_flags.insert(TurnFlags::ACT_AGAIN);
        let name = ctx.name_of(ctx.actor);
        ctx.note(format!("{name} may act again"));
    }
}

fn team_effect(
    status: &StatusKind,
    polarity: Polarity,
    team: TeamScope,
    duration: u32,
    trigger: TriggerPhase,
    ctx: &mut EffectContext<'_>,
) {
    let grant = EffectGrant {
        kind: status.clone(),
        polarity,
        trigger,
        target: EffectTarget::Team(team),
        duration,
        source: EffectSource::Unit(ctx.actor),
    };
    if !has_room_for(ctx, &grant) {
        return;
    }
    ctx.snapshot.refresh_or_add_effect(grant);
    ctx.note(format!("{}: {} ({duration})", team.team(), status.name()));
}

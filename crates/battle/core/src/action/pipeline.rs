use std::collections::BTreeSet;

use crate::command::{Command, CommandRef, EffectScope, Origin, SelectionPattern};
use crate::config::EngineConfig;
use crate::rng::Roller;
use crate::state::{
    ActionOutcome, BattleSnapshot, Combatant, LastActionSummary, SnapshotError, Team, TurnFlags,
    UnitId, UnitStatus,
};
use crate::targeting;
use crate::transition::{BattleEnv, BattleTransition};

use super::context::EffectContext;
use super::effects::{apply_effect, scope_targets};
use super::error::ActionError;

/// The active unit uses one of its commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UseCommand {
    pub actor: UnitId,
    pub command: CommandRef,
    /// Primary targets picked by the caller. Ignored for caster-origin areas.
    pub selected: Vec<UnitId>,
}

impl UseCommand {
    pub fn new(actor: UnitId, command: impl Into<CommandRef>, selected: Vec<UnitId>) -> Self {
        Self {
            actor,
            command: command.into(),
            selected,
        }
    }

    /// Looks the command up in the actor's catalog, synthesizing a basic
    /// attack from the actor's role when the catalog has none.
    pub fn resolve_command(
        &self,
        actor: &Combatant,
        config: &EngineConfig,
    ) -> Result<Command, ActionError> {
        match self.command {
            CommandRef::Id(id) => {
                actor
                    .command(id)
                    .cloned()
                    .ok_or(ActionError::CommandNotFound {
                        actor: actor.id,
                        command: id,
                    })
            }
            CommandRef::BasicAttack => Ok(actor
                .basic_attack()
                .cloned()
                .unwrap_or_else(|| Command::basic_attack(config.reach(actor.role)))),
        }
    }

    /// Caller selections that are legal primary targets.
    ///
    /// Self-only and nearest-enemy commands fill in their single target when
    /// the caller selected nothing.
    fn valid_selection(
        &self,
        actor: &Combatant,
        command: &Command,
        units: &[Combatant],
    ) -> BTreeSet<UnitId> {
        let primary = targeting::resolve_primary_targets(actor, command, units);
        let implicit = matches!(
            command.targeting.selection.pattern,
            SelectionPattern::SelfOnly | SelectionPattern::NearestEnemy
        );
        if self.selected.is_empty() && implicit {
            return primary;
        }
        self.selected
            .iter()
            .filter(|id| primary.contains(id))
            .copied()
            .collect()
    }

    fn affected_set(
        &self,
        actor: &Combatant,
        command: &Command,
        units: &[Combatant],
    ) -> BTreeSet<UnitId> {
        if command.targeting.area.origin == Origin::Caster {
            return targeting::resolve_affected_targets(None, actor, command, units);
        }
        self.valid_selection(actor, command, units)
            .into_iter()
            .flat_map(|primary| {
                targeting::resolve_affected_targets(Some(primary), actor, command, units)
            })
            .collect()
    }
}

impl BattleTransition for UseCommand {
    type Error = ActionError;
    type Output = LastActionSummary;

    const NAME: &'static str = "apply_action";

    fn pre_validate(
        &self,
        snapshot: &BattleSnapshot,
        env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        snapshot.validate().map_err(ActionError::Snapshot)?;
        if !snapshot.is_started() {
            return Err(ActionError::Snapshot(SnapshotError::NotStarted));
        }

        let actor = snapshot
            .unit(self.actor)
            .ok_or(ActionError::ActorNotFound(self.actor))?;
        if snapshot.active_unit != Some(self.actor) {
            return Err(ActionError::NotActorsTurn {
                actor: self.actor,
                active: snapshot.active_unit,
            });
        }
        let command = self.resolve_command(actor, env.config)?;

        if actor.is_defeated() {
            return Err(ActionError::ActorDefeated(self.actor));
        }
        // A granted extra turn starts only after the scheduler runs.
        if actor.status == UnitStatus::EndTurn
            || snapshot.turn_flags.contains(TurnFlags::ACT_AGAIN)
        {
            return Err(ActionError::AlreadyActed(self.actor));
        }
        if snapshot.is_stunned(self.actor) {
            return Err(ActionError::Stunned(self.actor));
        }

        if command.kind.spends_resource()
            && actor.team == Team::Ally
            && snapshot.team_resource < command.resource_cost
        {
            return Err(ActionError::InsufficientResource {
                required: command.resource_cost,
                available: snapshot.team_resource,
            });
        }

        if command.requires_selection()
            && self
                .valid_selection(actor, &command, &snapshot.units)
                .is_empty()
        {
            return Err(ActionError::NoValidTarget);
        }

        Ok(())
    }

    fn apply(
        &self,
        snapshot: &mut BattleSnapshot,
        env: &BattleEnv<'_>,
    ) -> Result<Self::Output, Self::Error> {
        let actor = snapshot
            .unit(self.actor)
            .cloned()
            .ok_or(ActionError::ActorNotFound(self.actor))?;
        let command = self.resolve_command(&actor, env.config)?;
        let affected = self.affected_set(&actor, &command, &snapshot.units);

        // The team pool belongs to the allies.
        if actor.team == Team::Ally {
            if command.kind.spends_resource() {
                snapshot.team_resource -= command.resource_cost.min(snapshot.team_resource);
            } else {
                snapshot.grant_resource(env.config.basic_attack_resource_gain);
            }
        }

        let roller = Roller::new(env.rng, snapshot.rng, self.actor);
        let mut ctx = EffectContext::new(self.actor, snapshot, env.config, roller);
        for spec in &command.effects {
            let targets = scope_targets(spec.scope, &affected, &ctx);
            apply_effect(spec, &targets, &mut ctx);
        }

        let whiffed = affected.is_empty()
            && command
                .effects
                .iter()
                .any(|spec| spec.scope == EffectScope::Targets);
        if whiffed {
            ctx.note(format!("{} hits nothing", command.name));
        }

        let EffectContext {
            lines, defeated, ..
        } = ctx;

        if !snapshot.turn_flags.contains(TurnFlags::ACT_AGAIN)
            && let Some(unit) = snapshot.unit_mut(self.actor)
            && unit.is_alive()
        {
            unit.status = UnitStatus::EndTurn;
        }

        tracing::debug!(
            target: "battle::action",
            actor = %self.actor,
            command = %command.name,
            targets = affected.len(),
            defeated = defeated.len(),
            "command resolved"
        );

        let summary = LastActionSummary::new(self.actor, command.name.clone())
            .with_targets(affected)
            .with_effects(&lines)
            .with_outcome(ActionOutcome::Applied);

        snapshot.battle_message = if lines.is_empty() {
            format!("{} uses {}", actor.name, command.name)
        } else {
            format!("{} uses {}: {}", actor.name, command.name, lines.join("; "))
        };
        snapshot.last_action = Some(summary.clone());

        Ok(summary)
    }

    fn post_validate(
        &self,
        snapshot: &BattleSnapshot,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        snapshot.validate().map_err(ActionError::Invariant)
    }

    fn refused_summary(&self, snapshot: &BattleSnapshot) -> Option<LastActionSummary> {
        let name = snapshot
            .unit(self.actor)
            .and_then(|actor| match self.command {
                CommandRef::Id(id) => actor.command(id).map(|command| command.name.clone()),
                CommandRef::BasicAttack => Some(
                    actor
                        .basic_attack()
                        .map_or_else(|| "Basic Attack".to_owned(), |command| command.name.clone()),
                ),
            })
            .unwrap_or_else(|| self.command.to_string());
        Some(LastActionSummary::new(self.actor, name))
    }
}

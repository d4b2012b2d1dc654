//! Battle snapshot: the single serializable aggregate every transition reads
//! and rewrites.
//!
//! Units live in an id-indexed roster. Lingering effects live once in a
//! global store and per-unit status lists are computed views over it.

mod error;
mod types;

use std::collections::BTreeSet;

pub use error::SnapshotError;
pub use types::*;

use crate::config::EngineConfig;

/// Complete, self-describing state of one encounter.
///
/// The engine keeps nothing between calls: whatever the next transition needs
/// is carried here.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    /// Current round, starting at 1. `0` means the battle has not started.
    #[cfg_attr(feature = "serde", serde(default))]
    pub round: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub turn_in_round: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub battle_state: BattleState,
    #[cfg_attr(feature = "serde", serde(default))]
    pub active_unit: Option<UnitId>,
    /// Living unit ids in acting order, rotated so the active unit is first.
    #[cfg_attr(feature = "serde", serde(default))]
    pub turn_order: Vec<UnitId>,
    pub units: Vec<Combatant>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub team_resource: u32,
    pub max_team_resource: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<LingeringEffect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_action: Option<LastActionSummary>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub battle_message: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub turn_flags: TurnFlags,
    /// Enemies defeated so far, in defeat order. Consumed by reward tooling.
    #[cfg_attr(feature = "serde", serde(default))]
    pub defeated_enemies: Vec<UnitId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rng: RngState,
    #[cfg_attr(feature = "serde", serde(default))]
    pub next_effect_id: u32,
}

impl BattleSnapshot {
    /// Creates a battle that has not started yet.
    pub fn new(units: Vec<Combatant>, max_team_resource: u32, seed: u64) -> Self {
        Self {
            round: 0,
            turn_in_round: 0,
            battle_state: BattleState::Ongoing,
            active_unit: None,
            turn_order: Vec::new(),
            units,
            team_resource: 0,
            max_team_resource,
            effects: Vec::new(),
            last_action: None,
            battle_message: String::new(),
            turn_flags: TurnFlags::empty(),
            defeated_enemies: Vec::new(),
            rng: RngState::new(seed),
            next_effect_id: 0,
        }
    }

    pub fn with_team_resource(mut self, team_resource: u32) -> Self {
        self.team_resource = team_resource.min(self.max_team_resource);
        self
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    pub fn is_started(&self) -> bool {
        self.round > 0
    }

    pub fn unit(&self, id: UnitId) -> Option<&Combatant> {
        self.units.iter().find(|unit| unit.id == id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Combatant> {
        self.units.iter_mut().find(|unit| unit.id == id)
    }

    pub fn active(&self) -> Option<&Combatant> {
        self.active_unit.and_then(|id| self.unit(id))
    }

    pub fn living(&self, team: Team) -> impl Iterator<Item = &Combatant> + '_ {
        self.units
            .iter()
            .filter(move |unit| unit.team == team && unit.is_alive())
    }

    pub fn living_count(&self, team: Team) -> usize {
        self.living(team).count()
    }

    /// Buffs and debuffs bound to one unit.
    ///
    /// Team-scoped effects are not mirrored here; they belong to the team.
    pub fn status_view(&self, id: UnitId) -> StatusView {
        let mut view = StatusView::default();
        for effect in self.effects.iter().filter(|effect| effect.targets_unit(id)) {
            let entry = StatusEntry {
                name: effect.kind.name().to_owned(),
                duration: effect.duration,
                source: effect.source.clone(),
            };
            match effect.polarity {
                Polarity::Buff => view.buffs.push(entry),
                Polarity::Debuff => view.debuffs.push(entry),
            }
        }
        view
    }

    /// A unit is stunned when a stun fired for it this turn or a stun is
    /// still bound to it.
    pub fn is_stunned(&self, id: UnitId) -> bool {
        let flagged = self.active_unit == Some(id) && self.turn_flags.contains(TurnFlags::STUNNED);
        flagged
            || self
                .effects
                .iter()
                .any(|effect| effect.targets_unit(id) && effect.kind == StatusKind::Stun)
    }

    // ========================================================================
    // Mutators shared by the transitions
    // ========================================================================

    /// Registers a lingering effect and returns its id.
    ///
    /// Also the entry point for item and consumable scripts.
    pub fn add_lingering_effect(&mut self, grant: EffectGrant) -> EffectId {
        let id = EffectId(self.next_effect_id);
        self.next_effect_id = self.next_effect_id.wrapping_add(1);
        self.effects.push(LingeringEffect {
            id,
            kind: grant.kind,
            polarity: grant.polarity,
            trigger: grant.trigger,
            target: grant.target,
            duration: grant.duration,
            source: grant.source,
        });
        id
    }

    /// Refreshes an effect of the same name on the same target to the longer
    /// duration, or registers a new one. Returns the id and whether it was a
    /// refresh.
    pub fn refresh_or_add_effect(&mut self, grant: EffectGrant) -> (EffectId, bool) {
        if let Some(existing) = self
            .effects
            .iter_mut()
            .find(|effect| effect.target == grant.target && effect.kind.name() == grant.kind.name())
        {
            existing.duration = existing.duration.max(grant.duration);
            existing.kind = grant.kind;
            return (existing.id, true);
        }
        (self.add_lingering_effect(grant), false)
    }

    /// Adds to the team pool, capped at the maximum. Returns the amount gained.
    pub fn grant_resource(&mut self, amount: u32) -> u32 {
        let before = self.team_resource;
        self.team_resource = before.saturating_add(amount).min(self.max_team_resource);
        self.team_resource - before
    }

    /// Moves a unit to `Defeated` and drops everything bound to it.
    pub(crate) fn mark_defeated(&mut self, id: UnitId) {
        let Some(unit) = self.unit_mut(id) else {
            return;
        };
        unit.stats.hp = 0;
        unit.stats.shield_hp = 0;
        unit.status = UnitStatus::Defeated;
        let team = unit.team;

        self.turn_order.retain(|entry| *entry != id);
        self.effects.retain(|effect| !effect.targets_unit(id));
        if team == Team::Enemy && !self.defeated_enemies.contains(&id) {
            self.defeated_enemies.push(id);
        }
    }

    /// Brings a defeated unit back with `hp` and queues it at the tail of the
    /// current turn order.
    pub(crate) fn restore_from_defeat(&mut self, id: UnitId, hp: u32) {
        let Some(unit) = self.unit_mut(id) else {
            return;
        };
        unit.stats.hp = hp.clamp(1, unit.stats.max_hp.max(1));
        unit.stats.shield_hp = 0;
        unit.status = UnitStatus::Idle;

        self.effects.retain(|effect| !effect.targets_unit(id));
        self.defeated_enemies.retain(|entry| *entry != id);
        if self.is_started() && !self.turn_order.contains(&id) {
            self.turn_order.push(id);
            self.recompute_pseudo_positions();
        }
    }

    /// Assigns each living unit its bipolar offset from the head of the turn
    /// order: `k` for the k-th unit while `k <= n / 2`, `k - n` past the
    /// midpoint.
    pub(crate) fn recompute_pseudo_positions(&mut self) {
        let n = self.turn_order.len();
        let order = self.turn_order.clone();
        for (k, id) in order.into_iter().enumerate() {
            let offset = if k <= n / 2 {
                k as i32
            } else {
                k as i32 - n as i32
            };
            if let Some(unit) = self.unit_mut(id) {
                unit.pseudo_position = offset;
            }
        }
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Checks the structural invariants every transition relies on.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.units.len() > EngineConfig::MAX_UNITS {
            return Err(SnapshotError::TooManyUnits {
                count: self.units.len(),
                limit: EngineConfig::MAX_UNITS,
            });
        }

        let mut seen = BTreeSet::new();
        for unit in &self.units {
            if !seen.insert(unit.id) {
                return Err(SnapshotError::DuplicateUnit(unit.id));
            }
            if unit.stats.hp > unit.stats.max_hp {
                return Err(SnapshotError::HpAboveMax {
                    unit: unit.id,
                    hp: unit.stats.hp,
                    max_hp: unit.stats.max_hp,
                });
            }
            if (unit.stats.hp == 0) != unit.is_defeated() {
                return Err(SnapshotError::DefeatMismatch(unit.id));
            }
            if unit.commands.len() > EngineConfig::MAX_COMMANDS {
                return Err(SnapshotError::TooManyCommands {
                    unit: unit.id,
                    count: unit.commands.len(),
                    limit: EngineConfig::MAX_COMMANDS,
                });
            }
        }

        if self.team_resource > self.max_team_resource {
            return Err(SnapshotError::ResourceAboveMax {
                value: self.team_resource,
                max: self.max_team_resource,
            });
        }

        if self.effects.len() > EngineConfig::MAX_LINGERING_EFFECTS {
            return Err(SnapshotError::TooManyEffects {
                count: self.effects.len(),
                limit: EngineConfig::MAX_LINGERING_EFFECTS,
            });
        }
        for effect in &self.effects {
            if let EffectTarget::Unit(target) = effect.target
                && !self.unit(target).is_some_and(Combatant::is_alive)
            {
                return Err(SnapshotError::DanglingEffect {
                    effect: effect.id,
                    unit: target,
                });
            }
        }

        if !self.is_started() {
            if let Some(unit) = self.units.iter().find(|u| u.status == UnitStatus::Active) {
                return Err(SnapshotError::ActiveBeforeStart(unit.id));
            }
            return Ok(());
        }

        let mut queued = BTreeSet::new();
        for id in &self.turn_order {
            if !queued.insert(*id) {
                return Err(SnapshotError::DuplicateInTurnOrder(*id));
            }
        }
        let living: BTreeSet<UnitId> = self
            .units
            .iter()
            .filter(|unit| unit.is_alive())
            .map(|unit| unit.id)
            .collect();
        if queued != living {
            return Err(SnapshotError::TurnOrderMismatch);
        }

        match self.battle_state {
            BattleState::Ongoing => {
                let active = self.active_unit.ok_or(SnapshotError::MissingActiveUnit)?;
                let unit = self
                    .unit(active)
                    .ok_or(SnapshotError::UnknownActiveUnit(active))?;
                if let Some(stray) = self
                    .units
                    .iter()
                    .find(|u| u.status == UnitStatus::Active && u.id != active)
                {
                    return Err(SnapshotError::StrayActiveUnit(stray.id));
                }
                if unit.is_alive() && self.turn_order.first() != Some(&active) {
                    return Err(SnapshotError::TurnOrderHead(active));
                }
            }
            BattleState::Win | BattleState::Lose | BattleState::Draw => {
                if let Some(unit) = self.units.iter().find(|u| u.status == UnitStatus::Active) {
                    return Err(SnapshotError::ActiveAfterEnd(unit.id));
                }
            }
            BattleState::Error => {}
        }

        Ok(())
    }

    /// SHA-256 over the bincode encoding of the snapshot.
    ///
    /// Lets an orchestrator detect that two persisted snapshots diverged.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        if let Ok(bytes) = bincode::serialize(self) {
            hasher.update(&bytes);
        }
        hasher.finalize().into()
    }
}

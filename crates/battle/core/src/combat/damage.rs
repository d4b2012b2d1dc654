//! Shield-then-hp damage accounting.

use crate::state::Stats;

/// What a single hit did to its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageReport {
    pub requested: u32,
    pub absorbed: u32,
    pub hp_lost: u32,
    /// The hit took the target to 0 hp.
    pub lethal: bool,
}

impl DamageReport {
    pub fn total(&self) -> u32 {
        self.absorbed + self.hp_lost
    }
}

/// `round(atk * multiplier)`, never negative.
pub fn scaled(atk: u32, multiplier: f32) -> u32 {
    let value = (f64::from(atk) * f64::from(multiplier)).round();
    if value <= 0.0 {
        0
    } else if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value as u32
    }
}

/// Applies `amount` to the shield first, then to hp, clamping hp at 0.
///
/// `absorbed + hp_lost == min(amount, shield_before + hp_before)`.
pub fn apply_damage(stats: &mut Stats, amount: u32) -> DamageReport {
    let absorbed = amount.min(stats.shield_hp);
    stats.shield_hp -= absorbed;

    let remainder = amount - absorbed;
    let hp_lost = remainder.min(stats.hp);
    let was_alive = stats.hp > 0;
    stats.hp -= hp_lost;

    DamageReport {
        requested: amount,
        absorbed,
        hp_lost,
        lethal: was_alive && stats.hp == 0,
    }
}

/// Hp loss that bypasses shields (damage over time).
pub fn apply_direct_damage(stats: &mut Stats, amount: u32) -> DamageReport {
    let hp_lost = amount.min(stats.hp);
    let was_alive = stats.hp > 0;
    stats.hp -= hp_lost;

    DamageReport {
        requested: amount,
        absorbed: 0,
        hp_lost,
        lethal: was_alive && stats.hp == 0,
    }
}

//! Deterministic randomness for status rolls, resource ticks, target picks
//! and turn-order shuffles.
//!
//! The engine keeps no state between calls, so every roll is derived from the
//! snapshot's `rng.seed` and `rng.nonce` plus a per-roll context value. The
//! same snapshot and inputs always produce the same output snapshot.

use crate::state::{RngState, UnitId};

/// Source of deterministic random numbers.
///
/// Implementations must return the same value for the same seed.
pub trait RngOracle: Send + Sync {
    fn next_u32(&self, seed: u64) -> u32;

    /// Value in `[min, max]` inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = u64::from(max - min) + 1;
        min + (u64::from(self.next_u32(seed)) % span) as u32
    }

    /// Bernoulli trial that succeeds with probability `chance`.
    ///
    /// `chance >= 1.0` always succeeds and `chance <= 0.0` never does,
    /// without consuming the seed.
    fn chance(&self, seed: u64, chance: f32) -> bool {
        if chance >= 1.0 {
            return true;
        }
        if chance <= 0.0 || chance.is_nan() {
            return false;
        }
        let unit = f64::from(self.next_u32(seed)) / (f64::from(u32::MAX) + 1.0);
        unit < f64::from(chance)
    }
}

/// PCG-XSH-RR: 32-bit output from a single 64-bit LCG step.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Mixes the battle seed, call nonce, unit and roll context into one seed.
pub fn compute_seed(battle_seed: u64, nonce: u64, unit: UnitId, context: u32) -> u64 {
    let mut hash = battle_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(unit.0).wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(context).wrapping_mul(0x85ebca6b);

    // SplitMix-style avalanche
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}

/// Hands out independent seeds for the rolls of one engine call.
///
/// Each roll advances the context counter, so two rolls in the same call never
/// share a seed.
pub struct Roller<'a> {
    oracle: &'a dyn RngOracle,
    state: RngState,
    unit: UnitId,
    context: u32,
}

impl<'a> Roller<'a> {
    pub fn new(oracle: &'a dyn RngOracle, state: RngState, unit: UnitId) -> Self {
        Self {
            oracle,
            state,
            unit,
            context: 0,
        }
    }

    fn next_seed(&mut self) -> u64 {
        let seed = compute_seed(self.state.seed, self.state.nonce, self.unit, self.context);
        self.context = self.context.wrapping_add(1);
        seed
    }

    pub fn range(&mut self, min: u32, max: u32) -> u32 {
        let seed = self.next_seed();
        self.oracle.range(seed, min, max)
    }

    pub fn chance(&mut self, chance: f32) -> bool {
        let seed = self.next_seed();
        self.oracle.chance(seed, chance)
    }

    /// Uniform index into a collection of `len` items. `len` must be non-zero.
    pub fn pick(&mut self, len: usize) -> usize {
        let max = u32::try_from(len.saturating_sub(1)).unwrap_or(u32::MAX);
        self.range(0, max) as usize
    }

    /// Fisher–Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.pick(i + 1);
            items.swap(i, j);
        }
    }
}

//! Combat arithmetic shared by the action resolver, the effect processor and
//! the enemy procedure.

mod damage;

pub use damage::{DamageReport, apply_damage, apply_direct_damage, scaled};

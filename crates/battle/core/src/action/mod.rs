//! Action resolver.
//!
//! [`UseCommand`] validates that the active unit may use a command, charges
//! its cost, resolves targets and applies the command's effect list in
//! order. It never advances the turn; that is the scheduler's job.

mod context;
mod effects;
mod error;
mod pipeline;

pub use context::EffectContext;
pub use error::ActionError;
pub use pipeline::UseCommand;

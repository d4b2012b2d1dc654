//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod check;
mod clean;
mod new_battle;
mod read_snapshot;
mod simulate;
mod step;

pub use check::Check;
pub use clean::Clean;
pub use new_battle::NewBattle;
pub use read_snapshot::ReadSnapshot;
pub use simulate::Simulate;
pub use step::Step;

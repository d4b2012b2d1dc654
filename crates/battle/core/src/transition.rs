use crate::config::EngineConfig;
use crate::error::BattleError;
use crate::rng::RngOracle;
use crate::state::{BattleSnapshot, LastActionSummary};

/// Read-only rule environment handed to every transition.
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    pub config: &'a EngineConfig,
    pub rng: &'a dyn RngOracle,
}

impl<'a> BattleEnv<'a> {
    pub fn new(config: &'a EngineConfig, rng: &'a dyn RngOracle) -> Self {
        Self { config, rng }
    }
}

/// One engine operation over a snapshot.
///
/// The engine drives `pre_validate`, `apply` and `post_validate` in order on
/// a private copy of the input snapshot, and discards the copy when any hook
/// fails. Hooks other than `apply` must stay side-effect free.
pub trait BattleTransition {
    type Error: BattleError;
    type Output;

    /// Name used in logs.
    const NAME: &'static str;

    /// Validates pre-conditions using the snapshot **before** mutation.
    fn pre_validate(
        &self,
        _snapshot: &BattleSnapshot,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Mutates the snapshot. Assumes `pre_validate` succeeded.
    fn apply(
        &self,
        snapshot: &mut BattleSnapshot,
        env: &BattleEnv<'_>,
    ) -> Result<Self::Output, Self::Error>;

    /// Validates post-conditions using the snapshot **after** mutation.
    fn post_validate(
        &self,
        _snapshot: &BattleSnapshot,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Summary recorded when the transition is refused by a rule, before the
    /// outcome tag is attached.
    fn refused_summary(&self, _snapshot: &BattleSnapshot) -> Option<LastActionSummary> {
        None
    }
}

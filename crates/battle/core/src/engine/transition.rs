use crate::state::BattleSnapshot;
use crate::transition::{BattleEnv, BattleTransition};

use super::errors::{TransitionPhase, TransitionPhaseError};

/// Runs the three hooks of a transition in order, tagging failures with the
/// hook that produced them.
///
/// The snapshot may be partially mutated when `apply` or `post_validate`
/// fails; callers run this on a scratch copy.
pub(crate) fn drive_transition<T>(
    transition: &T,
    snapshot: &mut BattleSnapshot,
    env: &BattleEnv<'_>,
) -> Result<T::Output, TransitionPhaseError<T::Error>>
where
    T: BattleTransition,
{
    transition
        .pre_validate(snapshot, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let output = transition
        .apply(snapshot, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(snapshot, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(output)
}

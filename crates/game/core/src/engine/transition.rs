//! Three-phase transition driver.

use crate::action::ActionTransition;
use crate::event::GameEvent;
use crate::state::Grid;

use super::errors::{TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline and returns its output.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the grid and collect notifications
/// 3. `post_validate` - Verify postconditions after mutation
///
/// The grid is mutated in place; callers that need all-or-nothing semantics
/// drive the transition against a staged copy.
#[inline]
pub(super) fn drive_transition<T>(
    transition: &T,
    grid: &mut Grid,
    events: &mut Vec<GameEvent>,
) -> Result<T::Output, TransitionPhaseError<T::Error>>
where
    T: ActionTransition,
{
    transition
        .pre_validate(grid)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let output = transition
        .apply(grid, events)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(grid)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(output)
}

use crate::event::GameEvent;
use crate::state::Grid;

/// Defines how a concrete action mutates a level's grid.
///
/// Implementors can override the validation hooks to surface pre- and
/// post-conditions that must hold around the mutation. The hooks receive
/// read-only access to the grid and must stay side-effect free.
pub trait ActionTransition {
    type Error;
    type Output;

    /// Validates pre-conditions using the grid **before** mutation.
    fn pre_validate(&self, _grid: &Grid) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the action by mutating the grid directly, appending the
    /// notifications it produced. Implementations may assume that
    /// `pre_validate` has already run successfully.
    fn apply(&self, grid: &mut Grid, events: &mut Vec<GameEvent>)
    -> Result<Self::Output, Self::Error>;

    /// Validates post-conditions using the grid **after** mutation.
    fn post_validate(&self, _grid: &Grid) -> Result<(), Self::Error> {
        Ok(())
    }
}

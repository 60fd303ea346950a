use std::collections::BTreeSet;

use crate::action::{MoveAction, is_targetable, legal_targets};
use crate::state::{Grid, Position, TokenId};

/// Outcome of a selection input, for the game context to act on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionStep {
    /// A token became the active selection.
    Activated {
        token: TokenId,
        targets: BTreeSet<Position>,
    },
    /// The active token should move; the selection is already cleared.
    Commit(MoveAction),
    /// The previously active token was deselected.
    Cleared(TokenId),
    /// Nothing happened.
    Unchanged,
}

/// Tracks the single active token and turns taps into moves.
///
/// The controller never mutates the grid. A returned [`SelectionStep::Commit`]
/// is executed by the owner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionController {
    active: Option<TokenId>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<TokenId> {
        self.active
    }

    /// Targets of the active token, highlighted for the player.
    pub fn targets(&self, grid: &Grid) -> BTreeSet<Position> {
        self.active
            .map(|token| legal_targets(grid, token))
            .unwrap_or_default()
    }

    /// Input on a token.
    ///
    /// With nothing active, the token is activated. Otherwise the tap is
    /// treated as a tap on the token's cell.
    pub fn select_token(&mut self, grid: &Grid, token: TokenId) -> SelectionStep {
        let Some(cell) = grid.token(token).and_then(|t| t.cell()) else {
            return SelectionStep::Unchanged;
        };
        match self.active {
            None => self.activate(grid, token),
            Some(_) => self.select_cell(grid, cell),
        }
    }

    /// Input on a cell (or a position without one).
    pub fn select_cell(&mut self, grid: &Grid, position: Position) -> SelectionStep {
        let occupant = grid.cell(position).and_then(|cell| cell.token());

        let Some(active) = self.active else {
            return match occupant {
                Some(token) => self.activate(grid, token),
                None => SelectionStep::Unchanged,
            };
        };

        if grid.cell(position).is_none() {
            return self.clear_active(active);
        }
        if occupant == Some(active) {
            return self.clear_active(active);
        }
        if is_targetable(grid, active, position) {
            self.active = None;
            return SelectionStep::Commit(MoveAction::new(active, position));
        }
        match occupant {
            Some(token) => self.activate(grid, token),
            None => self.clear_active(active),
        }
    }

    /// Drops the selection. Returns the token that was active, if any.
    pub fn clear(&mut self) -> Option<TokenId> {
        self.active.take()
    }

    fn activate(&mut self, grid: &Grid, token: TokenId) -> SelectionStep {
        self.active = Some(token);
        SelectionStep::Activated {
            token,
            targets: legal_targets(grid, token),
        }
    }

    fn clear_active(&mut self, active: TokenId) -> SelectionStep {
        self.active = None;
        SelectionStep::Cleared(active)
    }
}

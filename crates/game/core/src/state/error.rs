//! Grid construction and containment errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{Position, TokenId};

/// Errors raised while building a grid or mutating its containment graph.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridError {
    /// The level table has no rows or no columns.
    #[error("level definition is empty")]
    Empty,

    /// The level table is not rectangular.
    #[error("row {row} has {found} entries, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("token {0} not found")]
    UnknownToken(TokenId),

    #[error("no cell at {0}")]
    NoCell(Position),

    #[error("cell {cell} already holds token {occupant}")]
    CellOccupied { cell: Position, occupant: TokenId },

    #[error("token {0} is already placed")]
    TokenAlreadyPlaced(TokenId),

    /// Token and cell disagree about containment.
    #[error("containment desync between token {token} and cell {cell}")]
    ContainmentDesync { token: TokenId, cell: Position },

    /// A cell's satisfied flag does not match its contents.
    #[error("stale satisfaction at {0}")]
    StaleSatisfaction(Position),
}

impl GameError for GridError {
    fn severity(&self) -> ErrorSeverity {
        use GridError::*;
        match self {
            Empty | RaggedRow { .. } | UnknownToken(_) | NoCell(_) => ErrorSeverity::Validation,
            CellOccupied { .. }
            | TokenAlreadyPlaced(_)
            | ContainmentDesync { .. }
            | StaleSatisfaction(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use GridError::*;
        match self {
            Empty => "GRID_EMPTY",
            RaggedRow { .. } => "GRID_RAGGED_ROW",
            UnknownToken(_) => "GRID_UNKNOWN_TOKEN",
            NoCell(_) => "GRID_NO_CELL",
            CellOccupied { .. } => "GRID_CELL_OCCUPIED",
            TokenAlreadyPlaced(_) => "GRID_TOKEN_ALREADY_PLACED",
            ContainmentDesync { .. } => "GRID_CONTAINMENT_DESYNC",
            StaleSatisfaction(_) => "GRID_STALE_SATISFACTION",
        }
    }
}

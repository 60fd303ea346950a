use super::{Position, TokenColor, TokenId};

/// A movable colored unit.
///
/// The containing cell is a back-reference by position. Only the grid binds
/// or releases tokens, which keeps `token.cell()` and `cell.token()` in sync.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    id: TokenId,
    color: TokenColor,
    cell: Option<Position>,
}

impl Token {
    pub(crate) fn new(id: TokenId, color: TokenColor) -> Self {
        Self {
            id,
            color,
            cell: None,
        }
    }

    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn color(&self) -> &TokenColor {
        &self.color
    }

    /// Position of the cell currently containing this token.
    pub fn cell(&self) -> Option<Position> {
        self.cell
    }

    pub(crate) fn set_cell(&mut self, cell: Option<Position>) {
        self.cell = cell;
    }
}

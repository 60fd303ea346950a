use std::collections::BTreeMap;

use crate::event::GameEvent;

use super::{Cell, GridError, LevelDefinition, Position, Token, TokenColor, TokenId};

/// Sparse set of cells for one level, plus the tokens they contain.
///
/// Positions inside the table that have no cell are holes: structural gaps
/// that can never hold a token. Tokens are stored densely and addressed by
/// [`TokenId`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    width: u32,
    height: u32,
    #[cfg_attr(feature = "serde", serde(with = "cells_as_seq"))]
    cells: BTreeMap<Position, Cell>,
    tokens: Vec<Token>,
}

/// Cells travel as a list; each cell already knows its position, and JSON
/// object keys cannot be structs.
#[cfg(feature = "serde")]
mod cells_as_seq {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};

    use super::{Cell, Position};

    pub(super) fn serialize<S>(cells: &BTreeMap<Position, Cell>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(cells.values())
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<Position, Cell>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let cells = Vec::<Cell>::deserialize(deserializer)?;
        Ok(cells.into_iter().map(|cell| (cell.position(), cell)).collect())
    }
}

impl Grid {
    /// Builds cells and tokens from a rectangular level table.
    pub fn from_definition(definition: &LevelDefinition) -> Result<Self, GridError> {
        let width = definition.width();
        if definition.height() == 0 || width == 0 {
            return Err(GridError::Empty);
        }

        let mut grid = Self {
            width: width as u32,
            height: definition.height() as u32,
            cells: BTreeMap::new(),
            tokens: Vec::new(),
        };
        let mut scratch = Vec::new();

        for (y, row) in definition.rows().iter().enumerate() {
            if row.len() != width {
                return Err(GridError::RaggedRow {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }

            for (x, entry) in row.iter().enumerate() {
                let Some(spec) = entry else { continue };
                let position = Position::new(x as i32, y as i32);
                grid.cells
                    .insert(position, Cell::new(position, spec.goal.clone()));

                if let Some(color) = &spec.token {
                    let id = TokenId(grid.tokens.len() as u32);
                    grid.tokens.push(Token::new(id, color.clone()));
                    grid.bind(id, position, &mut scratch)?;
                }
            }
        }

        Ok(grid)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    /// True for positions inside the table that have no cell.
    pub fn is_hole(&self, position: Position) -> bool {
        self.contains(position) && !self.cells.contains_key(&position)
    }

    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.cells.get(&position)
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        // BTreeMap orders by (x, y); callers expect reading order.
        let mut cells: Vec<&Cell> = self.cells.values().collect();
        cells.sort_by_key(|cell| (cell.position().y, cell.position().x));
        cells.into_iter()
    }

    pub fn goal_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values().filter(|cell| cell.is_goal())
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(id.index())
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn token_at(&self, position: Position) -> Option<&Token> {
        self.cell(position)
            .and_then(Cell::token)
            .and_then(|id| self.token(id))
    }

    pub fn color_of(&self, id: TokenId) -> Option<&TokenColor> {
        self.token(id).map(Token::color)
    }

    /// Removes a token from its cell and reports the release.
    ///
    /// Returns the vacated position, or `None` if the token was not placed.
    pub(crate) fn release(
        &mut self,
        id: TokenId,
        events: &mut Vec<GameEvent>,
    ) -> Result<Option<Position>, GridError> {
        let Some(origin) = self.detach(id)? else {
            return Ok(None);
        };
        events.push(GameEvent::TokenReleased {
            token: id,
            cell: origin,
        });
        self.refresh(origin, events);
        Ok(Some(origin))
    }

    /// Clears containment on both sides without notifying or recomputing.
    ///
    /// Only for use inside a larger protocol that rebinds the cell before
    /// control returns to a caller.
    pub(crate) fn detach(&mut self, id: TokenId) -> Result<Option<Position>, GridError> {
        let token = self
            .tokens
            .get_mut(id.index())
            .ok_or(GridError::UnknownToken(id))?;
        let Some(origin) = token.cell() else {
            return Ok(None);
        };
        token.set_cell(None);

        let cell = self
            .cells
            .get_mut(&origin)
            .ok_or(GridError::ContainmentDesync {
                token: id,
                cell: origin,
            })?;
        if cell.token() != Some(id) {
            return Err(GridError::ContainmentDesync {
                token: id,
                cell: origin,
            });
        }
        cell.set_token(None);
        Ok(Some(origin))
    }

    /// Places an unplaced token into an empty cell and recomputes satisfaction.
    pub(crate) fn bind(
        &mut self,
        id: TokenId,
        position: Position,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), GridError> {
        let token = self.tokens.get(id.index()).ok_or(GridError::UnknownToken(id))?;
        if token.cell().is_some() {
            return Err(GridError::TokenAlreadyPlaced(id));
        }

        let cell = self
            .cells
            .get_mut(&position)
            .ok_or(GridError::NoCell(position))?;
        if let Some(occupant) = cell.token() {
            return Err(GridError::CellOccupied {
                cell: position,
                occupant,
            });
        }
        cell.set_token(Some(id));
        self.tokens[id.index()].set_cell(Some(position));

        events.push(GameEvent::TokenBound {
            token: id,
            cell: position,
        });
        self.refresh(position, events);
        Ok(())
    }

    fn refresh(&mut self, position: Position, events: &mut Vec<GameEvent>) {
        let Some(cell) = self.cells.get_mut(&position) else {
            return;
        };
        let contained = cell
            .token()
            .and_then(|id| self.tokens.get(id.index()))
            .map(Token::color);
        if cell.refresh_satisfaction(contained) && cell.is_goal() {
            events.push(GameEvent::SatisfactionChanged {
                cell: position,
                satisfied: cell.is_satisfied(),
            });
        }
    }

    /// Verifies the bidirectional containment invariant and satisfaction flags.
    pub fn check_consistency(&self) -> Result<(), GridError> {
        for token in &self.tokens {
            if let Some(position) = token.cell() {
                let holds = self
                    .cells
                    .get(&position)
                    .is_some_and(|cell| cell.token() == Some(token.id()));
                if !holds {
                    return Err(GridError::ContainmentDesync {
                        token: token.id(),
                        cell: position,
                    });
                }
            }
        }

        for cell in self.cells.values() {
            let contained = match cell.token() {
                Some(id) => {
                    let token = self.token(id).ok_or(GridError::UnknownToken(id))?;
                    if token.cell() != Some(cell.position()) {
                        return Err(GridError::ContainmentDesync {
                            token: id,
                            cell: cell.position(),
                        });
                    }
                    Some(token.color())
                }
                None => None,
            };
            let expected = matches!((cell.goal(), contained), (Some(goal), Some(color)) if goal == color);
            if expected != cell.is_satisfied() {
                return Err(GridError::StaleSatisfaction(cell.position()));
            }
        }

        Ok(())
    }
}

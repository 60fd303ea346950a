//! Parsed level definitions handed to the core by an external loader.

use super::{Position, TokenColor};

/// One non-hole entry of a level table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CellSpec {
    /// Color of the token initially placed here.
    pub token: Option<TokenColor>,
    /// Color this cell requires to be satisfied.
    pub goal: Option<TokenColor>,
}

impl CellSpec {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, color: TokenColor) -> Self {
        self.token = Some(color);
        self
    }

    pub fn with_goal(mut self, color: TokenColor) -> Self {
        self.goal = Some(color);
        self
    }
}

/// Rectangular table of rows; `None` entries are holes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LevelDefinition {
    rows: Vec<Vec<Option<CellSpec>>>,
}

impl LevelDefinition {
    pub fn new(rows: Vec<Vec<Option<CellSpec>>>) -> Self {
        Self { rows }
    }

    /// A `width` x `height` table of empty, non-goal cells.
    pub fn filled(width: usize, height: usize) -> Self {
        Self {
            rows: vec![vec![Some(CellSpec::empty()); width]; height],
        }
    }

    /// Replaces the entry at `position`. Returns false when out of range.
    pub fn set(&mut self, position: Position, entry: Option<CellSpec>) -> bool {
        let (Ok(x), Ok(y)) = (usize::try_from(position.x), usize::try_from(position.y)) else {
            return false;
        };
        match self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            Some(slot) => {
                *slot = entry;
                true
            }
            None => false,
        }
    }

    /// Builder form of [`LevelDefinition::set`]; out-of-range entries are dropped.
    pub fn with_cell(mut self, position: Position, entry: Option<CellSpec>) -> Self {
        self.set(position, entry);
        self
    }

    pub fn with_hole(self, position: Position) -> Self {
        self.with_cell(position, None)
    }

    pub fn rows(&self) -> &[Vec<Option<CellSpec>>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

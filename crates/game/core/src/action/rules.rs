//! Movement legality, evaluated in a fixed priority order.
//!
//! 1. An occupied target is only reachable by the swap-capable color.
//! 2. Immovable colors never move.
//! 3. Bounded colors step onto an empty cell within Chebyshev distance 1.
//! 4. Swap colors target any cell occupied by a different token.
//!
//! Holes and positions outside the table are never legal targets.

use std::collections::BTreeSet;

use crate::state::{Grid, MovementClass, Position, TokenId};

/// Returns true if `token` may move onto the cell at `target`.
pub fn can_move_onto(grid: &Grid, token: TokenId, target: Position) -> bool {
    let Some(moving) = grid.token(token) else {
        return false;
    };
    let Some(cell) = grid.cell(target) else {
        return false;
    };
    let class = moving.color().movement_class();

    if cell.is_occupied() && class != MovementClass::Swap {
        return false;
    }

    match class {
        MovementClass::Immovable => false,
        MovementClass::Bounded => moving
            .cell()
            .is_some_and(|origin| origin != target && origin.chebyshev_distance(target) <= 1),
        MovementClass::Swap => {
            moving.cell().is_some() && cell.token().is_some_and(|occupant| occupant != token)
        }
    }
}

/// Every cell `token` could legally move onto right now.
pub fn legal_targets(grid: &Grid, token: TokenId) -> BTreeSet<Position> {
    grid.cells()
        .map(|cell| cell.position())
        .filter(|&position| can_move_onto(grid, token, position))
        .collect()
}

/// Whether a cell should be highlighted while `token` hovers over it.
///
/// A token never targets the cell it already sits in.
pub fn is_targetable(grid: &Grid, token: TokenId, target: Position) -> bool {
    grid.token(token)
        .is_some_and(|moving| moving.cell() != Some(target))
        && can_move_onto(grid, token, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CellSpec, LevelDefinition, TokenColor};

    fn token(color: TokenColor) -> Option<CellSpec> {
        Some(CellSpec::empty().with_token(color))
    }

    fn grid(definition: LevelDefinition) -> Grid {
        Grid::from_definition(&definition).unwrap()
    }

    #[test]
    fn yellow_reaches_empty_neighbours_only() {
        let grid = grid(
            LevelDefinition::filled(4, 4)
                .with_cell(Position::new(1, 1), token(TokenColor::Yellow))
                .with_cell(Position::new(2, 2), token(TokenColor::Cyan))
                .with_hole(Position::new(0, 0)),
        );
        let yellow = grid.token_at(Position::new(1, 1)).unwrap().id();

        let expected: BTreeSet<Position> = [(1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2)]
            .into_iter()
            .map(|(x, y)| Position::new(x, y))
            .collect();
        assert_eq!(legal_targets(&grid, yellow), expected);
        assert!(!can_move_onto(&grid, yellow, Position::new(1, 1)));
        assert!(!can_move_onto(&grid, yellow, Position::new(3, 3)));
    }

    #[test]
    fn magenta_reaches_every_other_occupied_cell() {
        let grid = grid(
            LevelDefinition::filled(3, 3)
                .with_cell(Position::new(0, 0), token(TokenColor::Magenta))
                .with_cell(Position::new(2, 2), token(TokenColor::Cyan))
                .with_cell(Position::new(2, 0), token(TokenColor::inert("stone"))),
        );
        let magenta = grid.token_at(Position::ORIGIN).unwrap().id();

        let expected: BTreeSet<Position> = [Position::new(2, 2), Position::new(2, 0)]
            .into_iter()
            .collect();
        assert_eq!(legal_targets(&grid, magenta), expected);
        assert!(!can_move_onto(&grid, magenta, Position::new(1, 0)));
    }

    #[test]
    fn immovable_colors_have_no_targets() {
        let grid = grid(
            LevelDefinition::filled(3, 3)
                .with_cell(Position::new(1, 1), token(TokenColor::Cyan))
                .with_cell(Position::new(0, 0), token(TokenColor::inert("red")))
                .with_cell(Position::new(2, 2), token(TokenColor::Yellow)),
        );
        for position in [Position::new(1, 1), Position::ORIGIN] {
            let id = grid.token_at(position).unwrap().id();
            assert!(legal_targets(&grid, id).is_empty());
        }
    }

    #[test]
    fn unknown_token_and_holes_are_never_legal() {
        let grid = grid(
            LevelDefinition::filled(2, 1)
                .with_cell(Position::ORIGIN, token(TokenColor::Yellow))
                .with_hole(Position::new(1, 0)),
        );
        assert!(!can_move_onto(&grid, TokenId(9), Position::ORIGIN));
        assert!(!can_move_onto(&grid, TokenId(0), Position::new(1, 0)));
    }

    #[test]
    fn own_cell_is_not_targetable() {
        let grid = grid(
            LevelDefinition::filled(2, 1)
                .with_cell(Position::ORIGIN, token(TokenColor::Magenta))
                .with_cell(Position::new(1, 0), token(TokenColor::Cyan)),
        );
        assert!(!is_targetable(&grid, TokenId(0), Position::ORIGIN));
        assert!(is_targetable(&grid, TokenId(0), Position::new(1, 0)));
    }
}

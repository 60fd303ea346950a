use crate::state::Grid;

/// True iff every goal cell is satisfied. A grid without goals is won.
pub fn is_level_won(grid: &Grid) -> bool {
    grid.goal_cells().all(|cell| cell.is_satisfied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CellSpec, LevelDefinition, Position, TokenColor};

    #[test]
    fn grid_without_goals_is_won() {
        let grid = Grid::from_definition(&LevelDefinition::filled(2, 2)).unwrap();
        assert!(is_level_won(&grid));
    }

    #[test]
    fn every_goal_must_hold_its_color() {
        let goal = |color| Some(CellSpec::empty().with_goal(color));
        let definition = LevelDefinition::filled(2, 1)
            .with_cell(
                Position::new(0, 0),
                goal(TokenColor::Yellow).map(|spec| spec.with_token(TokenColor::Yellow)),
            )
            .with_cell(
                Position::new(1, 0),
                goal(TokenColor::Cyan).map(|spec| spec.with_token(TokenColor::Magenta)),
            );
        let grid = Grid::from_definition(&definition).unwrap();
        assert!(!is_level_won(&grid));
    }
}

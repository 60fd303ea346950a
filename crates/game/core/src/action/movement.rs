use crate::action::{ActionTransition, can_move_onto};
use crate::error::{ErrorSeverity, GameError};
use crate::event::GameEvent;
use crate::state::{Grid, GridError, Position, Token, TokenId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveError {
    #[error("token {0} not found")]
    UnknownToken(TokenId),

    #[error("no cell at {0}")]
    NoCell(Position),

    #[error("token {token} cannot move onto {target}")]
    Illegal { token: TokenId, target: Position },

    #[error("token {token} did not arrive at {target}")]
    NotArrived { token: TokenId, target: Position },

    #[error(transparent)]
    Grid(#[from] GridError),
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            MoveError::Illegal { .. } => ErrorSeverity::Recoverable,
            MoveError::UnknownToken(_) | MoveError::NoCell(_) => ErrorSeverity::Validation,
            MoveError::NotArrived { .. } => ErrorSeverity::Internal,
            MoveError::Grid(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            MoveError::UnknownToken(_) => "MOVE_UNKNOWN_TOKEN",
            MoveError::NoCell(_) => "MOVE_NO_CELL",
            MoveError::Illegal { .. } => "MOVE_ILLEGAL",
            MoveError::NotArrived { .. } => "MOVE_NOT_ARRIVED",
            MoveError::Grid(error) => error.error_code(),
        }
    }
}

/// What an executed move did to the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveKind {
    /// The token moved onto an empty cell.
    Transfer { from: Position },
    /// The token exchanged cells with `displaced`.
    Swap { displaced: TokenId, from: Position },
}

/// Player intent to move `token` onto the cell at `target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveAction {
    pub token: TokenId,
    pub target: Position,
}

impl MoveAction {
    pub fn new(token: TokenId, target: Position) -> Self {
        Self { token, target }
    }
}

impl ActionTransition for MoveAction {
    type Error = MoveError;
    type Output = MoveKind;

    fn pre_validate(&self, grid: &Grid) -> Result<(), Self::Error> {
        if grid.token(self.token).is_none() {
            return Err(MoveError::UnknownToken(self.token));
        }
        if grid.cell(self.target).is_none() {
            return Err(MoveError::NoCell(self.target));
        }
        if !can_move_onto(grid, self.token, self.target) {
            return Err(MoveError::Illegal {
                token: self.token,
                target: self.target,
            });
        }
        Ok(())
    }

    fn apply(&self, grid: &mut Grid, events: &mut Vec<GameEvent>) -> Result<MoveKind, MoveError> {
        let origin = grid
            .token(self.token)
            .ok_or(MoveError::UnknownToken(self.token))?
            .cell()
            .ok_or(MoveError::Illegal {
                token: self.token,
                target: self.target,
            })?;
        let occupant = grid
            .cell(self.target)
            .ok_or(MoveError::NoCell(self.target))?
            .token();

        match occupant {
            None => {
                grid.release(self.token, events)?;
                grid.bind(self.token, self.target, events)?;
                Ok(MoveKind::Transfer { from: origin })
            }
            Some(displaced) if displaced != self.token => {
                // Both cells are vacated silently, then rebound; the displaced
                // token lands first so the origin is never observed empty.
                grid.detach(self.token)?;
                grid.detach(displaced)?;
                grid.bind(displaced, origin, events)?;
                grid.bind(self.token, self.target, events)?;
                Ok(MoveKind::Swap {
                    displaced,
                    from: origin,
                })
            }
            Some(_) => Err(MoveError::Illegal {
                token: self.token,
                target: self.target,
            }),
        }
    }

    fn post_validate(&self, grid: &Grid) -> Result<(), Self::Error> {
        let arrived = grid.token(self.token).and_then(Token::cell) == Some(self.target);
        if !arrived {
            return Err(MoveError::NotArrived {
                token: self.token,
                target: self.target,
            });
        }
        grid.check_consistency()?;
        Ok(())
    }
}

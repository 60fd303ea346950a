//! Error types for the level session and game context.

use crate::action::MoveError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::GridError;

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Errors surfaced by commands on a level session or the game context.
///
/// Every variant leaves the game unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionError {
    #[error("no game is in progress")]
    NotInGame,

    #[error("no level is in play")]
    NoActiveSession,

    #[error("level {level_index} is already complete")]
    LevelComplete { level_index: usize },

    #[error("an advance to the next level is pending")]
    AdvancePending,

    #[error("move action failed: {0}")]
    Move(TransitionPhaseError<MoveError>),

    #[error("level could not be built: {0}")]
    Grid(#[from] GridError),
}

impl SessionError {
    /// Phase in which a move was refused, if this is a move failure.
    pub fn phase(&self) -> Option<TransitionPhase> {
        match self {
            SessionError::Move(error) => Some(error.phase),
            _ => None,
        }
    }
}

impl GameError for SessionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SessionError::NotInGame
            | SessionError::NoActiveSession
            | SessionError::LevelComplete { .. }
            | SessionError::AdvancePending => ErrorSeverity::Recoverable,
            SessionError::Move(error) => error.error.severity(),
            SessionError::Grid(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SessionError::NotInGame => "SESSION_NOT_IN_GAME",
            SessionError::NoActiveSession => "SESSION_NO_ACTIVE_LEVEL",
            SessionError::LevelComplete { .. } => "SESSION_LEVEL_COMPLETE",
            SessionError::AdvancePending => "SESSION_ADVANCE_PENDING",
            SessionError::Move(error) => error.error.error_code(),
            SessionError::Grid(error) => error.error_code(),
        }
    }
}

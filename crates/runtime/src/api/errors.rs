//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, the level source, score
//! repositories and the puzzle state machine so clients can bubble them up
//! with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use puzzle_core::{CheatRejection, GameError, SessionError};

pub use crate::repository::RepositoryError;
pub use crate::source::SourceError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires a level source to be configured before building")]
    MissingLevelSource,

    #[error("{operation} timed out after {timeout_ms} ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("cheat rejected: {0}")]
    Cheat(#[from] CheatRejection),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl RuntimeError {
    /// Stable code for rejections that come from the state machine.
    pub fn game_error_code(&self) -> Option<&'static str> {
        match self {
            RuntimeError::Session(error) => Some(error.error_code()),
            RuntimeError::Cheat(error) => Some(error.error_code()),
            _ => None,
        }
    }

    /// True when the command was refused by the rules and can simply be retried
    /// with different input.
    pub fn is_rejection(&self) -> bool {
        matches!(self, RuntimeError::Session(_) | RuntimeError::Cheat(_))
    }
}

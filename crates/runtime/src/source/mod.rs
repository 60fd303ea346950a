//! Level pack sources.
//!
//! The runtime treats level retrieval as an opaque async call. Static packs
//! back tests and embedded content; file packs are parsed by
//! `puzzle-content` on a blocking thread. The session worker wraps every
//! fetch in the configured I/O timeout and caches the first success.
mod file;
mod memory;

use async_trait::async_trait;
use puzzle_content::LevelPack;
use puzzle_core::GridError;
use thiserror::Error;

pub use file::FileLevelSource;
pub use memory::StaticLevelSource;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("level pack unavailable: {0}")]
    Unavailable(String),

    #[error("level pack contains no levels")]
    Empty,

    #[error("level {index} is invalid: {source}")]
    InvalidLevel {
        index: usize,
        #[source]
        source: GridError,
    },
}

/// Provides the ordered list of levels for a game.
#[async_trait]
pub trait LevelSource: Send + Sync {
    /// Fetch the full level pack.
    ///
    /// Called again after a failure; implementations must not cache errors.
    async fn fetch(&self) -> Result<LevelPack, SourceError>;

    /// Human-readable origin, for logs.
    fn describe(&self) -> String;
}

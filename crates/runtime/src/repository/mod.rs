//! Repository layer for dynamic runtime data
//!
//! Repositories handle data produced by play: final score records for each
//! finished game. Static content (level packs) comes from a
//! [`crate::source::LevelSource`], not a repository.

mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use file::FileScoreRepository;
pub use memory::InMemoryScoreRepo;
pub use traits::ScoreRepository;
pub use types::ScoreSubmission;

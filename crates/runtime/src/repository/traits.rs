//! Repository contract for finished-game scores.

use async_trait::async_trait;

use super::error::Result;
use super::types::ScoreSubmission;

/// Persistence for final game results.
///
/// Called once per finished game. The session worker bounds every call with
/// the runtime I/O timeout and reports failures without retrying.
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    /// Store the results of one finished game.
    async fn submit(&self, submission: &ScoreSubmission) -> Result<()>;

    /// Every stored game, oldest first.
    async fn load_all(&self) -> Result<Vec<ScoreSubmission>>;
}

//! In-memory ScoreRepository implementation for tests and local runs.

use std::sync::RwLock;

use async_trait::async_trait;

use super::error::{RepositoryError, Result};
use super::traits::ScoreRepository;
use super::types::ScoreSubmission;

/// In-memory implementation of ScoreRepository.
#[derive(Debug, Default)]
pub struct InMemoryScoreRepo {
    submissions: RwLock<Vec<ScoreSubmission>>,
}

impl InMemoryScoreRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with previously stored games.
    pub fn with_history(history: Vec<ScoreSubmission>) -> Self {
        Self {
            submissions: RwLock::new(history),
        }
    }
}

#[async_trait]
impl ScoreRepository for InMemoryScoreRepo {
    async fn submit(&self, submission: &ScoreSubmission) -> Result<()> {
        let mut submissions = self
            .submissions
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        submissions.push(submission.clone());
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<ScoreSubmission>> {
        let submissions = self
            .submissions
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(submissions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(moves: u32) -> ScoreSubmission {
        ScoreSubmission {
            times: vec![1.5],
            moves: vec![moves],
        }
    }

    #[tokio::test]
    async fn new_games_follow_prior_history() {
        let repo = InMemoryScoreRepo::with_history(vec![submission(4), submission(7)]);
        repo.submit(&submission(2)).await.unwrap();

        let moves: Vec<u32> = repo
            .load_all()
            .await
            .unwrap()
            .iter()
            .map(|stored| stored.moves[0])
            .collect();
        assert_eq!(moves, vec![4, 7, 2]);
    }

    #[tokio::test]
    async fn starts_empty() {
        assert!(InMemoryScoreRepo::new().load_all().await.unwrap().is_empty());
    }
}

//! File-based ScoreRepository implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use super::error::{RepositoryError, Result};
use super::traits::ScoreRepository;
use super::types::ScoreSubmission;

/// Append-only score log.
///
/// # File Format
///
/// One JSON object per line, `{"times":[...],"moves":[...]}`, in submission
/// order. A missing file reads as an empty history.
pub struct FileScoreRepository {
    path: PathBuf,
}

impl FileScoreRepository {
    /// Create a repository writing to `path`, creating parent directories.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ScoreRepository for FileScoreRepository {
    async fn submit(&self, submission: &ScoreSubmission) -> Result<()> {
        let mut line =
            serde_json::to_string(submission).map_err(|e| RepositoryError::Json(e.to_string()))?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(
            "Appended scores for {} levels to {}",
            submission.levels(),
            self.path.display()
        );
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<ScoreSubmission>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|e| RepositoryError::CorruptedData {
                    line: index + 1,
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}

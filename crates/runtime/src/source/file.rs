use std::path::{Path, PathBuf};

use async_trait::async_trait;
use puzzle_content::{LevelLoader, LevelPack};

use super::{LevelSource, SourceError};

/// Level source that reads a JSON or RON pack from disk on every fetch.
#[derive(Clone, Debug)]
pub struct FileLevelSource {
    path: PathBuf,
}

impl FileLevelSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LevelSource for FileLevelSource {
    async fn fetch(&self) -> Result<LevelPack, SourceError> {
        let path = self.path.clone();
        let pack = tokio::task::spawn_blocking(move || LevelLoader::load(&path))
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?
            .map_err(|e| SourceError::Unavailable(format!("{e:#}")))?;

        if pack.is_empty() {
            return Err(SourceError::Empty);
        }
        tracing::debug!("Loaded {} levels from {}", pack.len(), self.path.display());
        Ok(pack)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_pack_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("levels.json");
        std::fs::write(&path, r#"[[[["yellow", ""], ["", "yellow"]]]]"#).unwrap();

        let pack = FileLevelSource::new(&path).fetch().await.unwrap();
        assert_eq!(pack.len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileLevelSource::new(dir.path().join("levels.json"));

        assert!(matches!(
            source.fetch().await,
            Err(SourceError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn empty_pack_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("levels.json");
        std::fs::write(&path, "[]").unwrap();

        assert!(matches!(
            FileLevelSource::new(&path).fetch().await,
            Err(SourceError::Empty)
        ));
    }
}

//! Content factory for loading a puzzle data directory.

use std::path::{Path, PathBuf};

use puzzle_core::GameConfig;

use crate::loaders::{ConfigLoader, LevelLoader, LevelPack, LoadResult};

/// Content factory that loads all puzzle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml      (optional)
/// └── levels.json      (or levels.ron)
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`, or defaults if absent.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Path of the level pack: `levels.json` if present, otherwise `levels.ron`.
    pub fn levels_path(&self) -> PathBuf {
        let json = self.data_dir.join("levels.json");
        if json.exists() {
            json
        } else {
            self.data_dir.join("levels.ron")
        }
    }

    pub fn load_levels(&self) -> LoadResult<LevelPack> {
        LevelLoader::load(&self.levels_path())
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

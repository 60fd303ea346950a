//! Platform directories for logs and score files.
use std::path::PathBuf;

use directories::ProjectDirs;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "puzzle")
}

/// Log directory: `<cache>/logs`, or a temp-dir fallback.
pub fn log_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("puzzle").join("logs"))
}

/// Default score log: `<data>/scores.jsonl`.
pub fn scores_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("puzzle"))
        .join("scores.jsonl")
}

/// Bundled content shipped with the workspace.
pub fn bundled_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../game/content/data")
}

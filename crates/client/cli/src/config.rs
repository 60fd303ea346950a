//! CLI runtime configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration required to bootstrap the runtime and the prompt.
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub data_dir: Option<PathBuf>,
    pub levels_path: Option<PathBuf>,
    pub scores_path: Option<PathBuf>,
    pub session_id: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub io_timeout: Option<Duration>,
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PUZZLE_DATA_DIR` - Directory holding `levels.json` and `config.toml`
    /// - `PUZZLE_LEVELS` - Explicit level pack file, overrides the data directory
    /// - `PUZZLE_SCORES` - Score log file (default: platform data directory)
    /// - `PUZZLE_SESSION_ID` - Session identifier for log files (default: auto-generated)
    /// - `PUZZLE_LOG_DIR` - Log directory (default: platform cache directory)
    /// - `PUZZLE_IO_TIMEOUT_MS` - Bound on level fetch and score submission
    pub fn from_env() -> Self {
        Self {
            data_dir: read_path("PUZZLE_DATA_DIR"),
            levels_path: read_path("PUZZLE_LEVELS"),
            scores_path: read_path("PUZZLE_SCORES"),
            session_id: env::var("PUZZLE_SESSION_ID").ok(),
            log_dir: read_path("PUZZLE_LOG_DIR"),
            io_timeout: read_env::<u64>("PUZZLE_IO_TIMEOUT_MS")
                .map(|ms| Duration::from_millis(ms.max(1))),
        }
    }
}

fn read_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

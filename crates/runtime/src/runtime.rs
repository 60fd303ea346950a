//! High-level runtime orchestrator.
//!
//! The runtime owns the session worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive the game.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use puzzle_core::{Game, GameConfig};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::repository::{InMemoryScoreRepo, ScoreRepository};
use crate::source::LevelSource;
use crate::workers::{Command, SessionWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Upper bound on every level fetch and score submission.
    pub io_timeout: Duration,
}

impl RuntimeConfig {
    pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_millis(1000);
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            io_timeout: Self::DEFAULT_IO_TIMEOUT,
        }
    }
}

/// Main runtime that orchestrates a game.
///
/// Runtime owns the worker; [`RuntimeHandle`] provides a cloneable façade for
/// clients.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every outstanding handle clone is dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    levels: Option<Arc<dyn LevelSource>>,
    scores: Option<Arc<dyn ScoreRepository>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            levels: None,
            scores: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required level source
    pub fn level_source(mut self, source: impl LevelSource + 'static) -> Self {
        self.levels = Some(Arc::new(source));
        self
    }

    /// Set the score repository (defaults to an in-memory store)
    pub fn score_repository(mut self, repository: Arc<dyn ScoreRepository>) -> Self {
        self.scores = Some(repository);
        self
    }

    /// Build the runtime and spawn its worker
    ///
    /// The game starts idle; call [`RuntimeHandle::start_game`] to begin.
    pub async fn build(self) -> Result<Runtime> {
        let levels = self.levels.ok_or(RuntimeError::MissingLevelSource)?;
        let scores = self
            .scores
            .unwrap_or_else(|| Arc::new(InMemoryScoreRepo::new()) as Arc<dyn ScoreRepository>);

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let worker = SessionWorker::new(
            Game::new(self.config.game_config),
            levels,
            scores,
            self.config.io_timeout,
            command_rx,
            event_bus,
        );

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}

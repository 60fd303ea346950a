//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! playing the game or streaming events from specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use puzzle_core::{Position, TokenId};

use super::errors::{Result, RuntimeError};
use super::snapshot::GameSnapshot;
use crate::events::{Event, EventBus, Topic};
use crate::repository::ScoreSubmission;
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Start a new game at level 0, cancelling any pending advance.
    ///
    /// Fails only when the level pack cannot be fetched; the game is then
    /// in play without a level and `start_game` may be retried.
    pub async fn start_game(&self) -> Result<()> {
        self.request(|reply| Command::StartGame { reply }).await?
    }

    /// Rebuild the current level from its definition.
    pub async fn restart_level(&self) -> Result<()> {
        self.request(|reply| Command::RestartLevel { reply }).await?
    }

    /// Move `token` onto the cell at `target` (drag-and-drop).
    pub async fn attempt_move(&self, token: TokenId, target: Position) -> Result<()> {
        self.request(|reply| Command::AttemptMove {
            token,
            target,
            reply,
        })
        .await?
    }

    /// Tap a token (tap-to-select).
    pub async fn select_token(&self, token: TokenId) -> Result<()> {
        self.request(|reply| Command::SelectToken { token, reply })
            .await?
    }

    /// Tap a cell (tap-to-select).
    pub async fn select_cell(&self, position: Position) -> Result<()> {
        self.request(|reply| Command::SelectCell { position, reply })
            .await?
    }

    pub async fn clear_selection(&self) -> Result<()> {
        self.request(|reply| Command::ClearSelection { reply })
            .await?
    }

    pub async fn submit_cheat_code(&self, code: impl Into<String>) -> Result<()> {
        let code = code.into();
        self.request(|reply| Command::SubmitCheat { code, reply })
            .await?
    }

    /// Query the current game (read-only snapshot)
    pub async fn snapshot(&self) -> Result<GameSnapshot> {
        self.request(|reply| Command::QuerySnapshot { reply }).await
    }

    /// Every finished game recorded by the score repository.
    pub async fn score_history(&self) -> Result<Vec<ScoreSubmission>> {
        self.request(|reply| Command::LoadHistory { reply }).await?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Board` - token movement, selection and rejected moves
    /// - `Topic::Session` - level/game lifecycle and score submission
    /// - `Topic::Cheat` - cheat acceptance and rejection
    /// - `Topic::Clock` - elapsed-time readout
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut session_rx = handle.subscribe(Topic::Session);
    /// while let Ok(event) = session_rx.recv().await {
    ///     // Handle level won / advance events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }
}

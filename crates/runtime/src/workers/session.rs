//! Session worker that owns the authoritative [`puzzle_core::Game`].
//!
//! Receives commands from [`crate::RuntimeHandle`], applies them to the game,
//! and publishes the resulting events to the EventBus. It also owns the two
//! timers of the game: the one-shot grace delay before the next level and
//! the periodic elapsed-time readout.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior, Sleep};
use tracing::{debug, info, warn};

use puzzle_content::LevelPack;
use puzzle_core::{Game, GameError, GameEvent, Position, SessionError, TokenId};

use super::clock::Clock;
use crate::api::{GameSnapshot, Result, RuntimeError};
use crate::events::{EventBus, RuntimeEvent};
use crate::repository::{ScoreRepository, ScoreSubmission};
use crate::source::LevelSource;

/// Commands that can be sent to the session worker
pub enum Command {
    /// Reset to level 0 and load it.
    StartGame { reply: oneshot::Sender<Result<()>> },
    /// Rebuild the current level. Ignored while an advance is pending.
    RestartLevel { reply: oneshot::Sender<Result<()>> },
    AttemptMove {
        token: TokenId,
        target: Position,
        reply: oneshot::Sender<Result<()>>,
    },
    SelectToken {
        token: TokenId,
        reply: oneshot::Sender<Result<()>>,
    },
    SelectCell {
        position: Position,
        reply: oneshot::Sender<Result<()>>,
    },
    ClearSelection { reply: oneshot::Sender<Result<()>> },
    SubmitCheat {
        code: String,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Read-only copy of the game.
    QuerySnapshot { reply: oneshot::Sender<GameSnapshot> },
    /// Every finished game stored by the score repository.
    LoadHistory {
        reply: oneshot::Sender<Result<Vec<ScoreSubmission>>>,
    },
}

/// Background task that processes gameplay commands.
pub struct SessionWorker {
    game: Game,
    levels: Arc<dyn LevelSource>,
    scores: Arc<dyn ScoreRepository>,
    cache: Option<Arc<LevelPack>>,
    clock: Clock,
    io_timeout: Duration,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    advance: Option<Pin<Box<Sleep>>>,
}

impl SessionWorker {
    pub fn new(
        game: Game,
        levels: Arc<dyn LevelSource>,
        scores: Arc<dyn ScoreRepository>,
        io_timeout: Duration,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            target: "runtime::worker",
            source = %levels.describe(),
            io_timeout_ms = io_timeout.as_millis() as u64,
            "SessionWorker initialized"
        );

        Self {
            game,
            levels,
            scores,
            cache: None,
            clock: Clock::start(),
            io_timeout,
            command_rx,
            event_bus,
            advance: None,
        }
    }

    /// Main worker loop. Exits when every handle has been dropped.
    pub async fn run(mut self) {
        let mut ticker = clock_ticker(self.game.config().clock_tick_ms);

        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },
                () = wait_for(&mut self.advance) => {
                    self.on_advance_elapsed().await;
                }
                _ = ticker.tick() => {
                    self.publish_clock();
                }
            }
        }

        debug!(target: "runtime::worker", "SessionWorker stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::StartGame { reply } => {
                let result = self.start_game().await;
                if reply.send(result).is_err() {
                    debug!("StartGame reply channel closed (caller dropped)");
                }
            }
            Command::RestartLevel { reply } => {
                let result = self.restart_level().await;
                if reply.send(result).is_err() {
                    debug!("RestartLevel reply channel closed (caller dropped)");
                }
            }
            Command::AttemptMove {
                token,
                target,
                reply,
            } => {
                let result = self.attempt_move(token, target);
                if reply.send(result).is_err() {
                    debug!("AttemptMove reply channel closed (caller dropped)");
                }
            }
            Command::SelectToken { token, reply } => {
                let now = self.clock.now();
                let result = self.game.select_token(token, now);
                let result = self.settle_selection(result, None);
                if reply.send(result).is_err() {
                    debug!("SelectToken reply channel closed (caller dropped)");
                }
            }
            Command::SelectCell { position, reply } => {
                let active = self.game.active_token().map(|token| (token, position));
                let now = self.clock.now();
                let result = self.game.select_cell(position, now);
                let result = self.settle_selection(result, active);
                if reply.send(result).is_err() {
                    debug!("SelectCell reply channel closed (caller dropped)");
                }
            }
            Command::ClearSelection { reply } => {
                let events = self.game.clear_selection();
                self.dispatch(events);
                if reply.send(Ok(())).is_err() {
                    debug!("ClearSelection reply channel closed (caller dropped)");
                }
            }
            Command::SubmitCheat { code, reply } => {
                let result = self.submit_cheat(&code);
                if reply.send(result).is_err() {
                    debug!("SubmitCheat reply channel closed (caller dropped)");
                }
            }
            Command::QuerySnapshot { reply } => {
                let level_count = self.cache.as_ref().map(|pack| pack.len());
                let snapshot = GameSnapshot::capture(&self.game, level_count, self.clock.now());
                if reply.send(snapshot).is_err() {
                    debug!("QuerySnapshot reply channel closed (caller dropped)");
                }
            }
            Command::LoadHistory { reply } => {
                let result = bounded(self.io_timeout, "score history", self.scores.load_all()).await;
                if reply.send(result).is_err() {
                    debug!("LoadHistory reply channel closed (caller dropped)");
                }
            }
        }
    }

    async fn start_game(&mut self) -> Result<()> {
        self.advance = None;
        let events = self.game.start_game();
        self.dispatch(events);
        info!(target: "runtime::worker", "Game started");

        self.load_current_level().await
    }

    async fn restart_level(&mut self) -> Result<()> {
        if !self.game.is_in_game() {
            return Err(SessionError::NotInGame.into());
        }
        if self.game.is_advance_pending() {
            debug!(target: "runtime::worker", "Restart ignored while an advance is pending");
            return Ok(());
        }
        self.load_current_level().await
    }

    /// Builds the level at the current index, or finishes the game when the
    /// index is past the last level.
    async fn load_current_level(&mut self) -> Result<()> {
        let pack = match self.level_pack().await {
            Ok(pack) => pack,
            Err(error) => {
                warn!(
                    target: "runtime::worker",
                    error = %error,
                    "Level pack fetch failed"
                );
                self.event_bus.publish(RuntimeEvent::LevelLoadFailed {
                    error: error.to_string(),
                });
                return Err(error);
            }
        };

        let level_index = self.game.level_index();
        let Some(definition) = pack.get(level_index) else {
            return self.finish_game().await;
        };

        let events = match self.game.start_level(definition, self.clock.now()) {
            Ok(events) => events,
            Err(error) => {
                warn!(
                    target: "runtime::worker",
                    level_index,
                    error = %error,
                    "Level could not be started"
                );
                self.event_bus.publish(RuntimeEvent::LevelLoadFailed {
                    error: error.to_string(),
                });
                return Err(error.into());
            }
        };
        debug!(
            target: "runtime::worker",
            level_index,
            levels = pack.len(),
            "Level started"
        );
        self.dispatch(events);
        Ok(())
    }

    /// Returns the cached pack, fetching it on first use.
    ///
    /// A failed fetch leaves the cache empty so a later command retries.
    async fn level_pack(&mut self) -> Result<Arc<LevelPack>> {
        if let Some(pack) = &self.cache {
            return Ok(Arc::clone(pack));
        }

        let pack = Arc::new(bounded(self.io_timeout, "level fetch", self.levels.fetch()).await?);
        info!(
            target: "runtime::worker",
            levels = pack.len(),
            "Level pack fetched"
        );
        self.cache = Some(Arc::clone(&pack));
        Ok(pack)
    }

    async fn finish_game(&mut self) -> Result<()> {
        let events = self.game.finish();
        self.dispatch(events);

        let submission = ScoreSubmission::from(&self.game.results());
        info!(
            target: "runtime::worker",
            levels = submission.levels(),
            "Game finished"
        );

        match bounded(self.io_timeout, "score submit", self.scores.submit(&submission)).await {
            Ok(()) => self.event_bus.publish(RuntimeEvent::ScoresSubmitted {
                levels: submission.levels(),
            }),
            Err(error) => {
                warn!(
                    target: "runtime::worker",
                    error = %error,
                    "Score submission failed"
                );
                self.event_bus.publish(RuntimeEvent::ScoreSubmitFailed {
                    error: error.to_string(),
                });
            }
        }
        Ok(())
    }

    fn attempt_move(&mut self, token: TokenId, target: Position) -> Result<()> {
        let now = self.clock.now();
        match self.game.attempt_move(token, target, now) {
            Ok(events) => {
                self.dispatch(events);
                Ok(())
            }
            Err(error) => {
                self.reject_move(token, target, &error);
                Err(error.into())
            }
        }
    }

    fn settle_selection(
        &mut self,
        result: std::result::Result<Vec<GameEvent>, SessionError>,
        attempted: Option<(TokenId, Position)>,
    ) -> Result<()> {
        match result {
            Ok(events) => {
                self.dispatch(events);
                Ok(())
            }
            Err(error) => {
                match attempted {
                    Some((token, target)) => self.reject_move(token, target, &error),
                    None => debug!(
                        target: "runtime::worker",
                        error = %error,
                        "Selection rejected"
                    ),
                }
                Err(error.into())
            }
        }
    }

    fn reject_move(&self, token: TokenId, target: Position, error: &SessionError) {
        debug!(
            target: "runtime::worker",
            %token,
            %target,
            code = error.error_code(),
            "Move rejected"
        );
        self.event_bus.publish(RuntimeEvent::MoveRejected {
            token,
            target,
            phase: error.phase(),
            code: error.error_code().to_string(),
            error: error.to_string(),
        });
    }

    fn submit_cheat(&mut self, code: &str) -> Result<()> {
        let now = self.clock.now();
        match self.game.submit_cheat_code(code, now) {
            Ok(events) => {
                info!(
                    target: "runtime::worker",
                    level_index = self.game.level_index(),
                    "Cheat code accepted"
                );
                self.dispatch(events);
                Ok(())
            }
            Err(reason) => {
                debug!(
                    target: "runtime::worker",
                    code = reason.error_code(),
                    "Cheat code rejected"
                );
                self.event_bus.publish(GameEvent::CheatRejected {
                    reason: reason.clone(),
                });
                Err(reason.into())
            }
        }
    }

    async fn on_advance_elapsed(&mut self) {
        self.advance = None;
        let events = self.game.fire_advance();
        if events.is_empty() {
            return;
        }
        self.dispatch(events);

        if let Err(error) = self.load_current_level().await {
            warn!(
                target: "runtime::worker",
                error = %error,
                "Next level could not be started"
            );
        }
    }

    fn publish_clock(&self) {
        if let Some(seconds) = self.game.clock_seconds(self.clock.now()) {
            self.event_bus.publish(RuntimeEvent::ClockTick {
                level_index: self.game.level_index(),
                seconds,
            });
        }
    }

    /// Publishes events and keeps the advance timer in step with them.
    fn dispatch(&mut self, events: Vec<GameEvent>) {
        for event in &events {
            match event {
                GameEvent::AdvancePending { delay_ms, .. } => self.schedule_advance(*delay_ms),
                GameEvent::AdvanceCancelled { .. } => self.advance = None,
                _ => {}
            }
        }
        self.event_bus.publish_all(events);
    }

    /// Arms the grace delay. At most one is ever outstanding.
    fn schedule_advance(&mut self, delay_ms: u64) {
        if self.advance.is_some() {
            return;
        }
        self.advance = Some(Box::pin(tokio::time::sleep(Duration::from_millis(delay_ms))));
    }
}

/// Resolves when the armed timer elapses; never resolves when none is armed.
async fn wait_for(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}

fn clock_ticker(period_ms: u64) -> Interval {
    let mut ticker = tokio::time::interval(Duration::from_millis(period_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// Runs an external call under the I/O timeout. Failures are not retried.
async fn bounded<T, E>(
    timeout: Duration,
    operation: &'static str,
    call: impl Future<Output = std::result::Result<T, E>>,
) -> Result<T>
where
    RuntimeError: From<E>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result.map_err(RuntimeError::from),
        Err(_) => Err(RuntimeError::Timeout {
            operation,
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

//! Event types published by the runtime.

use puzzle_core::{GameEvent, Position, TokenId, TransitionPhase};
use serde::{Deserialize, Serialize};

/// Notifications that originate in the runtime rather than the state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RuntimeEvent {
    /// Periodic elapsed-time readout for the level in play.
    ClockTick { level_index: usize, seconds: f64 },

    /// A move command was refused; the board is unchanged.
    MoveRejected {
        token: TokenId,
        target: Position,
        phase: Option<TransitionPhase>,
        code: String,
        error: String,
    },

    /// The level pack could not be fetched; the next command may retry.
    LevelLoadFailed { error: String },

    /// Final results were stored.
    ScoresSubmitted { levels: usize },

    /// Final results could not be stored. Not retried.
    ScoreSubmitFailed { error: String },
}

impl RuntimeEvent {
    pub(crate) fn is_clock(&self) -> bool {
        matches!(self, RuntimeEvent::ClockTick { .. })
    }

    pub(crate) fn is_board(&self) -> bool {
        matches!(self, RuntimeEvent::MoveRejected { .. })
    }
}

/// Topic a state-machine event is routed to.
pub(crate) fn game_event_topic(event: &GameEvent) -> super::Topic {
    use super::Topic;

    match event {
        GameEvent::TokenReleased { .. }
        | GameEvent::TokenBound { .. }
        | GameEvent::SatisfactionChanged { .. }
        | GameEvent::MoveCounted { .. }
        | GameEvent::TokenSelected { .. }
        | GameEvent::SelectionCleared => Topic::Board,
        GameEvent::CheatAccepted { .. } | GameEvent::CheatRejected { .. } => Topic::Cheat,
        GameEvent::GameStarted
        | GameEvent::LevelStarted { .. }
        | GameEvent::LevelWon { .. }
        | GameEvent::AdvancePending { .. }
        | GameEvent::AdvanceFired { .. }
        | GameEvent::AdvanceCancelled { .. }
        | GameEvent::GameFinished { .. } => Topic::Session,
    }
}

//! Outward notifications for presentation and persistence layers.
//!
//! Every mutating operation on [`crate::Game`] returns the events it produced,
//! in causal order: release before rebind, rebind before satisfaction
//! recompute, satisfaction before the win check.

use std::collections::BTreeSet;

use crate::engine::{CheatRejection, GameResults, ScoreRecord};
use crate::state::{Position, TokenId};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    /// A new game began at level 0.
    GameStarted,

    /// A level's grid finished building and its clock started.
    LevelStarted { level_index: usize },

    /// A token left its cell. Suppressed for both halves of a swap.
    TokenReleased { token: TokenId, cell: Position },

    /// A token was placed into a cell.
    TokenBound { token: TokenId, cell: Position },

    /// A goal cell became satisfied or stopped being satisfied.
    SatisfactionChanged { cell: Position, satisfied: bool },

    /// A player move was counted. Swaps count once.
    MoveCounted { moves: u32 },

    /// A token became the active tap-to-move selection.
    TokenSelected {
        token: TokenId,
        targets: BTreeSet<Position>,
    },

    /// The active selection was dropped.
    SelectionCleared,

    /// Every goal cell is satisfied (or a cheat forced the win).
    LevelWon { score: ScoreRecord },

    /// The grace delay before the next level started.
    AdvancePending { level_index: usize, delay_ms: u64 },

    /// The grace delay elapsed; `level_index` is the level to load next.
    AdvanceFired { level_index: usize },

    /// A pending advance was dropped before it fired.
    AdvanceCancelled { level_index: usize },

    CheatAccepted { code: String },

    CheatRejected { reason: CheatRejection },

    /// The last level was completed; scores are ready for persistence.
    GameFinished { results: GameResults },
}

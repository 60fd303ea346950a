//! Read-only view of the game for presentation layers.
use std::collections::BTreeSet;

use puzzle_core::{Game, GamePhase, GameResults, Grid, Position, Timestamp, TokenId};
use serde::{Deserialize, Serialize};

/// Point-in-time copy of everything a client needs to draw the game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub level_index: usize,
    /// Known once the level pack has been fetched.
    pub level_count: Option<usize>,
    pub grid: Option<Grid>,
    pub move_count: u32,
    /// Elapsed seconds for a level in play; `None` between levels.
    pub clock_seconds: Option<f64>,
    pub active_token: Option<TokenId>,
    pub highlighted: BTreeSet<Position>,
    pub advance_pending: bool,
    pub level_complete: bool,
    pub results: GameResults,
}

impl GameSnapshot {
    pub(crate) fn capture(game: &Game, level_count: Option<usize>, now: Timestamp) -> Self {
        let session = game.session();
        Self {
            phase: game.phase(),
            level_index: game.level_index(),
            level_count,
            grid: game.grid().cloned(),
            move_count: session.map_or(0, |session| session.move_count()),
            clock_seconds: game.clock_seconds(now),
            active_token: game.active_token(),
            highlighted: game.highlighted_targets(),
            advance_pending: game.is_advance_pending(),
            level_complete: session.is_some_and(|session| session.is_complete()),
            results: game.results(),
        }
    }
}

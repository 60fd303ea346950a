//! Deterministic puzzle rules and data types shared across clients.
//!
//! `puzzle-core` defines the canonical rules (movement legality, the move/swap
//! protocol, win detection, level completion and the cheat override) and
//! exposes pure APIs that the runtime and offline tools reuse. All mutation of
//! a level flows through [`engine::Game`], which never blocks and never reads
//! the wall clock; callers hand it [`Timestamp`]s and receive [`GameEvent`]s
//! describing what changed.
pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod state;

pub use action::{
    ActionTransition, MoveAction, MoveError, MoveKind, can_move_onto, is_level_won,
    is_targetable, legal_targets,
};
pub use config::GameConfig;
pub use engine::{
    CheatCode, CheatRejection, Game, GamePhase, GameResults, LevelSession, ScoreRecord,
    SelectionController, SelectionStep, SessionError, SessionPhase, TransitionPhase,
    TransitionPhaseError,
};
pub use error::{ErrorSeverity, GameError};
pub use event::GameEvent;
pub use state::{
    Cell, CellSpec, Grid, GridError, LevelDefinition, MovementClass, Position, Timestamp, Token,
    TokenColor, TokenId,
};

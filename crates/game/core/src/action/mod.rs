//! Action domain: movement legality, the move/swap transition and win checks.
//!
//! # Module Structure
//!
//! - `rules`: pure legality queries (`can_move_onto`, `legal_targets`)
//! - `movement`: [`MoveAction`], the only transition that mutates a grid
//! - `transition`: the three-phase [`ActionTransition`] contract
//! - `win`: global goal satisfaction

pub mod movement;
pub mod rules;
pub mod transition;
pub mod win;

pub use movement::{MoveAction, MoveError, MoveKind};
pub use rules::{can_move_onto, is_targetable, legal_targets};
pub use transition::ActionTransition;
pub use win::is_level_won;

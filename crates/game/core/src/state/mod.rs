//! Authoritative level state representation.
//!
//! This module owns the data structures that describe tokens, cells, the
//! sparse grid and the level definitions grids are built from. Runtime layers
//! query this state but mutate it exclusively through the engine.
pub mod error;
pub mod grid;
pub mod level;
pub mod types;

pub use error::GridError;
pub use grid::Grid;
pub use level::{CellSpec, LevelDefinition};
pub use types::{Cell, MovementClass, Position, Timestamp, Token, TokenColor, TokenId};

//! Game orchestration: level sessions, selection, cheats and sequencing.
//!
//! # Module Structure
//!
//! - `game`: [`Game`], the whole-game context and command surface
//! - `session`: [`LevelSession`], one level's grid, move counter and clock
//! - `selection`: tap-to-move state layered over the move executor
//! - `cheat`: cheat-code parsing and rejection reasons
//! - `transition`: three-phase driver for [`crate::ActionTransition`]s
//! - `errors`: session and transition error types
mod cheat;
mod errors;
mod game;
mod selection;
mod session;
mod transition;

pub use cheat::{CheatCode, CheatRejection};
pub use errors::{SessionError, TransitionPhase, TransitionPhaseError};
pub use game::{Game, GamePhase, GameResults};
pub use selection::{SelectionController, SelectionStep};
pub use session::{LevelSession, ScoreRecord, SessionPhase};

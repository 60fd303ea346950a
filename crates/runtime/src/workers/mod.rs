//! Worker tasks that back the runtime orchestration.
//!
//! The session worker owns the game and its timers; everything else talks to
//! it through commands.

mod clock;
mod session;

pub use session::{Command, SessionWorker};

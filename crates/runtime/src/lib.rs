//! Runtime orchestration for the puzzle game.
//!
//! This crate wires together level sources, score repositories, and the
//! session worker into a cohesive runtime API. Consumers embed [`Runtime`] to
//! play levels, subscribe to events, and read snapshots through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`source`] and [`repository`] provide the level and score adapters
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod repository;
pub mod runtime;
pub mod source;

mod workers;

pub use api::{GameSnapshot, Result, RuntimeError, RuntimeHandle};
pub use events::{Event, EventBus, RuntimeEvent, Topic};
pub use repository::{
    FileScoreRepository, InMemoryScoreRepo, RepositoryError, ScoreRepository, ScoreSubmission,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use source::{FileLevelSource, LevelSource, SourceError, StaticLevelSource};

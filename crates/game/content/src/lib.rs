//! Data-driven content definitions and loaders.
//!
//! This crate turns level packs and configuration files into puzzle-core
//! types:
//! - Level packs (JSON in the published table shape, or RON)
//! - Game configuration (TOML)
//!
//! Content is consumed by the runtime's level source and never appears in
//! game state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LevelFormat, LevelLoader, LevelPack, LoadResult};

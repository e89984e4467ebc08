//! Data-driven content definitions and loaders.
//!
//! This crate turns RON/TOML data files into the `game-core` service container:
//! - Game configuration (TOML)
//! - Species, skills, items, passives, statuses, dungeons and event templates
//!   (RON maps keyed by id)
//!
//! Content can be read from a data directory or from the copy bundled into
//! this crate. Every load finishes with an integrity pass that reports all
//! dangling references and broken inheritance chains in one batch.
//!
//! All loaders use game-core types directly with serde for RON/TOML deserialization.

pub mod integrity;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use integrity::{IntegrityReport, IntegrityViolation};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, ContentSource, DefinitionLoader, LoadResult};

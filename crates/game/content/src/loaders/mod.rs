//! Content loaders for reading game data from files.
//!
//! Configuration is TOML; every definition table is a RON map keyed by id.

pub mod config;
pub mod definitions;
pub mod factory;

pub use config::ConfigLoader;
pub use definitions::DefinitionLoader;
pub use factory::{ContentFactory, ContentSource};

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}

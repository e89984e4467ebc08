//! Content factory for building the service container from data files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use game_core::{Definition, GameConfig, Registry, Service, Services};
use serde::de::DeserializeOwned;

use crate::integrity;
use crate::loaders::{ConfigLoader, DefinitionLoader, LoadResult};

/// Data compiled into the crate, keyed by file name.
const BUNDLED: &[(&str, &str)] = &[
    ("config.toml", include_str!("../../data/config.toml")),
    ("statuses.ron", include_str!("../../data/statuses.ron")),
    ("equipment.ron", include_str!("../../data/equipment.ron")),
    ("passives.ron", include_str!("../../data/passives.ron")),
    ("skills.ron", include_str!("../../data/skills.ron")),
    ("items.ron", include_str!("../../data/items.ron")),
    ("creatures.ron", include_str!("../../data/creatures.ron")),
    ("dungeons.ron", include_str!("../../data/dungeons.ron")),
    ("events.ron", include_str!("../../data/events.ron")),
];

/// Where content files come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentSource {
    /// Files under a data directory.
    Directory(PathBuf),
    /// The data set shipped inside this crate.
    Bundled,
}

/// Content factory that loads all game content and wires the services.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── statuses.ron
/// ├── equipment.ron
/// ├── passives.ron
/// ├── skills.ron
/// ├── items.ron
/// ├── creatures.ron
/// ├── dungeons.ron
/// └── events.ron
/// ```
#[derive(Clone, Debug)]
pub struct ContentFactory {
    source: ContentSource,
}

impl ContentFactory {
    /// Creates a content factory reading from a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: ContentSource::Directory(data_dir.into()),
        }
    }

    /// Creates a content factory over the bundled data set.
    pub fn bundled() -> Self {
        Self {
            source: ContentSource::Bundled,
        }
    }

    pub fn source(&self) -> &ContentSource {
        &self.source
    }

    /// Returns the data directory path, if reading from disk.
    pub fn data_dir(&self) -> Option<&Path> {
        match &self.source {
            ContentSource::Directory(dir) => Some(dir),
            ContentSource::Bundled => None,
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        match &self.source {
            ContentSource::Directory(dir) => ConfigLoader::load(&dir.join("config.toml")),
            ContentSource::Bundled => {
                ConfigLoader::parse(bundled("config.toml")?).context("in bundled config.toml")
            }
        }
    }

    /// Load one definition table, e.g. `creatures.ron`.
    pub fn load_table<D>(&self, file: &str) -> LoadResult<Registry<D>>
    where
        D: Definition + DeserializeOwned,
    {
        match &self.source {
            ContentSource::Directory(dir) => DefinitionLoader::load(&dir.join(file)),
            ContentSource::Bundled => {
                DefinitionLoader::parse(bundled(file)?, &format!("bundled {file}"))
            }
        }
    }

    /// Loads every table, registers the services in dependency order and runs
    /// the integrity pass.
    ///
    /// Inheritance cycles, missing parents and dangling references are all
    /// reported together in the returned error.
    pub fn build_services(&self) -> LoadResult<Services> {
        let config = self.load_config()?;
        let mut builder = Services::builder();
        builder
            .register(Service::Config(Arc::new(config)))?
            .register(Service::Statuses(Arc::new(self.load_table("statuses.ron")?)))?
            .register(Service::Equipment(Arc::new(self.load_table("equipment.ron")?)))?
            .register(Service::Passives(Arc::new(self.load_table("passives.ron")?)))?
            .register(Service::Skills(Arc::new(self.load_table("skills.ron")?)))?
            .register(Service::Items(Arc::new(self.load_table("items.ron")?)))?
            .register(Service::Creatures(Arc::new(self.load_table("creatures.ron")?)))?
            .register(Service::Dungeons(Arc::new(self.load_table("dungeons.ron")?)))?
            .register(Service::Events(Arc::new(self.load_table("events.ron")?)))?;
        let services = builder.build();

        integrity::check(&services).context("content failed the integrity check")?;
        tracing::info!(source = ?self.source, "content loaded");
        Ok(services)
    }
}

fn bundled(file: &str) -> LoadResult<&'static str> {
    BUNDLED
        .iter()
        .find(|(name, _)| *name == file)
        .map(|(_, content)| *content)
        .with_context(|| format!("no bundled data file named {file}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Some(Path::new("/tmp/data")));
        assert_eq!(ContentFactory::bundled().data_dir(), None);
    }

    #[test]
    fn unknown_bundled_file_is_an_error() {
        assert!(bundled("maps.ron").is_err());
    }
}

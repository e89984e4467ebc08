//! Game configuration loader.

use std::path::Path;

use anyhow::Context;
use game_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parses config TOML already in memory.
    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig =
            toml::from_str(content).context("Failed to parse config TOML")?;
        anyhow::ensure!(config.max_level >= 1, "max_level must be at least 1");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
            max_level = 50

            [battle]
            crit_multiplier = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.max_level, 50);
        assert_eq!(config.battle.crit_multiplier, 2.0);
        assert_eq!(config.battle.stab_multiplier, 1.25);
        assert_eq!(config.rewards.base_gold_per_enemy, 20);
    }

    #[test]
    fn zero_max_level_is_rejected() {
        assert!(ConfigLoader::parse("max_level = 0").is_err());
    }
}

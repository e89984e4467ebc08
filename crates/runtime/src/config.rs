//! Runtime configuration read from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use game_content::ContentFactory;

/// Settings for driving encounters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Content directory; the bundled data set is used when unset.
    pub data_dir: Option<PathBuf>,
    /// How long to wait for the animation's apply signal.
    pub apply_timeout: Duration,
    /// How long to wait for the animation's complete signal.
    pub complete_timeout: Duration,
    pub event_buffer: usize,
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            apply_timeout: Duration::from_millis(2000),
            complete_timeout: Duration::from_millis(4000),
            event_buffer: 128,
            seed: None,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Loads a `.env` file first if one exists. Environment variables:
    /// - `DUNGEON_DATA_DIR` - Content directory (default: bundled data)
    /// - `DUNGEON_APPLY_TIMEOUT_MS` - Apply signal timeout (default: 2000)
    /// - `DUNGEON_COMPLETE_TIMEOUT_MS` - Complete signal timeout (default: 4000)
    /// - `DUNGEON_EVENT_BUFFER` - Event bus capacity (default: 128)
    /// - `DUNGEON_SEED` - Encounter seed (default: random per run)
    ///
    /// Values that fail to parse keep their defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read_u64 = |key: &str| lookup(key)?.trim().parse::<u64>().ok();
        let mut config = Self::default();

        if let Some(dir) = lookup("DUNGEON_DATA_DIR").filter(|dir| !dir.is_empty()) {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(ms) = read_u64("DUNGEON_APPLY_TIMEOUT_MS") {
            config.apply_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = read_u64("DUNGEON_COMPLETE_TIMEOUT_MS") {
            config.complete_timeout = Duration::from_millis(ms);
        }
        if let Some(capacity) = read_u64("DUNGEON_EVENT_BUFFER") {
            config.event_buffer = usize::try_from(capacity).unwrap_or(usize::MAX).max(1);
        }
        config.seed = read_u64("DUNGEON_SEED");

        config
    }

    /// Content factory for the configured data source.
    pub fn content_factory(&self) -> ContentFactory {
        match &self.data_dir {
            Some(dir) => ContentFactory::new(dir.clone()),
            None => ContentFactory::bundled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> RuntimeConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        RuntimeConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.content_factory().data_dir(), None);
    }

    #[test]
    fn overrides_and_bad_values() {
        let config = config_from(&[
            ("DUNGEON_DATA_DIR", "/srv/content"),
            ("DUNGEON_APPLY_TIMEOUT_MS", "250"),
            ("DUNGEON_COMPLETE_TIMEOUT_MS", "soon"),
            ("DUNGEON_EVENT_BUFFER", "0"),
            ("DUNGEON_SEED", "42"),
        ]);

        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/content")));
        assert_eq!(config.apply_timeout, Duration::from_millis(250));
        assert_eq!(config.complete_timeout, Duration::from_millis(4000));
        assert_eq!(config.event_buffer, 1);
        assert_eq!(config.seed, Some(42));
    }
}

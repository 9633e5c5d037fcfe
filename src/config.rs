use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// User settings, read from `config.toml`. Missing keys take defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Artificial delay before a natural-language phrase is translated.
    pub translation_delay_ms: u64,
    /// How many finished calculations the history keeps.
    pub history_limit: usize,
    /// Group the integer part of the display with commas.
    pub group_digits: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translation_delay_ms: 800,
            history_limit: 10,
            group_digits: true,
        }
    }
}

impl Config {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kalk-nl")
            .join("config.toml")
    }

    /// Loads `path`, or the default location when `None`. A missing file
    /// yields the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("invalid config in {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn translation_delay(&self) -> Duration {
        Duration::from_millis(self.translation_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_toml("translation_delay_ms = 50").unwrap();
        assert_eq!(config.translation_delay(), Duration::from_millis(50));
        assert_eq!(config.history_limit, 10);
        assert!(config.group_digits);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(Config::from_toml("history_limit = \"many\"").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/kalk-nl.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }
}

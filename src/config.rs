//! Configuration file for flashdeck
//!
//! Read from `config.toml` in the platform config directory
//! (e.g. `~/.config/flashdeck/config.toml`). Every field is optional:
//!
//! ```toml
//! data_dir = "/home/me/.local/share/flashdeck"
//! intervals_minutes = [0, 10, 1440, 4320, 10080, 20160]
//! mastery_level = 4
//! default_unit = "unit_grade8a_3"
//! default_filter = "word"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flashcards::algorithm::{IntervalTable, DEFAULT_MASTERY_LEVEL, INTERVALS_MINUTES};
use crate::flashcards::{CategoryFilter, SessionOptions, StudyMode};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("intervals_minutes must contain at least one entry")]
    InvalidIntervals,

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where unit data is stored; defaults to the platform data directory
    pub data_dir: Option<PathBuf>,
    pub intervals_minutes: Vec<u64>,
    pub mastery_level: u32,
    pub default_unit: Option<String>,
    pub default_filter: CategoryFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            intervals_minutes: INTERVALS_MINUTES.to_vec(),
            mastery_level: DEFAULT_MASTERY_LEVEL,
            default_unit: None,
            default_filter: CategoryFilter::All,
        }
    }
}

impl Config {
    /// Default config file location, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("flashdeck").join("config.toml"))
    }

    /// Load from `path`, or from [`Config::default_path`] when `None`.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_toml(&fs::read_to_string(path)?)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_toml(&fs::read_to_string(path)?)?,
                None => Self::default(),
            },
        };
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.intervals_minutes.is_empty() {
            return Err(ConfigError::InvalidIntervals);
        }
        Ok(())
    }

    /// Configured data directory, or `{data-local-dir}/flashdeck`
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_local_dir()
                .map(|p| p.join("flashdeck"))
                .ok_or(ConfigError::DataDirNotFound),
        }
    }

    pub fn interval_table(&self) -> Result<IntervalTable> {
        IntervalTable::new(self.intervals_minutes.clone()).ok_or(ConfigError::InvalidIntervals)
    }

    pub fn session_options(&self, mode: StudyMode) -> Result<SessionOptions> {
        Ok(SessionOptions {
            intervals: self.interval_table()?,
            mastery_level: self.mastery_level,
            default_unit: self.default_unit.clone(),
            filter: self.default_filter,
            mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.interval_table().unwrap(), IntervalTable::default());
    }

    #[test]
    fn test_partial_file() {
        let config = Config::from_toml(
            r#"
            mastery_level = 3
            default_filter = "phrase"
            default_unit = "unit_grade8a_2"
            "#,
        )
        .unwrap();

        assert_eq!(config.mastery_level, 3);
        assert_eq!(config.default_filter, CategoryFilter::Phrase);
        assert_eq!(config.intervals_minutes, INTERVALS_MINUTES.to_vec());

        let options = config.session_options(StudyMode::Review).unwrap();
        assert_eq!(options.default_unit.as_deref(), Some("unit_grade8a_2"));
        assert_eq!(options.mode, StudyMode::Review);
    }

    #[test]
    fn test_rejects_empty_intervals() {
        assert!(matches!(
            Config::from_toml("intervals_minutes = []"),
            Err(ConfigError::InvalidIntervals)
        ));
    }

    #[test]
    fn test_rejects_bad_filter() {
        assert!(matches!(
            Config::from_toml(r#"default_filter = "verbs""#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "intervals_minutes = [0, 5]\ndata_dir = \"/tmp/decks\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.interval_table().unwrap().max_level(), 1);
        assert_eq!(config.resolved_data_dir().unwrap(), PathBuf::from("/tmp/decks"));

        assert!(matches!(
            Config::load(Some(&temp.path().join("missing.toml"))),
            Err(ConfigError::Io(_))
        ));
    }
}

//! Runtime configuration
//!
//! Loaded from a JSON file. Every key is optional and falls back to its
//! default; the loaded config is validated before use.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::Severity;
use crate::tracker::{TrackerLimits, DEFAULT_MAX_FIELDS};

/// Default config location
pub const DEFAULT_CONFIG_PATH: &str = "./habitrack.json";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid log_level: '{0}'. Must be one of trace, info, warn, error.")]
    InvalidLogLevel(String),

    #[error("max_fields_per_tracker must be > 0")]
    InvalidFieldLimit,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Minimum log severity (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Memoize compiled text patterns (default true)
    #[serde(default = "default_pattern_cache")]
    pub pattern_cache: bool,

    /// Upper bound on fields per tracker (default 32)
    #[serde(default = "default_max_fields")]
    pub max_fields_per_tracker: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_pattern_cache() -> bool {
    true
}
fn default_max_fields() -> usize {
    DEFAULT_MAX_FIELDS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            pattern_cache: default_pattern_cache(),
            max_fields_per_tracker: default_max_fields(),
        }
    }
}

impl Config {
    /// Load configuration from file.
    ///
    /// When `explicit` is false a missing file yields the defaults; a file
    /// the caller named must exist.
    pub fn load(path: &Path, explicit: bool) -> ConfigResult<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound && !explicit => {
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        Self::from_json(&content)
    }

    /// Parse and validate configuration text
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        self.severity()?;

        if self.max_fields_per_tracker == 0 {
            return Err(ConfigError::InvalidFieldLimit);
        }

        Ok(())
    }

    /// Parsed log threshold
    pub fn severity(&self) -> ConfigResult<Severity> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    pub fn limits(&self) -> TrackerLimits {
        TrackerLimits {
            max_fields: self.max_fields_per_tracker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_object_gives_defaults() {
        let file = write_config("{}");
        let config = Config::load(file.path(), true).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.severity().unwrap(), Severity::Info);
        assert_eq!(config.limits().max_fields, 32);
    }

    #[test]
    fn test_overrides() {
        let file = write_config(
            r#"{"log_level": "warn", "pattern_cache": false, "max_fields_per_tracker": 4}"#,
        );
        let config = Config::load(file.path(), true).unwrap();
        assert_eq!(config.severity().unwrap(), Severity::Warn);
        assert!(!config.pattern_cache);
        assert_eq!(config.limits().max_fields, 4);
    }

    #[test]
    fn test_missing_default_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(&dir.path().join("habitrack.json"), false).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempdir().unwrap();
        let result = Config::load(&dir.path().join("habitrack.json"), true);
        assert!(matches!(result, Err(ConfigError::Read(_))));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Config::from_json(r#"{"log_level": "debug"}"#),
            Err(ConfigError::InvalidLogLevel(level)) if level == "debug"
        ));
        assert!(matches!(
            Config::from_json(r#"{"max_fields_per_tracker": 0}"#),
            Err(ConfigError::InvalidFieldLimit)
        ));
        assert!(matches!(
            Config::from_json(r#"{"data_dir": "/tmp"}"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(Config::from_json("not json"), Err(ConfigError::Parse(_))));
    }
}

//! Configuration system

use std::path::Path;

pub use serde::{Serialize, Deserialize};

use crate::foundation::logging::{self, LevelFilter};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        match extension_of(path).as_deref() {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension_of(path).as_deref() {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Settings for a batch of MTL imports
///
/// The parse itself is not configurable; these settings only steer logging
/// and what the caller does with the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Log level name (`error`, `warn`, `info`, `debug`, `trace`, `off`)
    pub log_level: String,
    /// Treat any per-line diagnostic as a failed import
    pub fail_on_warnings: bool,
    /// Hand the parsed registry to the host adapter after parsing
    pub apply_to_host: bool,
}

impl ImportConfig {
    /// Resolved log level filter
    pub fn level_filter(&self) -> LevelFilter {
        logging::parse_level(&self.log_level)
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            fail_on_warnings: false,
            apply_to_host: true,
        }
    }
}

impl Config for ImportConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, Builder};

    #[test]
    fn test_load_toml_with_partial_fields() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "log_level = \"debug\"\nfail_on_warnings = true\n").unwrap();

        let config = ImportConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(config.fail_on_warnings);
        assert!(config.apply_to_host);
        assert_eq!(config.level_filter(), LevelFilter::Debug);
    }

    #[test]
    fn test_ron_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("import.ron");

        let config = ImportConfig {
            log_level: "warn".to_string(),
            fail_on_warnings: true,
            apply_to_host: false,
        };
        config.save_to_file(&path).unwrap();

        let loaded = ImportConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("import.ini");
        std::fs::write(&path, "log_level=debug").unwrap();

        let result = ImportConfig::load_from_file(&path);
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = ImportConfig::load_from_file(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}

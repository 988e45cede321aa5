//! TOML-based configuration for semsql.
//!
//! Example configuration:
//! ```toml
//! [compiler]
//! dialect = "mysql"   # mysql | postgres | duckdb
//! strict = false      # reject documents that fail validation
//!
//! [logging]
//! level = "warn"      # error | warn | info | debug | trace
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::sql::Dialect;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub compiler: CompilerSettings,

    pub logging: LoggingSettings,
}

/// Compiler configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Target dialect.
    pub dialect: Dialect,

    /// Validate documents before compiling and refuse those that fail.
    pub strict: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Maximum level written to stderr.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl LoggingSettings {
    /// The configured level.
    pub fn max_level(&self) -> Result<tracing::Level, SettingsError> {
        self.level
            .trim()
            .parse()
            .map_err(|_| SettingsError::InvalidConfig(format!("unknown log level '{}'", self.level)))
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings, from `explicit` when given.
    ///
    /// Otherwise searches in order:
    /// 1. Environment variable `SEMSQL_CONFIG`
    /// 2. `./semsql.toml`
    /// 3. `<config dir>/semsql/semsql.toml`
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Ok(path) = env::var("SEMSQL_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("semsql.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// `<config dir>/semsql/semsql.toml`, where the platform has one.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("semsql").join("semsql.toml"))
    }
}

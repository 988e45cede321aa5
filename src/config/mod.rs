//! Configuration module for semsql.

mod settings;

pub use settings::{CompilerSettings, LoggingSettings, Settings, SettingsError};

//! Launcher configuration.
//!
//! Optional TOML file with environment variable overrides. Command-line
//! flags win over the file, the file over built-in defaults. The file
//! covers the knobs the command line does not: kernel entry point,
//! device selection, default output format, log level.

use std::path::Path;

use serde::Deserialize;

use accel_core::ReportFormat;
use accel_runtime::DEFAULT_ENTRY_POINT;

/// Launcher configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LauncherConfig {
    /// Kernel entry point to invoke.
    #[serde(default = "default_entry_point")]
    pub entry_point: String,

    /// Which discovered device to build for.
    #[serde(default)]
    pub device_index: usize,

    /// Default output format (text, json).
    #[serde(default = "default_format")]
    pub format: String,

    /// Log level directive for the fmt subscriber.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_entry_point() -> String {
    DEFAULT_ENTRY_POINT.to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            entry_point: default_entry_point(),
            device_index: 0,
            format: default_format(),
            log_level: default_log_level(),
        }
    }
}

impl LauncherConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Loads from the given path, or returns defaults when the file is
    /// absent. A file that exists but fails to load is an error; it was
    /// put there on purpose.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Applies `BLACKASIAN_*` environment variable overrides.
    pub fn with_env_override(mut self) -> Self {
        if let Ok(entry_point) = std::env::var("BLACKASIAN_ENTRY_POINT") {
            self.entry_point = entry_point;
        }
        if let Ok(device_index) = std::env::var("BLACKASIAN_DEVICE_INDEX") {
            if let Ok(index) = device_index.parse() {
                self.device_index = index;
            }
        }
        if let Ok(format) = std::env::var("BLACKASIAN_FORMAT") {
            self.format = format;
        }
        if let Ok(log_level) = std::env::var("BLACKASIAN_LOG_LEVEL") {
            self.log_level = log_level;
        }
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.entry_point.is_empty() {
            errors.push("entry_point cannot be empty".to_string());
        }

        if let Err(e) = self.format.parse::<ReportFormat>() {
            errors.push(e);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, valid_log_levels
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Returns the configured report format.
    pub fn report_format(&self) -> Result<ReportFormat, ConfigError> {
        self.format
            .parse()
            .map_err(|e| ConfigError::Validation(vec![e]))
    }
}

/// Configuration error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// IO error reading the config file.
    Io(String),
    /// Parse error in the config file.
    Parse(String),
    /// Validation error.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {}", msg),
            Self::Parse(msg) => write!(f, "Parse error: {}", msg),
            Self::Validation(errors) => write!(f, "Validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {}

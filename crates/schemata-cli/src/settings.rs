use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::CliError;

/// Settings file picked up from the working directory when present.
pub const DEFAULT_SETTINGS_FILE: &str = "schemata.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive, overridden by `RUST_LOG`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateSettings {
    /// Perfect records before validating them.
    pub perfect: bool,
    /// Exit with an error when any record is invalid.
    pub fail_on_error: bool,
}

impl Default for ValidateSettings {
    fn default() -> Self {
        Self {
            perfect: true,
            fail_on_error: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub validate: ValidateSettings,
}

/// Load settings from `explicit`, else from [`DEFAULT_SETTINGS_FILE`] if it
/// exists, else defaults.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, CliError> {
    let path = match explicit {
        Some(path) => path,
        None => {
            let fallback = Path::new(DEFAULT_SETTINGS_FILE);
            if !fallback.exists() {
                return Ok(Settings::default());
            }
            fallback
        }
    };
    let content = std::fs::read_to_string(path)?;
    parse_settings(&content)
}

pub fn parse_settings(content: &str) -> Result<Settings, CliError> {
    Ok(toml::from_str(content)?)
}

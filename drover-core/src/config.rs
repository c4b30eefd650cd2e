use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default minimum time between two redraws of a throttled renderer.
pub const DEFAULT_THROTTLE: Duration = Duration::from_secs(1);

/// Format of the final command result written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// Whether the result channel carries structured data that text must not corrupt.
    pub fn is_machine_readable(self) -> bool {
        matches!(self, Self::Json)
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "human" | "" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Invalid(format!(
                "unknown output format '{other}' (expected 'text' or 'json')"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Progress settings, sourced once by the CLI layer and never re-read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Suppress all progress output.
    pub disabled: bool,
    /// Format of the final command result.
    pub format: OutputFormat,
    /// Emit newline-delimited JSON progress events when `format` is JSON.
    pub stream_events: bool,
    /// Override for the redraw throttle, in milliseconds.
    pub throttle_ms: Option<u64>,
}

impl ProgressConfig {
    /// Throttle interval to use when the caller did not pick one.
    pub fn throttle(&self) -> Duration {
        self.throttle_ms
            .map_or(DEFAULT_THROTTLE, Duration::from_millis)
    }
}

/// Top-level Drover configuration, matching `drover.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DroverConfig {
    #[serde(default)]
    pub progress: ProgressConfig,
}

impl DroverConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }
}

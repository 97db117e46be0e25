use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::defaults::{
    clamp_poll_interval_ms, default_api_prefix, default_origin, default_poll_interval_ms,
    default_toast_duration_ms,
};

/// Client settings loaded from `config.toml`.
///
/// Config keys (TOML): `server.origin`, `server.api_prefix`,
/// `live.poll_interval_ms`, `live.toast_duration_ms`, `live.missing_metrics`,
/// `export.output_dir`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub live: LiveSettings,
    #[serde(default)]
    pub export: ExportSettings,
}

impl AppConfig {
    pub(super) fn normalized(mut self) -> Self {
        self.server.origin = self.server.origin.trim().trim_end_matches('/').to_string();
        if self.server.origin.is_empty() {
            self.server.origin = default_origin();
        }
        let prefix = self.server.api_prefix.trim().trim_end_matches('/');
        self.server.api_prefix = if prefix.is_empty() {
            String::new()
        } else if prefix.starts_with('/') {
            prefix.to_string()
        } else {
            format!("/{prefix}")
        };
        self.live.poll_interval_ms = clamp_poll_interval_ms(self.live.poll_interval_ms);
        self
    }
}

/// Where the analysis backend lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Scheme, host and port of the backend, e.g. `http://localhost:8000`.
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Path prefix shared by every REST endpoint.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            api_prefix: default_api_prefix(),
        }
    }
}

/// Live session tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,
    #[serde(default)]
    pub missing_metrics: MissingMetricPolicy,
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            toast_duration_ms: default_toast_duration_ms(),
            missing_metrics: MissingMetricPolicy::default(),
        }
    }
}

/// What "Save Session" does when the latest snapshot lacks numeric metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingMetricPolicy {
    /// Send `0` for every missing metric and log which ones were defaulted.
    #[default]
    Zero,
    /// Refuse to save and tell the user which metrics are missing.
    Reject,
}

/// Export destinations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Directory for generated PDF reports; the working directory when unset.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    #[error("No suitable config directory found")]
    NoConfigDir,
    #[error("Invalid server origin '{origin}': {reason}")]
    InvalidOrigin { origin: String, reason: String },
}

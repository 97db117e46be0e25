use std::path::{Path, PathBuf};

use serde::de::Error as SerdeDeError;

use crate::app_dirs;

use super::types::{AppConfig, ConfigError};

/// Default filename used to store the client configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Environment variable that overrides `server.origin`.
pub const SERVER_ENV: &str = "SSTS_SERVER";

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load configuration from disk, returning defaults if missing.
///
/// `SSTS_SERVER` replaces the configured origin when set.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    let mut config = load_from(&config_path()?)?;
    if let Ok(origin) = std::env::var(SERVER_ENV) {
        apply_origin_override(&mut config, &origin)?;
    }
    Ok(config)
}

/// Load configuration from a specific file; a missing file yields defaults.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default().normalized());
    }
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source: SerdeDeError::custom(source),
    })?;
    toml::from_str::<AppConfig>(&text)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
        .map(AppConfig::normalized)
}

/// Persist configuration to the default location.
pub fn save(config: &AppConfig) -> Result<(), ConfigError> {
    save_to_path(config, &config_path()?)
}

/// Save configuration to a specific path, creating parent directories as needed.
pub fn save_to_path(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(config).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace the server origin after checking it parses as an http(s) URL.
pub fn apply_origin_override(config: &mut AppConfig, origin: &str) -> Result<(), ConfigError> {
    let trimmed = origin.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed).map_err(|err| ConfigError::InvalidOrigin {
        origin: origin.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidOrigin {
            origin: origin.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    config.server.origin = trimmed.to_string();
    Ok(())
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MissingMetricPolicy;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = load_from(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config.server.origin, "http://localhost:8000");
        assert_eq!(config.server.api_prefix, "/api/v1");
        assert_eq!(config.live.poll_interval_ms, 200);
        assert_eq!(config.live.toast_duration_ms, 3_000);
        assert_eq!(config.live.missing_metrics, MissingMetricPolicy::Zero);
    }

    #[test]
    fn partial_file_is_normalized() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "[server]\norigin = \"https://ssts.example/\"\napi_prefix = \"api/v2/\"\n\n[live]\npoll_interval_ms = 1\nmissing_metrics = \"reject\"\n",
        )
        .unwrap();
        let config = load_from(&path).unwrap();
        assert_eq!(config.server.origin, "https://ssts.example");
        assert_eq!(config.server.api_prefix, "/api/v2");
        assert_eq!(config.live.poll_interval_ms, 50);
        assert_eq!(config.live.toast_duration_ms, 3_000);
        assert_eq!(config.live.missing_metrics, MissingMetricPolicy::Reject);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut config = AppConfig::default().normalized();
        config.export.output_dir = Some(dir.path().join("reports"));
        config.live.poll_interval_ms = 500;
        save_to_path(&config, &path).unwrap();
        assert_eq!(load_from(&path).unwrap(), config);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[server\norigin = 3").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn origin_override_rejects_non_http_schemes() {
        let mut config = AppConfig::default().normalized();
        assert!(apply_origin_override(&mut config, "ftp://host").is_err());
        assert!(apply_origin_override(&mut config, "not a url").is_err());
        apply_origin_override(&mut config, "http://10.0.0.5:9000/").unwrap();
        assert_eq!(config.server.origin, "http://10.0.0.5:9000");
    }
}

//! Configuration loading, validation, and management for LightNavi.
//!
//! Loads configuration from `~/.lightnavi/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use lightnavi_core::message::DEFAULT_WELCOME_MESSAGE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.lightnavi/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Recommendation service connection
    #[serde(default)]
    pub service: ServiceConfig,

    /// Per-session behaviour
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the recommendation backend
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Path of the chat endpoint, appended to `api_url`
    #[serde(default = "default_chat_path")]
    pub chat_path: String,

    /// Transport timeout for one request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:8000".into()
}
fn default_chat_path() -> String {
    "/api/chat".into()
}
fn default_timeout_secs() -> u64 {
    120
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            chat_path: default_chat_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// First assistant turn of every session
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,

    /// How many candidates a turn shows
    #[serde(default = "default_candidate_display_limit")]
    pub candidate_display_limit: usize,
}

fn default_welcome_message() -> String {
    DEFAULT_WELCOME_MESSAGE.into()
}
fn default_candidate_display_limit() -> usize {
    5
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            welcome_message: default_welcome_message(),
            candidate_display_limit: default_candidate_display_limit(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.lightnavi/config.toml).
    ///
    /// Environment variables override the file:
    /// - `LIGHTNAVI_API_URL` (highest priority)
    /// - `NEXT_PUBLIC_API_URL`
    /// - `LIGHTNAVI_TIMEOUT_SECS`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup, then re-validate.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("LIGHTNAVI_API_URL").or_else(|| lookup("NEXT_PUBLIC_API_URL")) {
            tracing::debug!(api_url = %url, "API URL overridden from environment");
            self.service.api_url = url;
        }

        if let Some(raw) = lookup("LIGHTNAVI_TIMEOUT_SECS") {
            self.service.timeout_secs = raw.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "LIGHTNAVI_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                ))
            })?;
        }

        self.validate()
    }

    /// Full URL of the chat endpoint.
    pub fn chat_url(&self) -> String {
        format!(
            "{}/{}",
            self.service.api_url.trim_end_matches('/'),
            self.service.chat_path.trim_start_matches('/')
        )
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".lightnavi")
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        let url = self.service.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "service.api_url must start with http:// or https://, got '{url}'"
            )));
        }

        if self.service.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "service.timeout_secs must be > 0".into(),
            ));
        }

        if self.session.candidate_display_limit == 0 {
            return Err(ConfigError::ValidationError(
                "session.candidate_display_limit must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Write the default config to `path` unless a file is already there.
    ///
    /// Returns `true` when a file was written.
    pub fn write_default(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        std::fs::write(path, Self::default_toml()).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(true)
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Failed to write config file at {path}: {reason}")]
    WriteError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.service.api_url, "http://localhost:8000");
        assert_eq!(config.session.candidate_display_limit, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn chat_url_joins_without_double_slash() {
        let mut config = AppConfig::default();
        assert_eq!(config.chat_url(), "http://localhost:8000/api/chat");

        config.service.api_url = "https://navi.example.com/".into();
        assert_eq!(config.chat_url(), "https://navi.example.com/api/chat");
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.service.api_url, config.service.api_url);
        assert_eq!(parsed.session.welcome_message, config.session.welcome_message);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[service]\napi_url = \"https://navi.example.com\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.service.api_url, "https://navi.example.com");
        assert_eq!(config.service.chat_path, "/api/chat");
        assert_eq!(config.service.timeout_secs, 120);
        assert!(config.session.welcome_message.contains("照明"));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[service\napi_url = 1").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn invalid_url_rejected() {
        let config = AppConfig {
            service: ServiceConfig {
                api_url: "localhost:8000".into(),
                ..ServiceConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_display_limit_rejected() {
        let config = AppConfig {
            session: SessionConfig {
                candidate_display_limit: 0,
                ..SessionConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        let config = result.unwrap();
        assert_eq!(config.service.chat_path, "/api/chat");
    }

    #[test]
    fn env_overrides_take_priority() {
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(env(&[
                ("NEXT_PUBLIC_API_URL", "http://frontend-default:8000"),
                ("LIGHTNAVI_API_URL", "http://backend:9000"),
                ("LIGHTNAVI_TIMEOUT_SECS", "30"),
            ]))
            .unwrap();
        assert_eq!(config.service.api_url, "http://backend:9000");
        assert_eq!(config.service.timeout_secs, 30);
    }

    #[test]
    fn next_public_api_url_is_a_fallback() {
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(env(&[("NEXT_PUBLIC_API_URL", "http://api:8000")]))
            .unwrap();
        assert_eq!(config.service.api_url, "http://api:8000");
    }

    #[test]
    fn non_numeric_timeout_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env_overrides(env(&[("LIGHTNAVI_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("LIGHTNAVI_TIMEOUT_SECS"));
    }

    #[test]
    fn write_default_does_not_clobber() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(AppConfig::write_default(&path).unwrap());
        std::fs::write(&path, "[session]\ncandidate_display_limit = 3\n").unwrap();
        assert!(!AppConfig::write_default(&path).unwrap());

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.session.candidate_display_limit, 3);
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("localhost:8000"));
        assert!(toml_str.contains("candidate_display_limit"));
    }
}

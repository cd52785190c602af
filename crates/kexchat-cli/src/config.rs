//! KexChat CLI configuration management.
//!
//! Configuration comes from a TOML file (`~/.kexchat/config.toml` by
//! default, or a path given on the command line) with sensible defaults for
//! everything, so a config file is never required.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

// ----------------------------------------------------------------------------
// Configuration types
// ----------------------------------------------------------------------------

/// Complete configuration for the KexChat terminal client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub relay: RelayConfig,
    pub ui: UiConfig,
}

/// Where to find the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// WebSocket URL of the relay endpoint.
    pub url: String,
}

/// Terminal rendering options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Prompt shown before the input line.
    pub prompt: String,
    /// Prefix chat lines with the event's clock time.
    pub show_timestamps: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self { url: "ws://localhost:8080/chat".to_string() }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { prompt: "kexchat> ".to_string(), show_timestamps: true }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { relay: RelayConfig::default(), ui: UiConfig::default() }
    }
}

// ----------------------------------------------------------------------------
// Loading and validation
// ----------------------------------------------------------------------------

impl AppConfig {
    /// Load from the default path if a config file exists there, otherwise
    /// fall back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_config_path() {
            Some(path) if path.exists() => Self::load_from_file(path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::Loading(format!("failed to read {}: {e}", path.as_ref().display()))
        })?;
        let config: AppConfig = toml::from_str(&text).map_err(|e| {
            ConfigError::Loading(format!("failed to parse {}: {e}", path.as_ref().display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// The default configuration file location.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".kexchat").join("config.toml"))
    }

    /// Check the configuration for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.relay_url()?;
        match url.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(ConfigError::Validation(format!(
                    "relay URL must use ws:// or wss://, got {other}://"
                )));
            }
        }
        if self.ui.prompt.is_empty() {
            return Err(ConfigError::Validation("prompt must not be empty".to_string()));
        }
        Ok(())
    }

    /// The relay endpoint as a parsed URL.
    pub fn relay_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.relay.url)
            .map_err(|e| ConfigError::Validation(format!("invalid relay URL {}: {e}", self.relay.url)))
    }

    /// Example configuration file content.
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| "# failed to generate example config".to_string())
    }
}

// ----------------------------------------------------------------------------
// Error type
// ----------------------------------------------------------------------------

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration loading error: {0}")]
    Loading(String),

    #[error("configuration validation error: {0}")]
    Validation(String),
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.relay.url, "ws://localhost:8080/chat");
        assert_eq!(config.ui.prompt, "kexchat> ");
        assert!(config.ui.show_timestamps);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [relay]
            url = "wss://chat.example.org/relay"
            "#,
        )
        .unwrap();
        assert_eq!(config.relay.url, "wss://chat.example.org/relay");
        assert_eq!(config.ui.prompt, "kexchat> ");
    }

    #[test]
    fn non_websocket_scheme_is_rejected() {
        let mut config = AppConfig::default();
        config.relay.url = "https://chat.example.org".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn garbage_url_is_rejected() {
        let mut config = AppConfig::default();
        config.relay.url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn example_config_round_trips() {
        let example = AppConfig::example_config();
        assert!(example.contains("[relay]"));
        assert!(example.contains("[ui]"));
        let parsed: AppConfig = toml::from_str(&example).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }
}

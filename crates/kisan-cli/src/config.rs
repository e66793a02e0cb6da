//! CLI configuration file support
//!
//! Loads configuration from ~/.config/kisan/config.toml

use kisan_ai::Language;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Proxy connection settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Default settings
    #[serde(default)]
    pub default: DefaultConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultConfig {
    /// Language code used when none is given on the command line
    pub language: Option<String>,
}

impl CliConfig {
    /// Load configuration from default path
    pub fn load() -> Self {
        Self::load_from_path(Self::default_path())
    }

    /// Load configuration from a specific path.
    ///
    /// A missing or unreadable file yields the defaults.
    pub fn load_from_path(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), error = %err, "Ignoring invalid config file");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Get the default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kisan").join("config.toml"))
    }

    /// Proxy URL: command line first, then the config file.
    pub fn server_url(&self, flag: Option<&str>) -> String {
        flag.or(self.server.url.as_deref())
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_SERVER_URL)
            .to_string()
    }

    pub fn token(&self, flag: Option<String>) -> Option<String> {
        flag.or_else(|| self.server.token.clone())
    }

    /// Language: command line first, then the config file. Unknown codes in
    /// the file fall back to English.
    pub fn language(&self, flag: Option<Language>) -> Language {
        flag.unwrap_or_else(|| Language::resolve(self.default.language.as_deref()))
    }
}

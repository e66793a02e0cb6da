use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;

use kisan_ai::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub upstream: UpstreamSettings,
    pub auth: AuthSettings,
}

#[derive(Clone)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub connect_timeout_secs: Option<u64>,
}

// Secrets stay out of logs.
impl fmt::Debug for UpstreamSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamSettings")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct AuthSettings {
    pub api_keys: Vec<String>,
    pub jwt_secret: Option<String>,
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("api_keys", &self.api_keys.len())
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    upstream: UpstreamSection,
    #[serde(default)]
    auth: AuthSection,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamSection {
    #[serde(default = "default_upstream_url")]
    url: String,
    #[serde(default = "default_model")]
    model: String,
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    connect_timeout_secs: Option<u64>,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            model: default_model(),
            api_key: None,
            connect_timeout_secs: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct AuthSection {
    #[serde(default)]
    api_keys: Vec<String>,
    #[serde(default)]
    jwt_secret: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_upstream_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl ServerConfig {
    /// Load from `KISAN_SERVER_CONFIG` or `./server.toml`, else from the
    /// environment. Secrets set in the environment always win.
    pub fn load() -> anyhow::Result<Self> {
        let lookup = |key: &str| env::var(key).ok();
        let config = match load_from_file()? {
            Some(file_config) => Self::from_file_config(file_config),
            None => Self::from_lookup(lookup),
        };

        let config = config.with_secret_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let parsed: FileConfig = toml::from_str(contents)?;
        Ok(Self::from_file_config(parsed))
    }

    fn from_file_config(file_config: FileConfig) -> Self {
        Self {
            host: file_config.server.host,
            port: file_config.server.port,
            upstream: UpstreamSettings {
                base_url: file_config.upstream.url,
                model: file_config.upstream.model,
                api_key: file_config.upstream.api_key,
                connect_timeout_secs: file_config.upstream.connect_timeout_secs,
            },
            auth: AuthSettings {
                api_keys: file_config.auth.api_keys,
                jwt_secret: file_config.auth.jwt_secret,
            },
        }
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("KISAN_SERVER_HOST").unwrap_or_else(default_host);
        let port = lookup("KISAN_SERVER_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or_else(default_port);
        let base_url = lookup("KISAN_UPSTREAM_URL").unwrap_or_else(default_upstream_url);
        let model = lookup("KISAN_UPSTREAM_MODEL").unwrap_or_else(default_model);
        let connect_timeout_secs = lookup("KISAN_UPSTREAM_CONNECT_TIMEOUT_SECS")
            .and_then(|value| value.parse::<u64>().ok());

        Self {
            host,
            port,
            upstream: UpstreamSettings {
                base_url,
                model,
                api_key: None,
                connect_timeout_secs,
            },
            auth: AuthSettings::default(),
        }
    }

    fn with_secret_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup("KISAN_UPSTREAM_API_KEY") {
            self.upstream.api_key = Some(key);
        }
        if let Some(raw) = lookup("KISAN_PROXY_API_KEYS") {
            self.auth.api_keys = split_keys(&raw);
        }
        if let Some(secret) = lookup("KISAN_PROXY_JWT_SECRET") {
            self.auth.jwt_secret = Some(secret);
        }
        self
    }

    /// The upstream credential must never double as a client credential.
    pub fn validate(&self) -> anyhow::Result<()> {
        let Some(upstream_key) = self.upstream.api_key.as_deref().map(str::trim) else {
            return Ok(());
        };
        if upstream_key.is_empty() {
            return Ok(());
        }

        let reused_as_key = self.auth.api_keys.iter().any(|key| key.trim() == upstream_key);
        let reused_as_secret = self
            .auth
            .jwt_secret
            .as_deref()
            .is_some_and(|secret| secret.trim() == upstream_key);
        if reused_as_key || reused_as_secret {
            anyhow::bail!("The upstream API key must not be reused as a proxy credential");
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn split_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

fn load_from_file() -> anyhow::Result<Option<FileConfig>> {
    let config_path = env::var("KISAN_SERVER_CONFIG").ok();
    let path = if let Some(path) = config_path {
        Some(path)
    } else if Path::new("server.toml").exists() {
        Some("server.toml".to_string())
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(None);
    };

    let contents = fs::read_to_string(&path)
        .map_err(|err| anyhow::anyhow!("Failed to read config {}: {}", path, err))?;
    let parsed: FileConfig = toml::from_str(&contents)
        .map_err(|err| anyhow::anyhow!("Failed to parse config {}: {}", path, err))?;
    Ok(Some(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = ServerConfig::from_toml_str("").unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.upstream.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.upstream.model, DEFAULT_MODEL);
        assert!(config.upstream.api_key.is_none());
        assert!(config.auth.api_keys.is_empty());
    }

    #[test]
    fn parses_all_sections() {
        let config = ServerConfig::from_toml_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [upstream]
            url = "http://localhost:4000/v1"
            model = "test-model"
            connect_timeout_secs = 5

            [auth]
            api_keys = ["client-a", "client-b"]
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.upstream.base_url, "http://localhost:4000/v1");
        assert_eq!(config.upstream.model, "test-model");
        assert_eq!(config.upstream.connect_timeout_secs, Some(5));
        assert_eq!(config.auth.api_keys, vec!["client-a", "client-b"]);
    }

    #[test]
    fn environment_fallback_and_secret_overrides() {
        let lookup = lookup_from(&[
            ("KISAN_SERVER_PORT", "7070"),
            ("KISAN_UPSTREAM_MODEL", "m"),
            ("KISAN_UPSTREAM_API_KEY", "upstream"),
            ("KISAN_PROXY_API_KEYS", " one, ,two "),
            ("KISAN_PROXY_JWT_SECRET", "jwt"),
        ]);
        let config = ServerConfig::from_lookup(&lookup).with_secret_overrides(&lookup);

        assert_eq!(config.port, 7070);
        assert_eq!(config.upstream.model, "m");
        assert_eq!(config.upstream.api_key.as_deref(), Some("upstream"));
        assert_eq!(config.auth.api_keys, vec!["one", "two"]);
        assert_eq!(config.auth.jwt_secret.as_deref(), Some("jwt"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_upstream_key_reused_for_clients() {
        let lookup = lookup_from(&[
            ("KISAN_UPSTREAM_API_KEY", "shared"),
            ("KISAN_PROXY_API_KEYS", "shared"),
        ]);
        let config = ServerConfig::from_lookup(&lookup).with_secret_overrides(&lookup);
        assert!(config.validate().is_err());

        let lookup = lookup_from(&[
            ("KISAN_UPSTREAM_API_KEY", "shared"),
            ("KISAN_PROXY_JWT_SECRET", "shared"),
        ]);
        let config = ServerConfig::from_lookup(&lookup).with_secret_overrides(&lookup);
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let lookup = lookup_from(&[("KISAN_UPSTREAM_API_KEY", "sk-very-secret")]);
        let config = ServerConfig::from_lookup(&lookup).with_secret_overrides(&lookup);
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Arc;

use crate::config::AuthSettings;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Claims {
    sub: Option<String>,
    exp: Option<usize>,
}

/// Client credentials accepted by the proxy.
///
/// Keys are kept only as SHA-256 digests.
#[derive(Default)]
pub struct ApiKeyManager {
    key_hashes: HashSet<String>,
    jwt_secret: Option<String>,
}

impl ApiKeyManager {
    pub fn new<I, S>(keys: I, jwt_secret: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key_hashes = keys
            .into_iter()
            .map(|key| key.as_ref().trim().to_string())
            .filter(|key| !key.is_empty())
            .map(|key| hash_key(&key))
            .collect();
        Self {
            key_hashes,
            jwt_secret: jwt_secret.filter(|secret| !secret.trim().is_empty()),
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Arc<Self> {
        Arc::new(Self::new(&settings.api_keys, settings.jwt_secret.clone()))
    }

    /// Whether any credential is configured. Without one the proxy is open.
    pub fn is_enabled(&self) -> bool {
        !self.key_hashes.is_empty() || self.jwt_secret.is_some()
    }

    pub fn validate_key(&self, key: &str) -> bool {
        self.key_hashes.contains(&hash_key(key))
    }

    pub fn validate_jwt(&self, token: &str) -> bool {
        let Some(secret) = &self.jwt_secret else {
            return false;
        };
        let validation = Validation::new(Algorithm::HS256);
        let key = DecodingKey::from_secret(secret.as_bytes());
        decode::<Claims>(token, &key, &validation).is_ok()
    }

    pub fn authorize(&self, token: &str) -> bool {
        self.validate_key(token) || self.validate_jwt(token)
    }
}

fn hash_key(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}

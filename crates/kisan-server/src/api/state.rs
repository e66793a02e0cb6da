use kisan_ai::{ChatCompletionsClient, build_http_client};
use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;

/// Immutable state shared by every request.
pub struct ProxyState {
    pub upstream: ChatCompletionsClient,
}

pub type AppState = Arc<ProxyState>;

impl ProxyState {
    pub fn new(upstream: ChatCompletionsClient) -> Self {
        Self { upstream }
    }

    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let http = build_http_client(config.upstream.connect_timeout_secs.map(Duration::from_secs))?;
        let upstream = ChatCompletionsClient::new(http)
            .with_api_key(config.upstream.api_key.clone())
            .with_model(config.upstream.model.clone())
            .with_base_url(config.upstream.base_url.clone());
        Ok(Self::new(upstream))
    }
}

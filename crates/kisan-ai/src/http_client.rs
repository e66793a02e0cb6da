use std::time::Duration;

use reqwest::Client;

const DISABLE_SYSTEM_PROXY_ENV: &str = "KISAN_DISABLE_SYSTEM_PROXY";

/// Build the shared HTTP client.
///
/// No overall request timeout is set: a streamed reply may legitimately take
/// minutes. Only the connect phase is bounded, and only when asked to.
pub fn build_http_client(connect_timeout: Option<Duration>) -> reqwest::Result<Client> {
    let mut builder = Client::builder();
    if should_disable_system_proxy() {
        builder = builder.no_proxy();
    }
    if let Some(timeout) = connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    builder.build()
}

fn should_disable_system_proxy() -> bool {
    if std::env::var_os(DISABLE_SYSTEM_PROXY_ENV).is_some() {
        return true;
    }

    cfg!(test)
}

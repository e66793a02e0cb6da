//! Kisan Mitra chat proxy.
//!
//! A stateless HTTP front for an OpenAI-compatible chat-completion API:
//! `POST /chat` prepends a language-specific system prompt and relays the
//! upstream SSE stream back byte for byte.

pub mod api;
mod app;
pub mod auth;
pub mod config;

pub use api::state::{AppState, ProxyState};
pub use app::build_router;
pub use auth::ApiKeyManager;
pub use config::ServerConfig;

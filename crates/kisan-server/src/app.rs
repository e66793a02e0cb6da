use axum::{
    Extension, Router,
    http::{HeaderName, Method, header},
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, Any, CorsLayer};

use crate::api::{
    chat::{chat, preflight},
    languages::list_languages,
    state::AppState,
};
use crate::auth::{ApiKeyManager, auth_middleware};

// Headers browser clients of the hosted edition attach to every call.
const CLIENT_HEADERS: [&str; 6] = [
    "x-client-info",
    "apikey",
    "x-supabase-client-platform",
    "x-supabase-client-platform-version",
    "x-supabase-client-runtime",
    "x-supabase-client-runtime-version",
];

#[derive(serde::Serialize)]
struct Health {
    status: String,
}

async fn health() -> axum::Json<Health> {
    axum::Json(Health {
        status: "ok".to_string(),
    })
}

fn cors_layer() -> CorsLayer {
    let mut headers = vec![header::AUTHORIZATION, header::CONTENT_TYPE];
    headers.extend(CLIENT_HEADERS.into_iter().map(HeaderName::from_static));

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::list(headers))
}

pub fn build_router(state: AppState, keys: Arc<ApiKeyManager>) -> Router {
    let chat_routes = Router::new()
        .route("/chat", post(chat).options(preflight))
        .route_layer(middleware::from_fn(auth_middleware));

    Router::new()
        .route("/health", get(health))
        .route("/languages", get(list_languages))
        .merge(chat_routes)
        .layer(Extension(keys))
        .layer(cors_layer())
        .with_state(state)
}

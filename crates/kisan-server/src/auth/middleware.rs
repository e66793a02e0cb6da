use super::ApiKeyManager;
use crate::api::ApiError;
use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

pub async fn auth_middleware(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return next.run(req).await;
    }

    let Some(manager) = req.extensions().get::<Arc<ApiKeyManager>>().cloned() else {
        return next.run(req).await;
    };
    if !manager.is_enabled() {
        return next.run(req).await;
    }

    let token = match extract_token(req.headers()) {
        Some(token) => token,
        None => return unauthorized(),
    };

    if manager.authorize(&token) {
        return next.run(req).await;
    }

    tracing::warn!("Rejected chat request with invalid credentials");
    unauthorized()
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer(headers.get(axum::http::header::AUTHORIZATION)) {
        return Some(token);
    }

    headers
        .get("apikey")
        .and_then(|value| value.to_str().ok())
        .map(|token| token.trim().to_string())
}

fn extract_bearer(header: Option<&HeaderValue>) -> Option<String> {
    let value = header?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(|token| token.trim().to_string())
}

fn unauthorized() -> Response {
    ApiError::Unauthorized.into_response()
}

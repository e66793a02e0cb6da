use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kisan_ai::AiError;
use serde_json::json;

const SERVICE_ERROR: &str = "AI service error";
const UNREACHABLE: &str = "Failed to reach AI service";

/// Failures of `POST /chat`, rendered as `{"error": ...}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized,
    Upstream(AiError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Upstream(AiError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream(AiError::QuotaExhausted) => StatusCode::PAYMENT_REQUIRED,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller. Upstream details stay server-side.
    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Unauthorized => "Unauthorized".to_string(),
            ApiError::Upstream(
                err @ (AiError::RateLimited | AiError::QuotaExhausted | AiError::MissingApiKey),
            ) => err.to_string(),
            ApiError::Upstream(AiError::Http(_) | AiError::Connection(_)) => UNREACHABLE.to_string(),
            ApiError::Upstream(_) => SERVICE_ERROR.to_string(),
        }
    }
}

impl From<AiError> for ApiError {
    fn from(error: AiError) -> Self {
        ApiError::Upstream(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({"error": self.message()}))).into_response()
    }
}

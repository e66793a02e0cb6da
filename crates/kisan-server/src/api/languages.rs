use axum::Json;
use kisan_ai::Language;
use kisan_ai::language::LanguageInfo;

use crate::api::ApiResponse;

/// GET /languages - List the languages the assistant can answer in
pub async fn list_languages() -> Json<ApiResponse<Vec<LanguageInfo>>> {
    let languages = Language::ALL.into_iter().map(Language::info).collect();
    Json(ApiResponse::ok(languages))
}

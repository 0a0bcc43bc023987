use axum::Json;
use axum::http::Uri;

use crate::error::ApiError;
use crate::models::ApiInfo;

// Placeholder for the v1 API group
pub async fn api_index() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "API v1".to_string(),
    })
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

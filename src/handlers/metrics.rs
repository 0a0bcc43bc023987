use crate::error::ApiError;
use crate::metrics;

// Prometheus scrape endpoint
pub async fn metrics_handler() -> Result<String, ApiError> {
    metrics::render().map_err(ApiError::Internal)
}

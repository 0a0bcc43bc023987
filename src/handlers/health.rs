use axum::{Json, extract::State};
use std::sync::Arc;

use crate::models::HealthStatus;
use crate::state::AppState;

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(state.health.check())
}

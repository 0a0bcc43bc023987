use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use tracing::info;

use super::RequestId;
use crate::metrics::{REQUEST_LATENCY, REQUEST_TOTAL};

// one structured event per completed request
pub async fn log_request(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_id = RequestId::from_request(&req).unwrap_or_default();

    let response = next.run(req).await;

    let elapsed = start.elapsed();
    REQUEST_TOTAL.inc();
    REQUEST_LATENCY.observe(elapsed.as_secs_f64());

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = elapsed.as_millis() as u64,
        "request completed"
    );
    response
}

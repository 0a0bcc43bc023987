use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::warn;

use super::client_key;
use crate::error::ApiError;
use crate::metrics::RATE_LIMITED_TOTAL;
use crate::rate_limit::RateLimitDecision;
use crate::state::AppState;

pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";

// Per-IP token bucket check, rejected requests never reach the handler
pub async fn rate_limit(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let key = client_key(&req, state.trust_proxy_headers);
    let decision = state.limiter.check(&key);

    if !decision.allowed {
        RATE_LIMITED_TOTAL.inc();
        warn!(client = %key, limit = decision.limit, "rate limit exceeded");

        let mut response =
            ApiError::TooManyRequests("Rate limit exceeded".to_string()).into_response();
        set_headers(response.headers_mut(), &decision);
        return response;
    }

    let mut response = next.run(req).await;
    set_headers(response.headers_mut(), &decision);
    response
}

fn set_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert(
        HeaderName::from_static(RATE_LIMIT_LIMIT_HEADER),
        HeaderValue::from(decision.limit),
    );
    headers.insert(
        HeaderName::from_static(RATE_LIMIT_REMAINING_HEADER),
        HeaderValue::from(decision.remaining),
    );
    headers.insert(
        HeaderName::from_static(RATE_LIMIT_RESET_HEADER),
        HeaderValue::from(decision.reset_secs),
    );
}

use std::sync::Arc;

use crate::health::HealthChecker;
use crate::rate_limit::RateLimiter;

// app's shared state
pub struct AppState {
    pub limiter: Arc<RateLimiter>,
    pub health: HealthChecker,
    pub trust_proxy_headers: bool, // read client IP from X-Forwarded-For / X-Real-IP
}

impl AppState {
    pub fn new(limiter: RateLimiter, trust_proxy_headers: bool) -> Self {
        Self {
            limiter: Arc::new(limiter),
            health: HealthChecker::new(),
            trust_proxy_headers,
        }
    }
}

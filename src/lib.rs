//! Minimal HTTP API service: a health check, an empty `/api/v1` group and a
//! middleware stack with request IDs, structured logging, panic recovery and
//! per-IP token bucket rate limiting.

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod server;
pub mod state;

pub use config::{Args, LogFormat, RateLimitConfig};
pub use error::{ApiError, Error, Result};
pub use rate_limit::{RateLimitDecision, RateLimiter, TokenBucket};
pub use server::{create_router, serve, shutdown_signal, with_middleware};
pub use state::AppState;

//! Per-client token bucket rate limiting.
//!
//! Every client key owns one [`TokenBucket`] that refills continuously at
//! `max_requests / window` tokens per second, up to `max_requests` tokens.
//! Each request consumes exactly one token.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::config::RateLimitConfig;
use crate::error::{Error, Result};
use crate::metrics::RATE_LIMIT_BUCKETS;

// mutable part of a bucket, only touched under its lock
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// A continuously refilling token bucket for a single client.
///
/// Refill and consumption happen under one per-bucket lock, so concurrent
/// callers never both spend the last token.
pub struct TokenBucket {
    capacity: f64,
    refill_rate: f64, // tokens per second
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Create a full bucket. Rejects non-positive or non-finite parameters.
    pub fn new(capacity: f64, refill_rate: f64) -> Result<Self> {
        if !capacity.is_finite() || capacity <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "bucket capacity must be a positive number, got {}",
                capacity
            )));
        }
        if !refill_rate.is_finite() || refill_rate <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "refill rate must be a positive number, got {}",
                refill_rate
            )));
        }
        Ok(Self::full(capacity, refill_rate))
    }

    // caller guarantees both values are already validated
    fn full(capacity: f64, refill_rate: f64) -> Self {
        Self {
            capacity,
            refill_rate,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Try to take one token. Returns `true` if the caller may proceed.
    pub fn try_consume(&self) -> bool {
        self.try_consume_at(Instant::now())
    }

    /// Same as [`try_consume`](TokenBucket::try_consume) with an explicit clock reading.
    pub fn try_consume_at(&self, now: Instant) -> bool {
        self.consume_at(now).is_some()
    }

    // tokens left after a successful consume, read under the same lock
    fn consume_at(&self, now: Instant) -> Option<f64> {
        let mut state = self.state.lock();
        self.refill(&mut state, now);

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            Some(state.tokens)
        } else {
            None
        }
    }

    /// Tokens available right now, after refilling. Never consumes.
    pub fn current_tokens(&self) -> f64 {
        self.current_tokens_at(Instant::now())
    }

    pub fn current_tokens_at(&self, now: Instant) -> f64 {
        let mut state = self.state.lock();
        self.refill(&mut state, now);
        state.tokens
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn refill_rate(&self) -> f64 {
        self.refill_rate
    }

    fn refill(&self, state: &mut BucketState, now: Instant) {
        // a reading older than the last refill counts as no time passed
        let elapsed = now.saturating_duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.refill_rate).min(self.capacity);
        if now > state.last_refill {
            state.last_refill = now;
        }
    }
}

/// Outcome of a rate limit check, carrying what the HTTP layer reports in headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u64,
    pub reset_secs: u64,
}

/// Registry of token buckets, one per client key.
///
/// Buckets are created on first use and never evicted.
pub struct RateLimiter {
    buckets: DashMap<String, Arc<TokenBucket>>,
    max_tokens: f64,
    refill_rate: f64,
    limit: u32,
    reset_secs: u64,
}

impl RateLimiter {
    /// `max_requests` per `window_minutes`, refilled continuously.
    pub fn new(max_requests: u32, window_minutes: f64) -> Result<Self> {
        Self::from_config(&RateLimitConfig {
            max_requests,
            window_minutes,
        })
    }

    pub fn from_config(config: &RateLimitConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            buckets: DashMap::new(),
            max_tokens: config.max_requests as f64,
            refill_rate: config.refill_rate_per_second(),
            limit: config.max_requests,
            reset_secs: config.reset_hint_secs(),
        })
    }

    /// Get or create the bucket for `key`.
    ///
    /// When two callers race on a new key, both get the bucket that won the insert.
    pub fn bucket_for(&self, key: &str) -> Arc<TokenBucket> {
        if let Some(bucket) = self.buckets.get(key) {
            return Arc::clone(bucket.value());
        }

        let bucket = self.buckets.entry(key.to_string()).or_insert_with(|| {
            debug!(client = %key, "creating rate limit bucket");
            RATE_LIMIT_BUCKETS.inc();
            Arc::new(TokenBucket::full(self.max_tokens, self.refill_rate))
        });
        Arc::clone(bucket.value())
    }

    pub fn decide(&self, key: &str) -> bool {
        self.bucket_for(key).try_consume()
    }

    /// Consume a token for `key` and report the header values for the response.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        let left = self.bucket_for(key).consume_at(Instant::now());
        let remaining = left.map_or(0, |tokens| tokens.floor().max(0.0) as u64);

        RateLimitDecision {
            allowed: left.is_some(),
            limit: self.limit,
            remaining,
            reset_secs: self.reset_secs,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    // fixed hint: the configured window, not the time to the next token
    pub fn reset_hint_secs(&self) -> u64 {
        self.reset_secs
    }

    pub fn refill_rate(&self) -> f64 {
        self.refill_rate
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

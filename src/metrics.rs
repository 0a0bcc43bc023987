use lazy_static::lazy_static;
use prometheus::{
    Counter, Encoder, Gauge, Histogram, TextEncoder, register_counter, register_gauge,
    register_histogram,
};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("http_requests_total", "Total number of requests").unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter = register_counter!(
        "http_requests_rate_limited_total",
        "Requests rejected by the rate limiter"
    )
    .unwrap();
    pub static ref PANICS_RECOVERED: Counter = register_counter!(
        "http_panics_recovered_total",
        "Handler panics turned into 500 responses"
    )
    .unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "http_request_duration_seconds",
        "Request latency in seconds"
    )
    .unwrap();
    // grows with every new client key, buckets are never evicted
    pub static ref RATE_LIMIT_BUCKETS: Gauge =
        register_gauge!("rate_limit_buckets", "Number of per-client token buckets").unwrap();
}

/// Render the default registry in the Prometheus text format.
pub fn render() -> Result<String, String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| format!("Encode error: {}", e))?;
    String::from_utf8(buffer).map_err(|e| format!("Invalid UTF-8 in metrics: {}", e))
}

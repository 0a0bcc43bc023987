mod api;
mod health;
mod metrics;

pub use api::{api_index, not_found};
pub use health::health_handler;
pub use metrics::metrics_handler;

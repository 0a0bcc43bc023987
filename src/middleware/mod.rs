//! Request middleware, applied in this order (outermost first):
//! request ID → logging → panic recovery → rate limiting.

mod client_ip;
mod logging;
mod rate_limit;
mod recovery;
mod request_id;

pub use client_ip::client_key;
pub use logging::log_request;
pub use rate_limit::{
    RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_REMAINING_HEADER, RATE_LIMIT_RESET_HEADER, rate_limit,
};
pub use recovery::{install_panic_hook, recover_panics};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id};

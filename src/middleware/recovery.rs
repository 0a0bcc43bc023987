use axum::Json;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use futures::FutureExt;
use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::panic::AssertUnwindSafe;
use std::sync::Once;
use tracing::error;

use super::RequestId;
use crate::error::ApiError;
use crate::metrics::PANICS_RECOVERED;

thread_local! {
    // backtrace of the latest panic on this thread, taken by the recovery layer
    static LAST_PANIC_STACK: RefCell<Option<String>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Capture a backtrace for every panic so [`recover_panics`] can log it.
///
/// Chains to the previously installed hook. Safe to call more than once.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let stack = Backtrace::force_capture().to_string();
            LAST_PANIC_STACK.with(|slot| *slot.borrow_mut() = Some(stack));
            previous(info);
        }));
    });
}

// the hook runs on the panicking thread, which is the one polling catch_unwind
fn take_panic_stack() -> Option<String> {
    LAST_PANIC_STACK.with(|slot| slot.borrow_mut().take())
}

/// Turn a panic in any inner layer or handler into a 500 carrying the request ID.
pub async fn recover_panics(req: Request, next: Next) -> Response {
    let request_id = RequestId::from_request(&req);

    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            PANICS_RECOVERED.inc();
            let stack = take_panic_stack().unwrap_or_default();
            log_panic(
                request_id.as_deref(),
                &panic_message(payload.as_ref()),
                &stack,
            );

            let err = ApiError::Internal("Internal server error".to_string());
            let status = err.status();
            let mut body = err.into_body();
            body.request_id = request_id;
            (status, Json(body)).into_response()
        }
    }
}

fn log_panic(request_id: Option<&str>, message: &str, stack: &str) {
    error!(
        request_id = request_id.unwrap_or_default(),
        error = %message,
        stack = %stack,
        "panic recovered"
    );
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

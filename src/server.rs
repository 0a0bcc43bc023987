use axum::{Router, middleware, routing::get};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::handlers::{api_index, health_handler, metrics_handler, not_found};
use crate::middleware::{log_request, rate_limit, recover_panics, request_id};
use crate::state::AppState;

/// Build the full application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .merge(api_v1())
        .fallback(not_found);

    with_middleware(routes, state)
}

// empty v1 group, real endpoints get added here
fn api_v1() -> Router<Arc<AppState>> {
    Router::new().route("/api/v1", get(api_index))
}

/// Wrap `routes` in the standard middleware stack.
///
/// Layers added last run first, so the request ID is assigned before
/// anything logs and the rate limiter runs inside panic recovery.
pub fn with_middleware(routes: Router<Arc<AppState>>, state: Arc<AppState>) -> Router {
    routes
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(middleware::from_fn(recover_panics))
        .layer(middleware::from_fn(log_request))
        .layer(middleware::from_fn(request_id))
        .with_state(state)
}

/// Serve `app` until `shutdown` resolves, then drain in-flight requests for at
/// most `shutdown_timeout`.
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    shutdown_timeout: Duration,
) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let mut server = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            let _ = stop_rx.await;
        })
        .await
    });

    tokio::select! {
        // server stopped on its own, nothing to drain
        res = &mut server => {
            return match res {
                Ok(inner) => inner.map_err(Error::from),
                Err(e) => Err(Error::Join(e.to_string())),
            };
        }
        _ = shutdown => {}
    }

    info!("Shutting down gracefully, draining in-flight requests...");
    let _ = stop_tx.send(());

    match tokio::time::timeout(shutdown_timeout, server).await {
        Ok(Ok(Ok(()))) => {
            info!("server stopped gracefully");
            Ok(())
        }
        Ok(Ok(Err(e))) => Err(e.into()),
        Ok(Err(e)) => Err(Error::Join(e.to_string())),
        Err(_) => {
            error!(
                timeout_secs = shutdown_timeout.as_secs(),
                "shutdown timeout exceeded, dropping remaining connections"
            );
            Err(Error::ShutdownTimeout(shutdown_timeout.as_secs()))
        }
    }
}

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

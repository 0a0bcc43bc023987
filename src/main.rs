use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use homelab_api::middleware::install_panic_hook;
use homelab_api::{
    AppState, Args, LogFormat, RateLimiter, Result, create_router, serve, shutdown_signal,
};

#[tokio::main]
async fn main() {
    // parse cli arguments
    let args = Args::parse();
    init_tracing(args.log_format);
    install_panic_hook();

    if let Err(e) = run(args).await {
        error!(error = %e, "server exited with error");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    // bad limiter config fails here, before the listener binds
    let limiter = RateLimiter::from_config(&args.rate_limit_config())?;
    let state = Arc::new(AppState::new(limiter, args.trust_proxy_headers));
    let app = create_router(state);

    let addr = args.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %addr,
        rate_limit = args.rate_limit,
        rate_window_minutes = args.rate_window_minutes,
        trust_proxy_headers = args.trust_proxy_headers,
        "server started"
    );

    serve(
        listener,
        app,
        shutdown_signal(),
        Duration::from_secs(args.shutdown_timeout),
    )
    .await
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("homelab_api=info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

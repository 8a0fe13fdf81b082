//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the axum router with the single command route
//! - Wire up request tracing
//! - Serve on a bound listener until Ctrl+C

use axum::{routing::any, Router};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::http::handler::handle_cmd;

/// Path of the command endpoint.
pub const CMD_ROUTE: &str = "/api/cmd";

/// Builds the application router.
///
/// Every method is routed to the handler so that non-POST requests get the
/// JSON error envelope instead of axum's 405.
pub fn router() -> Router {
    Router::new()
        .route(CMD_ROUTE, any(handle_cmd))
        .layer(TraceLayer::new_for_http())
}

/// Serves the router on `listener` with graceful shutdown on Ctrl+C.
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(address = %addr, route = CMD_ROUTE, "HTTP server starting");

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, stopping server..."),
        Err(e) => {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}

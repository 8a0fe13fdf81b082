//! kvproxy - HTTP to Key-Value Store Command Proxy
//!
//! Entry point: parses flags, sets up logging and serves `/api/cmd`.

use clap::Parser;
use kvproxy::config::Config;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Diagnostics go to stderr, verbosity from RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    info!(version = kvproxy::VERSION, "Starting kvproxy");

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Listening on {}", config.bind_address());

    kvproxy::http::serve(listener).await?;

    info!("Server shutdown complete");
    Ok(())
}

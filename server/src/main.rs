use std::sync::Arc;

use anyhow::{Context, Result};
use todo_core::MetricsRegistry;
use todo_server::{build_router, serve, shutdown_signal, AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,todo_server=debug,todo_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().context("Failed to load configuration")?;

    let state = AppState::new(Arc::new(MetricsRegistry::new()));
    let app = build_router(state, &config);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    tracing::info!(%addr, "listening");

    serve(listener, app, shutdown_signal(), config.shutdown_timeout)
        .await
        .context("Server error")?;

    tracing::info!("server stopped");
    Ok(())
}

//! Serve command implementation
//!
//! Opens the process-wide session and runs the HTTP API until Ctrl-C.

use crate::api;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::Telemetry;
use crate::session::Session;

use std::sync::Arc;
use tokio::net::TcpListener;

/// Execute the serve command
pub fn run_serve(config: &Config) -> Result<()> {
    let addr = config.server.bind_addr()?;
    let session = Arc::new(Session::open(&config.nvml.session_options())?);
    log::info!(
        "Session opened in {} mode with {} GPU(s)",
        session.mode(),
        session.device_count()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let app = api::router(Telemetry::new(Arc::clone(&session)), config.server.cors);

    let served = runtime.block_on(async move {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::Server(format!("Failed to bind to {}: {}", addr, e)))?;

        log::info!("Starting HTTP server on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::Server(format!("HTTP server failed: {}", e)))
    });

    // Let in-flight blocking queries finish before the session goes away
    drop(runtime);
    match Arc::try_unwrap(session) {
        Ok(session) => session.shutdown(),
        Err(_) => log::warn!("Session still referenced at exit; it will close on drop"),
    }

    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}

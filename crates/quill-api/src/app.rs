//! Application builder: wires router, middleware and state into an Axum app
//! and runs it until a shutdown signal arrives.

use std::time::Duration;

use axum::Router;
use tracing::{info, warn};

use quill_core::config::AppConfig;
use quill_core::error::{AppError, AppResult, ErrorKind};
use quill_database::connect_account_store;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the Quill server with the given configuration.
///
/// The account store is opened once before serving and closed after the
/// server has drained.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    info!(
        provider = %config.database.provider,
        "Connecting account store"
    );
    let store = connect_account_store(&config.database).await?;

    if !config.storage.cloud.is_configured() {
        warn!("Cloud image host has no credentials; /api/cloud-upload will fail");
    }

    let addr = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = AppState::new(config, store.clone()).await?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Configuration, format!("Failed to bind {addr}"), e)
    })?;

    info!("Quill server listening on {addr}");

    let (drain_tx, drain_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = drain_rx.await;
            })
            .await
    });

    let outcome = tokio::select! {
        joined = &mut server => joined,
        _ = shutdown_signal() => {
            let _ = drain_tx.send(());
            match tokio::time::timeout(grace, &mut server).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!(grace_seconds = grace.as_secs(), "Drain timed out, dropping open connections");
                    server.abort();
                    Ok(Ok(()))
                }
            }
        }
    };

    store.close().await;
    info!("Account store closed");

    match outcome {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(AppError::internal(format!("Server error: {e}"))),
        Err(e) => Err(AppError::internal(format!("Server task failed: {e}"))),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}

//! Lifecycle core demo daemon (ignitiond)
//!
//! Demonstrates the `bootstrap_init → run_bootstrap → run_finalizers`
//! three-call contract wired around a real `main`: parses flags, brings up
//! logging, runs every registered bootstrap initializer (including the
//! canonical thread-index-0 claim), serves a tiny HTTP surface until
//! interrupted, then runs finalizers on the way out.
//!
//! Default bind: 127.0.0.1:8871

mod api;
mod cli;
mod threads;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let mut flags = cli::Flags::parse();

    threads::register_main_thread_claim();

    let log_config = flags.log_config();
    let _logging_handle = ignition_core::facade::bootstrap_init(&mut flags, &log_config)?;

    info!("starting ignitiond");
    info!(version = env!("CARGO_PKG_VERSION"));

    ignition_core::facade::run_bootstrap();
    info!("bootstrap complete");

    let state = Arc::new(api::AppState::default());
    state.mark_bootstrapped();

    let app = api::create_router(state);
    let listener = tokio::net::TcpListener::bind(flags.bind).await?;
    info!(bind = %flags.bind, "ignitiond listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutting down, running finalizers");
    ignition_core::facade::run_finalizers();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

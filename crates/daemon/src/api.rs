//! HTTP surface: a health check and a status endpoint reporting whether
//! the lifecycle core has completed `run_bootstrap`.
//!
//! Deliberately thin — this crate exists to demonstrate
//! `bootstrap_init`/`run_bootstrap`/`run_finalizers` wired around a real
//! `main`, not to be a product surface in its own right.

use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state the handlers read from; set once `run_bootstrap` returns.
#[derive(Default)]
pub struct AppState {
    bootstrapped: AtomicBool,
}

impl AppState {
    pub fn mark_bootstrapped(&self) {
        self.bootstrapped.store(true, Ordering::Release);
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped.load(Ordering::Acquire)
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
}

#[derive(Serialize)]
struct StatusResponse {
    bootstrapped: bool,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

async fn status(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Json<StatusResponse> {
    Json(StatusResponse {
        bootstrapped: state.is_bootstrapped(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/status", get(status))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

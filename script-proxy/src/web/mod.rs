//! Web server module standing in for the hosting platform.
//!
//! This module exposes the proxy handler two ways:
//! - `POST /invoke`: platform-style invocation payload in, response object out
//! - any other path: a plain HTTP endpoint a browser can call directly
//!
//! `GET /health` is answered locally.

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{health, invoke, proxy, AppState, HealthResponse};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/invoke", post(invoke))
        .fallback(proxy)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

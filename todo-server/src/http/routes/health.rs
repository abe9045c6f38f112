//! Liveness check at `GET /health_check`
//!
//! Answers plain-text `OK` when the todo store responds, 503 otherwise.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Router};

use crate::http::server::AppState;

async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    match state.todos.ping().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::warn!(error = %e, "todo store unreachable");
            (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE")
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health_check", get(health_check))
}

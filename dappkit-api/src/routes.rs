//! API route configuration.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // IPFS
        .route("/api/ipfs/add", post(handlers::add_to_ipfs))
        .route("/api/ipfs/metadata", post(handlers::fetch_metadata))

        // Key lookup
        .route("/api/lookup/:key", get(handlers::lookup_key))

        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

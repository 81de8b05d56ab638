//! API route handlers.
//!
//! Each handler makes at most one call to its store and forwards the result.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use dappkit_core::types::{AddReceipt, ContentId, LookupKey};

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// POST /api/ipfs/add
///
/// Re-serializes the body and adds the resulting string; the store's receipt
/// is returned as-is.
pub async fn add_to_ipfs(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<AddReceipt>> {
    let Json(body) = payload?;

    let content = serde_json::to_string(&body)
        .map_err(|e| ApiError::bad_request(format!("Unserializable body: {}", e)))?;

    let receipt = state.content.add(content).await?;

    info!(cid = %receipt.cid, size = receipt.size, "Added to IPFS");
    Ok(Json(receipt))
}

/// POST /api/ipfs/metadata
pub async fn fetch_metadata(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<MetadataRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(req) = payload?;
    let cid = ContentId::parse(req.ipfs_hash)?;

    let metadata = state.content.fetch_metadata(&cid).await?;

    debug!(cid = %cid, "Fetched metadata");
    Ok(Json(metadata))
}

/// GET /api/lookup/:key
///
/// A missing key answers `{}` with 200, same as a found value.
pub async fn lookup_key(
    State(state): State<Arc<AppState>>,
    key: std::result::Result<Path<String>, PathRejection>,
) -> Result<Json<Value>> {
    let Path(key) = key?;
    let key = LookupKey::parse(key)?;

    let value = state.keys.get(&key).await?;

    debug!(key = %key, found = value.is_some(), "Lookup");
    Ok(Json(value.unwrap_or_else(|| json!({}))))
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        content_store: state.content.backend_name().into(),
        key_store: state.keys.backend_name().into(),
    })
}

//! DTOs for API requests and responses.
//!
//! The add endpoint takes any JSON value and answers with
//! [`dappkit_core::AddReceipt`]; the lookup endpoint answers with the stored
//! value. Only the shapes that are specific to this API live here.

use serde::{Deserialize, Serialize};

/// Request to fetch metadata from IPFS.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRequest {
    /// Content identifier of the metadata document
    pub ipfs_hash: String,
}

/// Response for the health check.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok"
    pub status: String,
    /// Crate version
    pub version: String,
    /// Seconds since the state was built
    pub uptime_seconds: u64,
    /// Content store backend name
    pub content_store: String,
    /// Key store backend name
    pub key_store: String,
}

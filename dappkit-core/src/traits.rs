//! Store traits.
//!
//! The handlers only ever talk to these two traits, so a real IPFS node, an
//! in-memory store, a static table, or a remote key-value service can be
//! injected at construction time.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{DappError, Result};
use crate::types::{AddReceipt, ContentId, LookupKey};

// ═══════════════════════════════════════════════════════════════════════════════
// CONTENT STORE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for content-addressable storage.
///
/// Implementations might use:
/// - An IPFS node's HTTP RPC API plus a gateway
/// - In-memory storage (for testing/development)
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Adds a string to the store and returns the store's receipt.
    async fn add(&self, content: String) -> Result<AddReceipt>;

    /// Returns the raw bytes stored under `cid`.
    async fn cat(&self, cid: &ContentId) -> Result<Vec<u8>>;

    /// Fetches the content under `cid` and decodes it as JSON.
    async fn fetch_metadata(&self, cid: &ContentId) -> Result<Value> {
        let bytes = self.cat(cid).await?;
        serde_json::from_slice(&bytes).map_err(|e| DappError::IpfsFetchFailed {
            cid: cid.to_string(),
            reason: format!("content is not JSON: {}", e),
        })
    }

    /// Short name of the backend, reported by the health endpoint.
    fn backend_name(&self) -> &'static str;
}

// ═══════════════════════════════════════════════════════════════════════════════
// KEY-VALUE STORE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Read-only interface for key lookups.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` when absent.
    async fn get(&self, key: &LookupKey) -> Result<Option<Value>>;

    /// Short name of the backend, reported by the health endpoint.
    fn backend_name(&self) -> &'static str;
}

//! In-memory content store.
//!
//! Identifiers are CIDv0-shaped (`Qm` + base58 sha2-256 multihash of the raw
//! bytes). They are stable within the process but do not match what an IPFS
//! node would assign, since no UnixFS wrapping is applied.

use async_trait::async_trait;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use dappkit_core::constants::SHA2_256_MULTIHASH_PREFIX;
use dappkit_core::error::{DappError, Result};
use dappkit_core::traits::ContentStore;
use dappkit_core::types::{AddReceipt, ContentId};

/// Process-local content store.
///
/// Thread-safe; adding the same bytes twice yields the same identifier.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    blobs: DashMap<String, Vec<u8>>,
}

impl MemoryContentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` under an explicit identifier, bypassing hashing.
    pub fn insert(&self, cid: &ContentId, data: impl Into<Vec<u8>>) {
        self.blobs.insert(cid.to_string(), data.into());
    }

    /// Returns the number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Computes the identifier `add` would assign to `data`.
    pub fn content_id(data: &[u8]) -> String {
        let digest = Sha256::digest(data);
        let mut multihash = Vec::with_capacity(SHA2_256_MULTIHASH_PREFIX.len() + digest.len());
        multihash.extend_from_slice(&SHA2_256_MULTIHASH_PREFIX);
        multihash.extend_from_slice(&digest);
        bs58::encode(multihash).into_string()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    #[instrument(skip(self, content), fields(len = content.len()))]
    async fn add(&self, content: String) -> Result<AddReceipt> {
        let bytes = content.into_bytes();
        let cid = Self::content_id(&bytes);
        let size = bytes.len() as u64;

        self.blobs.insert(cid.clone(), bytes);

        debug!(cid = %cid, size, "Stored in memory");
        Ok(AddReceipt::new(cid, size))
    }

    async fn cat(&self, cid: &ContentId) -> Result<Vec<u8>> {
        self.blobs
            .get(cid.as_str())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DappError::ContentNotFound(cid.to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_id_is_cid_v0_shaped() {
        let cid = MemoryContentStore::content_id(br#"{"a":1}"#);
        assert!(cid.starts_with("Qm"));
        assert!(ContentId::parse(cid).unwrap().is_v0());
    }

    #[tokio::test]
    async fn test_add_then_fetch() {
        let store = MemoryContentStore::new();

        let receipt = store.add(r#"{"a":1}"#.into()).await.unwrap();
        assert_eq!(receipt.size, 7);
        assert_eq!(receipt.path, receipt.cid);

        let cid = ContentId::parse(receipt.cid).unwrap();
        let metadata = store.fetch_metadata(&cid).await.unwrap();
        assert_eq!(metadata, json!({ "a": 1 }));
    }

    #[tokio::test]
    async fn test_add_is_deterministic() {
        let store = MemoryContentStore::new();

        let first = store.add("same".into()).await.unwrap();
        let second = store.add("same".into()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_cid() {
        let store = MemoryContentStore::new();
        let cid = ContentId::parse("QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG").unwrap();

        let err = store.cat(&cid).await.unwrap_err();
        assert!(matches!(err, DappError::ContentNotFound(_)));
    }

    #[tokio::test]
    async fn test_insert_explicit_cid() {
        let store = MemoryContentStore::new();
        let cid = ContentId::parse("abc123").unwrap();
        store.insert(&cid, br#"{"name":"seeded"}"#.to_vec());

        let metadata = store.fetch_metadata(&cid).await.unwrap();
        assert_eq!(metadata["name"], "seeded");
    }

    #[tokio::test]
    async fn test_concurrent_add() {
        use std::sync::Arc;
        use tokio::task::JoinSet;

        let store = Arc::new(MemoryContentStore::new());
        let mut tasks = JoinSet::new();

        for i in 0..50u32 {
            let store = store.clone();
            tasks.spawn(async move { store.add(format!("{{\"id\":{}}}", i)).await.unwrap() });
        }

        while let Some(result) = tasks.join_next().await {
            result.unwrap();
        }

        assert_eq!(store.len(), 50);
    }
}

//! Error types for dappkit.
//!
//! Every failure of an external collaborator (IPFS node, gateway, key-value
//! store) surfaces as a `DappError` so callers can decide how to map it.

use thiserror::Error;

/// Result type alias using `DappError`.
pub type Result<T> = std::result::Result<T, DappError>;

/// Main error type for all dappkit operations.
#[derive(Debug, Error)]
pub enum DappError {
    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Identifier is not a usable content identifier.
    #[error("Invalid IPFS CID: {0}")]
    InvalidContentId(String),

    /// Lookup key is empty or otherwise unusable.
    #[error("Invalid lookup key: {0}")]
    InvalidKey(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // IPFS ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The content store rejected an add.
    #[error("IPFS add failed: {0}")]
    IpfsAddFailed(String),

    /// The content store could not return the content for a CID.
    #[error("IPFS fetch failed for CID '{cid}': {reason}")]
    IpfsFetchFailed {
        /// Requested identifier
        cid: String,
        /// What went wrong
        reason: String,
    },

    /// No content is stored under the CID.
    #[error("Content not found: {0}")]
    ContentNotFound(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // KEY-VALUE STORE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The key-value store answered with an error.
    #[error("Key-value store error: {0}")]
    KvStoreError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // NETWORK ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION & STORAGE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DappError {
    /// Returns true if the failure came from an external collaborator.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            DappError::IpfsAddFailed(_)
                | DappError::IpfsFetchFailed { .. }
                | DappError::ContentNotFound(_)
                | DappError::KvStoreError(_)
                | DappError::HttpError(_)
        )
    }

    /// Returns true if the caller supplied bad input.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            DappError::InvalidContentId(_) | DappError::InvalidKey(_)
        )
    }
}

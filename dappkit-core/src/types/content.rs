//! Content identifiers and add receipts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{CID_V0_LENGTH, CID_V1_MIN_LENGTH};
use crate::error::{DappError, Result};

/// A validated content identifier.
///
/// Only the shape is checked: CIDv0 (`Qm...`) must be exactly 46 characters,
/// CIDv1 (`bafy...`/`bafk...`) at least 50, anything else plain ASCII
/// alphanumerics. Whether the content exists is up to the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId(String);

impl ContentId {
    /// Validates and wraps an identifier.
    pub fn parse(cid: impl Into<String>) -> Result<Self> {
        let cid = cid.into();

        if cid.is_empty() {
            return Err(DappError::InvalidContentId("CID cannot be empty".into()));
        }

        if cid.starts_with("Qm") {
            if cid.len() != CID_V0_LENGTH {
                return Err(DappError::InvalidContentId(format!(
                    "Invalid CIDv0 length: expected {}, got {}",
                    CID_V0_LENGTH,
                    cid.len()
                )));
            }
        } else if cid.starts_with("bafy") || cid.starts_with("bafk") {
            if cid.len() < CID_V1_MIN_LENGTH {
                return Err(DappError::InvalidContentId(format!(
                    "CIDv1 too short: {}",
                    cid.len()
                )));
            }
        }

        if !cid.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DappError::InvalidContentId(
                "CID contains invalid characters".into(),
            ));
        }

        Ok(Self(cid))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for a base58 CIDv0.
    pub fn is_v0(&self) -> bool {
        self.0.starts_with("Qm")
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ContentId {
    type Error = DappError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<ContentId> for String {
    fn from(cid: ContentId) -> Self {
        cid.0
    }
}

impl AsRef<str> for ContentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Result of adding content to a content-addressable store.
///
/// Field names follow what IPFS client libraries hand back for an add, so the
/// receipt can be forwarded to callers unmodified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddReceipt {
    /// Path of the added entry (equal to the CID for a single blob)
    pub path: String,
    /// Content identifier of the added data
    pub cid: String,
    /// Size reported by the store, in bytes
    pub size: u64,
}

impl AddReceipt {
    /// Receipt for a single blob, whose path is its CID.
    pub fn new(cid: impl Into<String>, size: u64) -> Self {
        let cid = cid.into();
        Self {
            path: cid.clone(),
            cid,
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG" ; "cid v0")]
    #[test_case("bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi" ; "cid v1 dag-pb")]
    #[test_case("bafkreihdwdcefgh4dqkjv67uzcmw7ojee6xedzdetojuzjevtenxquvyku" ; "cid v1 raw")]
    #[test_case("abc123" ; "plain alphanumeric")]
    fn test_valid_cids(cid: &str) {
        let parsed = ContentId::parse(cid).unwrap();
        assert_eq!(parsed.as_str(), cid);
    }

    #[test_case("" ; "empty")]
    #[test_case("Qm123" ; "short v0")]
    #[test_case("bafybeig" ; "short v1")]
    #[test_case("../etc/passwd" ; "path characters")]
    #[test_case("Qm/YwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbd" ; "v0 length with slash")]
    fn test_invalid_cids(cid: &str) {
        assert!(matches!(
            ContentId::parse(cid),
            Err(DappError::InvalidContentId(_))
        ));
    }

    #[test]
    fn test_cid_version() {
        let v0 = ContentId::parse("QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG").unwrap();
        assert!(v0.is_v0());

        let v1 = ContentId::parse("bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi").unwrap();
        assert!(!v1.is_v0());
    }

    #[test]
    fn test_cid_serde_validates() {
        let ok: ContentId = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(ok.to_string(), "abc123");

        let bad: std::result::Result<ContentId, _> = serde_json::from_str("\"Qm123\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_receipt_shape() {
        let receipt = AddReceipt::new("QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG", 7);
        let json = serde_json::to_value(&receipt).unwrap();

        assert_eq!(json["path"], json["cid"]);
        assert_eq!(json["size"], 7);
    }
}

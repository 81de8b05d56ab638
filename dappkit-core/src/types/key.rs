//! Lookup keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::NAMESPACE_SEPARATOR;
use crate::error::{DappError, Result};

/// Key for the lookup endpoint.
///
/// Any non-empty string is accepted; keys are usually addresses or token
/// ids such as `0x1`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LookupKey(String);

impl LookupKey {
    /// Validates and wraps a key.
    pub fn parse(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(DappError::InvalidKey("key cannot be empty".into()));
        }
        Ok(Self(key))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the key as stored in an external store: `namespace:key`, or
    /// the bare key without a namespace.
    pub fn namespaced(&self, namespace: Option<&str>) -> String {
        match namespace.filter(|ns| !ns.is_empty()) {
            Some(ns) => format!("{}{}{}", ns, NAMESPACE_SEPARATOR, self.0),
            None => self.0.clone(),
        }
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LookupKey {
    type Error = DappError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<LookupKey> for String {
    fn from(key: LookupKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_key_rejected() {
        assert!(LookupKey::parse("").is_err());
        assert!(LookupKey::parse("   ").is_err());
    }

    #[test]
    fn test_namespacing() {
        let key = LookupKey::parse("0x1").unwrap();
        assert_eq!(key.namespaced(Some("nft")), "nft:0x1");
        assert_eq!(key.namespaced(Some("")), "0x1");
        assert_eq!(key.namespaced(None), "0x1");
    }

    proptest! {
        #[test]
        fn prop_namespaced_key_ends_with_key(key in "[a-zA-Z0-9]{1,40}", ns in "[a-z]{1,10}") {
            let parsed = LookupKey::parse(key.clone()).unwrap();
            let stored = parsed.namespaced(Some(&ns));
            prop_assert!(stored.starts_with(&ns));
            prop_assert!(stored.ends_with(&key));
            prop_assert_eq!(stored.len(), ns.len() + 1 + key.len());
        }
    }
}

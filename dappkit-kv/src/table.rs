//! Static lookup table.
//!
//! Populated once (in code or from a JSON object file) and read-only
//! afterwards, so lookups need no locking.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, instrument};

use dappkit_core::error::{DappError, Result};
use dappkit_core::traits::KeyValueStore;
use dappkit_core::types::LookupKey;

/// Read-only in-process lookup table.
#[derive(Clone, Debug, Default)]
pub struct StaticTable {
    entries: HashMap<String, Value>,
}

impl StaticTable {
    /// Creates an empty table; every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from an existing map.
    pub fn from_map(entries: HashMap<String, Value>) -> Self {
        Self { entries }
    }

    /// Parses a JSON object whose top-level keys are the lookup keys.
    pub fn from_json_str(json: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(map) => Ok(Self {
                entries: map.into_iter().collect(),
            }),
            other => Err(DappError::ConfigError(format!(
                "lookup table must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Loads a table from a JSON object file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await?;
        let table = Self::from_json_str(&contents)?;

        info!(path = %path.display(), entries = table.len(), "Loaded lookup table");
        Ok(table)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for StaticTable {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[async_trait]
impl KeyValueStore for StaticTable {
    #[instrument(skip(self, key), fields(key = %key))]
    async fn get(&self, key: &LookupKey) -> Result<Option<Value>> {
        let value = self.entries.get(key.as_str()).cloned();
        debug!(hit = value.is_some(), "Table lookup");
        Ok(value)
    }

    fn backend_name(&self) -> &'static str {
        "static"
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//! Key-value store reached over a Redis-over-HTTP API.
//!
//! Speaks the Upstash REST protocol that Vercel KV also exposes:
//! `GET {url}/get/{key}` with a bearer token, answered with
//! `{"result": <string|null>}` or `{"error": "..."}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use dappkit_core::constants::DEFAULT_REQUEST_TIMEOUT_SECS;
use dappkit_core::error::{DappError, Result};
use dappkit_core::traits::KeyValueStore;
use dappkit_core::types::LookupKey;

/// REST key-value store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RestKvConfig {
    /// REST endpoint (e.g. "https://eu1-fine-cat-12345.upstash.io")
    pub url: String,
    /// Bearer token
    pub token: String,
    /// Prefix applied to every key (`namespace:key`)
    pub namespace: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl RestKvConfig {
    /// Creates config for an endpoint and token, without a namespace.
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            namespace: None,
            timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// Stores keys under `namespace:`.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// Read-only client for a REST key-value store.
pub struct RestKvStore {
    config: RestKvConfig,
    base: Url,
    http_client: reqwest::Client,
}

impl RestKvStore {
    /// Creates a client with the given config.
    pub fn with_config(config: RestKvConfig) -> Result<Self> {
        let base = Url::parse(config.url.trim())
            .map_err(|e| DappError::ConfigError(format!("Invalid KV URL '{}': {}", config.url, e)))?;
        if base.cannot_be_a_base() {
            return Err(DappError::ConfigError(format!(
                "KV URL cannot be a base: {}",
                config.url
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| DappError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            base,
            http_client,
        })
    }

    /// Returns the client's configuration.
    pub fn config(&self) -> &RestKvConfig {
        &self.config
    }

    fn get_url(&self, stored_key: &str) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| DappError::ConfigError("KV URL cannot be a base".into()))?
            .pop_if_empty()
            .push("get")
            .push(stored_key);
        Ok(url)
    }
}

#[async_trait]
impl KeyValueStore for RestKvStore {
    #[instrument(skip(self, key), fields(key = %key))]
    async fn get(&self, key: &LookupKey) -> Result<Option<Value>> {
        let stored_key = key.namespaced(self.config.namespace.as_deref());
        let url = self.get_url(&stored_key)?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| DappError::HttpError(e.to_string()))?;

        let status = response.status();
        let body: RestResponse = response
            .json()
            .await
            .map_err(|e| DappError::KvStoreError(format!("HTTP {}: {}", status, e)))?;

        if let Some(error) = body.error {
            return Err(DappError::KvStoreError(error));
        }
        if !status.is_success() {
            return Err(DappError::KvStoreError(format!("HTTP {}", status)));
        }

        let value = decode_result(body.result);
        debug!(stored_key = %stored_key, hit = value.is_some(), "KV lookup");
        Ok(value)
    }

    fn backend_name(&self) -> &'static str {
        "rest-kv"
    }
}

#[derive(Debug, Deserialize)]
struct RestResponse {
    #[serde(default)]
    result: Value,
    error: Option<String>,
}

/// Values are written JSON-encoded, so string results that parse as JSON are
/// returned decoded; plain strings are returned as strings. A stored JSON
/// `null` counts as absent.
fn decode_result(result: Value) -> Option<Value> {
    let decoded = match result {
        Value::String(raw) => serde_json::from_str(&raw).unwrap_or(Value::String(raw)),
        other => other,
    };
    (!decoded.is_null()).then_some(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{bearer_token, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn key(k: &str) -> LookupKey {
        LookupKey::parse(k).unwrap()
    }

    #[test]
    fn test_decode_result() {
        assert_eq!(decode_result(Value::Null), None);
        assert_eq!(
            decode_result(json!(r#"{"tier":"gold"}"#)),
            Some(json!({ "tier": "gold" }))
        );
        assert_eq!(decode_result(json!("plain")), Some(json!("plain")));
        assert_eq!(decode_result(json!(42)), Some(json!(42)));
        assert_eq!(decode_result(json!("null")), None);
    }

    #[test]
    fn test_invalid_url() {
        assert!(RestKvStore::with_config(RestKvConfig::new("not a url", "t")).is_err());
        assert!(RestKvStore::with_config(RestKvConfig::new("mailto:kv@example.com", "t")).is_err());
    }

    #[tokio::test]
    async fn test_namespaced_get() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get/nft:0x1"))
            .and(bearer_token("secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": r#"{"name":"Token #1"}"#
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = RestKvConfig::new(server.uri(), "secret").with_namespace("nft");
        let store = RestKvStore::with_config(config).unwrap();

        let value = store.get(&key("0x1")).await.unwrap();
        assert_eq!(value, Some(json!({ "name": "Token #1" })));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get/0x1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
            .mount(&server)
            .await;

        let store = RestKvStore::with_config(RestKvConfig::new(server.uri(), "secret")).unwrap();
        assert_eq!(store.get(&key("0x1")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "WRONGPASS invalid password"
            })))
            .mount(&server)
            .await;

        let store = RestKvStore::with_config(RestKvConfig::new(server.uri(), "bad")).unwrap();
        let err = store.get(&key("0x1")).await.unwrap_err();
        assert!(matches!(err, DappError::KvStoreError(ref msg) if msg.contains("WRONGPASS")));
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_unreachable_store() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let store = RestKvStore::with_config(RestKvConfig::new(uri, "secret").with_timeout(2)).unwrap();
        let err = store.get(&key("0x1")).await.unwrap_err();
        assert!(err.is_upstream());
    }
}

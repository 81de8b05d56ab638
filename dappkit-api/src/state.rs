//! App state: content store, key store, config.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use dappkit_core::constants::{
    DEFAULT_IPFS_GATEWAY_URL, DEFAULT_MAX_BODY_BYTES, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use dappkit_core::error::Result;
use dappkit_core::traits::{ContentStore, KeyValueStore};
use dappkit_ipfs::{IpfsClient, IpfsConfig, MemoryContentStore};
use dappkit_kv::{RestKvConfig, RestKvStore, StaticTable};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// IPFS RPC API; `None` keeps content in memory
    pub ipfs_api_url: Option<String>,
    /// Gateway used for metadata fetches
    pub ipfs_gateway_url: String,
    /// Project id for the IPFS RPC API
    pub ipfs_project_id: Option<String>,
    /// Project secret for the IPFS RPC API
    pub ipfs_project_secret: Option<String>,
    /// Timeout for outbound requests, in seconds
    pub request_timeout_seconds: u64,
    /// External key-value store endpoint
    pub kv_rest_url: Option<String>,
    /// External key-value store token
    pub kv_rest_token: Option<String>,
    /// Prefix for keys in the external store
    pub kv_namespace: Option<String>,
    /// JSON object file backing the static lookup table
    pub lookup_table_path: Option<PathBuf>,
    /// Largest accepted request body, in bytes
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            ipfs_api_url: None,
            ipfs_gateway_url: DEFAULT_IPFS_GATEWAY_URL.into(),
            ipfs_project_id: None,
            ipfs_project_secret: None,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
            kv_rest_url: None,
            kv_rest_token: None,
            kv_namespace: None,
            lookup_table_path: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ApiConfig {
    /// Reads configuration from the environment, loading `.env` first.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            ipfs_api_url: var("IPFS_API_URL"),
            ipfs_gateway_url: var("IPFS_GATEWAY_URL")
                .unwrap_or_else(|| DEFAULT_IPFS_GATEWAY_URL.into()),
            ipfs_project_id: var("IPFS_PROJECT_ID"),
            ipfs_project_secret: var("IPFS_PROJECT_SECRET"),
            request_timeout_seconds: positive_or(
                var("IPFS_TIMEOUT_SECONDS"),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
            kv_rest_url: var("KV_REST_API_URL"),
            kv_rest_token: var("KV_REST_API_TOKEN"),
            kv_namespace: var("KV_NAMESPACE"),
            lookup_table_path: var("LOOKUP_TABLE_PATH").map(PathBuf::from),
            max_body_bytes: positive_or(var("MAX_BODY_BYTES"), DEFAULT_MAX_BODY_BYTES),
        }
    }

    /// Builds the configured content store.
    pub fn content_store(&self) -> Result<Arc<dyn ContentStore>> {
        let Some(api_url) = &self.ipfs_api_url else {
            return Ok(Arc::new(MemoryContentStore::new()));
        };

        let mut ipfs = IpfsConfig::new(api_url)
            .with_gateway(&self.ipfs_gateway_url)
            .with_timeout(self.request_timeout_seconds);
        if let Some(id) = &self.ipfs_project_id {
            ipfs = ipfs.with_credentials(id, self.ipfs_project_secret.clone().unwrap_or_default());
        }

        Ok(Arc::new(IpfsClient::with_config(ipfs)?))
    }

    /// Builds the configured key store: the REST store when a URL is set,
    /// else the table file, else an empty table.
    pub async fn key_store(&self) -> Result<Arc<dyn KeyValueStore>> {
        if let Some(url) = &self.kv_rest_url {
            let mut kv = RestKvConfig::new(url, self.kv_rest_token.clone().unwrap_or_default())
                .with_timeout(self.request_timeout_seconds);
            if let Some(ns) = &self.kv_namespace {
                kv = kv.with_namespace(ns);
            }
            return Ok(Arc::new(RestKvStore::with_config(kv)?));
        }

        match &self.lookup_table_path {
            Some(path) => Ok(Arc::new(StaticTable::from_file(path).await?)),
            None => Ok(Arc::new(StaticTable::new())),
        }
    }
}

/// Shared state handed to every handler.
pub struct AppState {
    /// Server configuration
    pub config: ApiConfig,
    /// Backend for the IPFS handlers
    pub content: Arc<dyn ContentStore>,
    /// Backend for the lookup handler
    pub keys: Arc<dyn KeyValueStore>,
    /// When the state was built, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Creates state around already-built stores.
    pub fn new(
        config: ApiConfig,
        content: Arc<dyn ContentStore>,
        keys: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            config,
            content,
            keys,
            started_at: Instant::now(),
        }
    }

    /// Builds both stores from the configuration.
    pub async fn from_config(config: ApiConfig) -> Result<Self> {
        let content = config.content_store()?;
        let keys = config.key_store().await?;

        info!(
            content_store = content.backend_name(),
            key_store = keys.backend_name(),
            "Backends configured"
        );

        Ok(Self::new(config, content, keys))
    }
}

/// Parses a numeric setting; zero or unparsable values fall back to `default`.
fn positive_or<T>(raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + Default + PartialEq,
{
    raw.and_then(|v| v.trim().parse().ok())
        .filter(|v| *v != T::default())
        .unwrap_or(default)
}

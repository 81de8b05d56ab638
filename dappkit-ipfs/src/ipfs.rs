//! IPFS client implementation.
//!
//! Adds go through the node's HTTP RPC API (`/api/v0/add`), optionally behind
//! project credentials. Reads go through a gateway (`/ipfs/{cid}`).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use dappkit_core::constants::{DEFAULT_IPFS_GATEWAY_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use dappkit_core::error::{DappError, Result};
use dappkit_core::traits::ContentStore;
use dappkit_core::types::{AddReceipt, ContentId};

/// IPFS client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IpfsConfig {
    /// HTTP RPC API base (e.g. "https://ipfs.infura.io:5001")
    pub api_url: String,
    /// Gateway used for reads (e.g. "https://ipfs.io")
    pub gateway_url: String,
    /// Project id, sent as the basic-auth user
    pub project_id: Option<String>,
    /// Project secret, sent as the basic-auth password
    pub project_secret: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl IpfsConfig {
    /// Creates config for an RPC API, reading through the public gateway.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            gateway_url: DEFAULT_IPFS_GATEWAY_URL.into(),
            project_id: None,
            project_secret: None,
            timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// Reads through a different gateway.
    pub fn with_gateway(mut self, gateway_url: impl Into<String>) -> Self {
        self.gateway_url = gateway_url.into();
        self
    }

    /// Adds project credentials for the RPC API.
    pub fn with_credentials(
        mut self,
        project_id: impl Into<String>,
        project_secret: impl Into<String>,
    ) -> Self {
        self.project_id = Some(project_id.into());
        self.project_secret = Some(project_secret.into());
        self
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// IPFS client for add/cat operations.
pub struct IpfsClient {
    config: IpfsConfig,
    api_base: Url,
    gateway_base: Url,
    http_client: reqwest::Client,
}

impl IpfsClient {
    /// Creates a new IPFS client with the given config.
    pub fn with_config(config: IpfsConfig) -> Result<Self> {
        let api_base = parse_base_url(&config.api_url)?;
        let gateway_base = parse_base_url(&config.gateway_url)?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| DappError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            api_base,
            gateway_base,
            http_client,
        })
    }

    /// Returns the client's configuration.
    pub fn config(&self) -> &IpfsConfig {
        &self.config
    }

    fn endpoint(base: &Url, path: &str) -> Result<Url> {
        base.join(path)
            .map_err(|e| DappError::ConfigError(format!("Invalid endpoint '{}': {}", path, e)))
    }
}

#[async_trait]
impl ContentStore for IpfsClient {
    /// Adds `content` as a single file and pins it.
    #[instrument(skip(self, content), fields(len = content.len()))]
    async fn add(&self, content: String) -> Result<AddReceipt> {
        let mut url = Self::endpoint(&self.api_base, "api/v0/add")?;
        url.query_pairs_mut().append_pair("pin", "true");

        let form = reqwest::multipart::Form::new()
            .part("file", reqwest::multipart::Part::text(content));

        let mut request = self.http_client.post(url).multipart(form);
        if let Some(ref id) = self.config.project_id {
            request = request.basic_auth(id, self.config.project_secret.as_ref());
        }

        let response = request
            .send()
            .await
            .map_err(|e| DappError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DappError::IpfsAddFailed(format!(
                "Add failed with status {}: {}",
                status, text
            )));
        }

        let json: KuboAddResponse = response
            .json()
            .await
            .map_err(|e| DappError::IpfsAddFailed(e.to_string()))?;

        let receipt = json.into_receipt()?;
        debug!(cid = %receipt.cid, size = receipt.size, "Added to IPFS");
        Ok(receipt)
    }

    #[instrument(skip(self, cid), fields(cid = %cid))]
    async fn cat(&self, cid: &ContentId) -> Result<Vec<u8>> {
        let url = Self::endpoint(&self.gateway_base, &format!("ipfs/{}", cid))?;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| DappError::HttpError(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DappError::ContentNotFound(cid.to_string()));
        }
        if !status.is_success() {
            return Err(DappError::IpfsFetchFailed {
                cid: cid.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        debug!("Fetched from gateway");
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| DappError::HttpError(e.to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "ipfs-http"
    }
}

/// Parses a base URL, defaulting to https and forcing a trailing slash so
/// relative endpoints join under it.
fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(DappError::ConfigError("URL cannot be empty".into()));
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        format!("{}/", trimmed)
    } else {
        format!("https://{}/", trimmed)
    };

    Url::parse(&with_scheme)
        .map_err(|e| DappError::ConfigError(format!("Invalid URL '{}': {}", raw, e)))
}

/// Body of a Kubo `/api/v0/add` response. `Size` arrives as a string.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct KuboAddResponse {
    #[serde(default)]
    name: String,
    hash: String,
    size: String,
}

impl KuboAddResponse {
    fn into_receipt(self) -> Result<AddReceipt> {
        let size = self
            .size
            .parse::<u64>()
            .map_err(|e| DappError::IpfsAddFailed(format!("Invalid size '{}': {}", self.size, e)))?;

        let path = if self.name.is_empty() {
            self.hash.clone()
        } else {
            self.name
        };

        Ok(AddReceipt {
            path,
            cid: self.hash,
            size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{basic_auth, body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CID: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";

    fn client_for(server: &MockServer) -> IpfsClient {
        let config = IpfsConfig::new(server.uri()).with_gateway(server.uri());
        IpfsClient::with_config(config).unwrap()
    }

    #[test]
    fn test_parse_base_url() {
        assert_eq!(
            parse_base_url("ipfs.io").unwrap().as_str(),
            "https://ipfs.io/"
        );
        assert_eq!(
            parse_base_url("http://127.0.0.1:5001/").unwrap().as_str(),
            "http://127.0.0.1:5001/"
        );
        assert!(parse_base_url("").is_err());
    }

    #[test]
    fn test_config_builders() {
        let config = IpfsConfig::new("https://ipfs.infura.io:5001")
            .with_gateway("https://gateway.example.com")
            .with_credentials("project", "secret")
            .with_timeout(5);

        assert_eq!(config.gateway_url, "https://gateway.example.com");
        assert_eq!(config.project_id.as_deref(), Some("project"));
        assert_eq!(config.project_secret.as_deref(), Some("secret"));
        assert_eq!(config.timeout_seconds, 5);
    }

    #[tokio::test]
    async fn test_add_returns_receipt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/add"))
            .and(query_param("pin", "true"))
            .and(body_string_contains(r#"{"a":1}"#))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Name": CID,
                "Hash": CID,
                "Size": "15"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let receipt = client_for(&server).add(r#"{"a":1}"#.into()).await.unwrap();
        assert_eq!(receipt, AddReceipt::new(CID, 15));
    }

    #[tokio::test]
    async fn test_add_sends_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/add"))
            .and(basic_auth("project", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Hash": CID,
                "Size": "3"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = IpfsConfig::new(server.uri()).with_credentials("project", "secret");
        let client = IpfsClient::with_config(config).unwrap();

        let receipt = client.add("abc".into()).await.unwrap();
        assert_eq!(receipt.path, CID);
    }

    #[tokio::test]
    async fn test_add_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/add"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let err = client_for(&server).add("{}".into()).await.unwrap_err();
        assert!(matches!(err, DappError::IpfsAddFailed(ref msg) if msg.contains("401")));
    }

    #[tokio::test]
    async fn test_fetch_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/ipfs/{}", CID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Token #1",
                "image": "ipfs://QmImage"
            })))
            .mount(&server)
            .await;

        let cid = ContentId::parse(CID).unwrap();
        let metadata = client_for(&server).fetch_metadata(&cid).await.unwrap();
        assert_eq!(metadata["name"], "Token #1");
    }

    #[tokio::test]
    async fn test_cat_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let cid = ContentId::parse(CID).unwrap();
        let err = client_for(&server).cat(&cid).await.unwrap_err();
        assert!(matches!(err, DappError::ContentNotFound(_)));
    }

    #[tokio::test]
    async fn test_cat_gateway_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(504))
            .mount(&server)
            .await;

        let cid = ContentId::parse(CID).unwrap();
        let err = client_for(&server).cat(&cid).await.unwrap_err();
        assert!(matches!(err, DappError::IpfsFetchFailed { .. }));
        assert!(err.is_upstream());
    }
}

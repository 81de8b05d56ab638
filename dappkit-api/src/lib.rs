//! # dappkit API Server
//!
//! REST API for the dApp starter kit, consumed by the Next.js frontend.
//!
//! ## Endpoints
//!
//! - `POST /api/ipfs/add` - Add any JSON body to IPFS, returns the add receipt
//! - `POST /api/ipfs/metadata` - Fetch a JSON document by `ipfsHash`
//! - `GET /api/lookup/:key` - Look a key up, `{}` when absent
//! - `GET /health` - Liveness and configured backends
//!
//! ## Example
//!
//! ```rust,ignore
//! use dappkit_api::{ApiServer, ApiConfig};
//!
//! let server = ApiServer::from_config(ApiConfig::from_env()).await?;
//! server.run(([0, 0, 0, 0], 3001)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod routes;
mod handlers;
mod state;
mod dto;
mod error;

pub use routes::create_router;
pub use state::{AppState, ApiConfig};
pub use error::ApiError;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use dappkit_core::error::Result;

/// API server for dappkit.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a server around prepared state.
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Builds the stores named by `config` and creates the server.
    pub async fn from_config(config: ApiConfig) -> Result<Self> {
        Ok(Self::new(AppState::from_config(config).await?))
    }

    /// Creates the router with all routes configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("dappkit API server listening on {}", addr);

        axum::serve(listener, self.router()).await
    }
}

//! IPFS content stores for dappkit.
//!
//! - [`IpfsClient`]: adds through a Kubo-compatible HTTP RPC API and reads
//!   through a gateway
//! - [`MemoryContentStore`]: process-local store for development and tests

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod ipfs;
mod memory;

pub use ipfs::{IpfsClient, IpfsConfig};
pub use memory::MemoryContentStore;

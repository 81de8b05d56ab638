//! # dappkit Core
//!
//! Core types, errors, and traits shared by every dappkit crate.
//!
//! - **Types**: Content identifiers, add receipts, lookup keys
//! - **Errors**: A single error enum with upstream/validation classification
//! - **Constants**: Defaults for gateways, timeouts, and body limits
//! - **Traits**: The two external collaborators, `ContentStore` and `KeyValueStore`
//!
//! ## Example
//!
//! ```rust
//! use dappkit_core::{ContentId, LookupKey};
//!
//! let cid = ContentId::parse("QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG").unwrap();
//! assert!(cid.is_v0());
//!
//! let key = LookupKey::parse("0x1").unwrap();
//! assert_eq!(key.namespaced(Some("nft")), "nft:0x1");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{DappError, Result};
pub use traits::*;
pub use types::*;

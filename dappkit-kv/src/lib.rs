//! # dappkit KV
//!
//! Read-only key lookup backends.
//!
//! - **Static**: an in-process table, built in code or loaded from a JSON
//!   object file
//! - **REST**: an external Redis-over-HTTP store, queried under a namespaced key
//!
//! ## Example
//!
//! ```rust,ignore
//! use dappkit_kv::StaticTable;
//!
//! let table = StaticTable::from_file("lookup.json").await?;
//! let value = table.get(&LookupKey::parse("0x1")?).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod rest;
mod table;

pub use rest::{RestKvConfig, RestKvStore};
pub use table::StaticTable;

// Re-export the trait from core
pub use dappkit_core::traits::KeyValueStore;

//! Domain types for dappkit.
//!
//! - `content`: Content identifiers and add receipts
//! - `key`: Lookup keys and namespacing

mod content;
mod key;

pub use content::*;
pub use key::*;

//! Defaults shared by the clients, the API server, and the CLI.

// ═══════════════════════════════════════════════════════════════════════════════
// IPFS
// ═══════════════════════════════════════════════════════════════════════════════

/// Public gateway used for metadata fetches when none is configured.
pub const DEFAULT_IPFS_GATEWAY_URL: &str = "https://ipfs.io";

/// Timeout applied to every outbound HTTP request, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Length of a base58 CIDv0 (`Qm...`).
pub const CID_V0_LENGTH: usize = 46;

/// Shortest accepted base32 CIDv1 (`bafy...`, `bafk...`).
pub const CID_V1_MIN_LENGTH: usize = 50;

/// Multihash prefix for sha2-256 with a 32 byte digest.
pub const SHA2_256_MULTIHASH_PREFIX: [u8; 2] = [0x12, 0x20];

// ═══════════════════════════════════════════════════════════════════════════════
// KEY-VALUE STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// Separator between the namespace and the key in an external store.
pub const NAMESPACE_SEPARATOR: char = ':';

// ═══════════════════════════════════════════════════════════════════════════════
// API
// ═══════════════════════════════════════════════════════════════════════════════

/// Default port for the API server.
pub const DEFAULT_API_PORT: u16 = 3001;

/// Largest request body accepted by the add endpoint (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

//! Client-wide constants.

/// Peer contacted when no peer set is configured.
pub const FALLBACK_PEER_HOST: &str = "127.0.0.1";
pub const FALLBACK_PEER_PORT: u16 = 9999;

/// Key count of the threshold policy when configuration does not override it.
pub const DEFAULT_THRESHOLD_KEYS: usize = 3;

/// Sequence number written into every input.
pub const DEFAULT_SEQUENCE: u32 = 0;

/// Seconds to wait for a reply read back on the request connection.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 25;

/// Seconds to wait for a peer to connect back to the callback port.
pub const DEFAULT_CALLBACK_TIMEOUT_SECS: u64 = 10;

/// Seconds allowed for the outbound TCP connect.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

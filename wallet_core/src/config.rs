//! Wallet configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use quill_network::{ClientConfig, ResponseMode, StaticPeers};
use quill_types::params::{
    DEFAULT_CALLBACK_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_THRESHOLD_KEYS,
};
use quill_types::Peer;

use crate::error::WalletError;

/// Configuration for a quill wallet.
///
/// Can be loaded from a TOML file via [`WalletConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Full nodes to query, as `host:port`. Empty means the local fallback peer.
    #[serde(default)]
    pub peers: Vec<String>,

    /// How peers deliver replies: "synchronous" or "callback".
    #[serde(default)]
    pub response_mode: ResponseMode,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_callback_timeout_secs")]
    pub callback_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Number of keys in the threshold policy.
    #[serde(default = "default_threshold_keys")]
    pub threshold_keys: usize,

    /// Fee used when a spend does not name one.
    #[serde(default)]
    pub default_fee: u64,

    /// Encrypted key ring file.
    #[serde(default = "default_keystore_path")]
    pub keystore_path: PathBuf,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_callback_timeout_secs() -> u64 {
    DEFAULT_CALLBACK_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_threshold_keys() -> usize {
    DEFAULT_THRESHOLD_KEYS
}

fn default_keystore_path() -> PathBuf {
    PathBuf::from("./quill_wallet.json")
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl WalletConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, WalletError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WalletError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, WalletError> {
        toml::from_str(s).map_err(|e| WalletError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, WalletError> {
        toml::to_string_pretty(self).map_err(|e| WalletError::Config(e.to_string()))
    }

    /// Parse the configured peer list.
    pub fn peer_list(&self) -> Result<Vec<Peer>, WalletError> {
        self.peers
            .iter()
            .map(|p| {
                p.parse::<Peer>()
                    .map_err(|e| WalletError::Config(format!("bad peer {p:?}: {e}")))
            })
            .collect()
    }

    pub fn peer_set(&self) -> Result<StaticPeers, WalletError> {
        Ok(StaticPeers::new(self.peer_list()?))
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            mode: self.response_mode,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            callback_timeout: Duration::from_secs(self.callback_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            peers: Vec::new(),
            response_mode: ResponseMode::default(),
            request_timeout_secs: default_request_timeout_secs(),
            callback_timeout_secs: default_callback_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            threshold_keys: default_threshold_keys(),
            default_fee: 0,
            keystore_path: default_keystore_path(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = WalletConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = WalletConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.request_timeout_secs, config.request_timeout_secs);
        assert_eq!(parsed.response_mode, config.response_mode);
        assert_eq!(parsed.keystore_path, config.keystore_path);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = WalletConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.request_timeout_secs, 25);
        assert_eq!(config.callback_timeout_secs, 10);
        assert_eq!(config.threshold_keys, 3);
        assert_eq!(config.response_mode, ResponseMode::Synchronous);
        assert_eq!(config.log_format, "human");
        assert!(config.peers.is_empty());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            peers = ["10.0.0.5:9999", "node.example:7000"]
            response_mode = "callback"
            default_fee = 2
        "#;
        let config = WalletConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.response_mode, ResponseMode::Callback);
        assert_eq!(config.default_fee, 2);
        let peers = config.peer_list().unwrap();
        assert_eq!(peers[1], Peer::new("node.example", 7000));
        assert_eq!(config.client_config().mode, ResponseMode::Callback);
    }

    #[test]
    fn bad_peer_is_a_config_error() {
        let config = WalletConfig {
            peers: vec!["no-port".into()],
            ..WalletConfig::default()
        };
        assert!(matches!(config.peer_list(), Err(WalletError::Config(_))));
    }

    #[test]
    fn unknown_mode_rejected() {
        assert!(WalletConfig::from_toml_str(r#"response_mode = "pigeon""#).is_err());
    }

    #[test]
    fn missing_file_returns_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = WalletConfig::from_toml_file(&dir.path().join("quill.toml"));
        assert!(matches!(result, Err(WalletError::Config(_))));
    }
}

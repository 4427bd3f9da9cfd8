//! Remote full-node endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::QuillError;

/// A full node reachable over TCP. Identity is the `(host, port)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Peer {
    pub host: String,
    pub port: u16,
}

impl Peer {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Peer {
    type Err = QuillError;

    /// Parse `"host:port"`. The split happens on the last colon.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| QuillError::InvalidPeer(s.to_string()))?;
        if host.is_empty() {
            return Err(QuillError::InvalidPeer(s.to_string()));
        }
        let port = port
            .parse::<u16>()
            .map_err(|e| QuillError::InvalidPeer(format!("{s}: {e}")))?;
        Ok(Self::new(host, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_host_and_port() {
        let p: Peer = "10.0.0.7:9999".parse().unwrap();
        assert_eq!(p, Peer::new("10.0.0.7", 9999));
        assert_eq!(p.to_string(), "10.0.0.7:9999");
    }

    #[test]
    fn parse_rejects_missing_port() {
        assert!("localhost".parse::<Peer>().is_err());
        assert!(":80".parse::<Peer>().is_err());
        assert!("host:99999".parse::<Peer>().is_err());
    }
}

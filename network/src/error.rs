use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("protocol error: {0}")]
    Protocol(#[from] quill_protocol::ProtocolError),

    #[error("IO error: {0}")]
    Io(String),
}

impl NetworkError {
    /// The peer could not be reached or did not answer in time.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::ConnectionFailed(_))
    }
}

impl From<std::io::Error> for NetworkError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

//! Request/response exchange with a single peer.
//!
//! Two ways of getting the reply back are supported; client and peer must
//! agree on one per deployment:
//!
//! - [`ResponseMode::Synchronous`]: the peer answers on the request connection.
//! - [`ResponseMode::Callback`]: the client listens on an ephemeral port,
//!   advertises it in `reply_port` and the peer connects back to deliver the
//!   reply. Connections from any host other than the peer are ignored.

use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::Instant;

use quill_protocol::Message;
use quill_types::params::{
    DEFAULT_CALLBACK_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use quill_types::Peer;

use crate::connection::{read_frame, write_frame};
use crate::NetworkError;

/// How replies are delivered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    #[default]
    Synchronous,
    Callback,
}

impl FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "synchronous" | "sync" => Ok(Self::Synchronous),
            "callback" => Ok(Self::Callback),
            other => Err(format!("unknown response mode: {other}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub mode: ResponseMode,
    /// Bound on a whole synchronous round trip.
    pub request_timeout: Duration,
    /// How long the callback listener waits for the peer to connect back.
    pub callback_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            mode: ResponseMode::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            callback_timeout: Duration::from_secs(DEFAULT_CALLBACK_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

/// Talks to peers one request at a time.
#[derive(Clone, Debug, Default)]
pub struct PeerClient {
    config: ClientConfig,
}

impl PeerClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `request` to `peer` and wait for the reply.
    ///
    /// `Ok(None)` means the peer closed without sending a reply frame.
    pub async fn call(&self, peer: &Peer, request: Message) -> Result<Option<Message>, NetworkError> {
        match self.config.mode {
            ResponseMode::Synchronous => self.call_synchronous(peer, request).await,
            ResponseMode::Callback => self.call_with_callback(peer, request).await,
        }
    }

    /// Send `message` to `peer` without waiting for anything back.
    pub async fn send(&self, peer: &Peer, message: &Message) -> Result<(), NetworkError> {
        let mut stream = self.connect(peer).await?;
        write_frame(&mut stream, message).await?;
        // Peer may already have closed; the frame is out either way.
        let _ = stream.shutdown().await;
        tracing::debug!(peer = %peer, action = %message.action, "sent one-way message");
        Ok(())
    }

    async fn connect(&self, peer: &Peer) -> Result<TcpStream, NetworkError> {
        tokio::time::timeout(
            self.config.connect_timeout,
            TcpStream::connect((peer.host.as_str(), peer.port)),
        )
        .await
        .map_err(|_| NetworkError::Timeout(format!("connecting to {peer}")))?
        .map_err(|e| NetworkError::ConnectionFailed(format!("{peer}: {e}")))
    }

    async fn call_synchronous(
        &self,
        peer: &Peer,
        request: Message,
    ) -> Result<Option<Message>, NetworkError> {
        let action = request.action;
        let exchange = async {
            let mut stream = self.connect(peer).await?;
            write_frame(&mut stream, &request).await?;
            tracing::debug!(peer = %peer, action = %action, "sent request");
            read_frame(&mut stream).await
        };

        let reply = tokio::time::timeout(self.config.request_timeout, exchange)
            .await
            .map_err(|_| NetworkError::Timeout(format!("{action} to {peer}")))??;
        log_reply(peer, &reply, action);
        Ok(reply)
    }

    async fn call_with_callback(
        &self,
        peer: &Peer,
        request: Message,
    ) -> Result<Option<Message>, NetworkError> {
        let action = request.action;
        // The port must exist before the peer learns it.
        let listener = TcpListener::bind(("0.0.0.0", 0)).await?;
        let reply_port = listener.local_addr()?.port();
        let peer_ips = resolve(peer).await?;

        // One deadline covers writing the request and receiving the answer.
        let deadline = Instant::now() + self.config.callback_timeout;
        tokio::time::timeout_at(deadline, self.send(peer, &request.with_reply_port(reply_port)))
            .await
            .map_err(|_| NetworkError::Timeout(format!("sending {action} to {peer}")))??;
        tracing::debug!(peer = %peer, action = %action, reply_port, "awaiting callback");

        loop {
            let (mut stream, from) = tokio::time::timeout_at(deadline, listener.accept())
                .await
                .map_err(|_| NetworkError::Timeout(format!("callback for {action} from {peer}")))??;

            if !peer_ips.contains(&from.ip()) {
                tracing::warn!(peer = %peer, from = %from, "spurious callback connection from host");
                continue;
            }

            let reply = tokio::time::timeout_at(deadline, read_frame(&mut stream))
                .await
                .map_err(|_| NetworkError::Timeout(format!("callback for {action} from {peer}")))??;
            log_reply(peer, &reply, action);
            return Ok(reply);
        }
    }
}

async fn resolve(peer: &Peer) -> Result<Vec<IpAddr>, NetworkError> {
    let addrs = tokio::net::lookup_host((peer.host.as_str(), peer.port))
        .await
        .map_err(|e| NetworkError::ConnectionFailed(format!("resolving {peer}: {e}")))?;
    Ok(addrs.map(|a| a.ip()).collect())
}

fn log_reply(peer: &Peer, reply: &Option<Message>, action: quill_protocol::Action) {
    match reply {
        Some(msg) => tracing::debug!(peer = %peer, action = %msg.action, "received reply"),
        None => tracing::info!(peer = %peer, action = %action, "received nothing from peer"),
    }
}

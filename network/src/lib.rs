//! Peer RPC layer for the quill wallet client.
//!
//! Opens a TCP connection to a full node, sends one framed request and
//! obtains the reply, either on the same connection or through a one-shot
//! callback listener. Also picks which peer to talk to.

pub mod client;
pub mod connection;
pub mod error;
pub mod peer_set;

pub use client::{ClientConfig, PeerClient, ResponseMode};
pub use connection::{read_frame, write_frame};
pub use error::NetworkError;
pub use peer_set::{choose_peer, fallback_peer, PeerSet, StaticPeers};

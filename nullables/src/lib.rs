//! Nullable infrastructure for deterministic testing.
//!
//! The wallet's only external dependency at runtime is a full node reachable
//! over TCP. This crate provides an in-process stand-in that:
//! - Listens on an ephemeral loopback port
//! - Answers each request from a caller-supplied script
//! - Records every message it receives for later assertions
//!
//! Usage: point a `PeerClient` or `Wallet` at `StubPeer::peer()`.

pub mod peer;

pub use peer::{ReplyRoute, StubPeer, StubReply};

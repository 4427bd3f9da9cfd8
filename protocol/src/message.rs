//! The wire envelope exchanged between wallet and peer.
//!
//! Every frame carries exactly one [`Message`]. The set of actions and payload
//! kinds is closed: decoding never resolves types by name, and a payload that
//! does not belong to its action is rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

use quill_types::{Address, Block, Peer, Transaction, TxHash, UnspentTxOut};

use crate::ProtocolError;

/// What a message asks for or answers.
///
/// The declaration order fixes the wire tag; append new actions at the end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Balance of an address (request and reply).
    Balance4Addr,
    /// Unspent outputs of an address (request and reply).
    Utxo4Addr,
    /// A signed transaction for the peer to relay. No reply.
    TxSubmit,
    /// Ask for the confirmation status of a transaction id.
    TxStatusReq,
    /// Confirmation status reply.
    TxStatusResp,
    /// The peer could not answer.
    Error,
    /// A newly mined block. Sent peer to peer; the wallet ignores it.
    BlockAnnounce,
    /// A list of peers to add to a peer set.
    PeerExtend,
}

impl Action {
    /// Every action in wire-tag order.
    pub const ALL: [Action; 8] = [
        Action::Balance4Addr,
        Action::Utxo4Addr,
        Action::TxSubmit,
        Action::TxStatusReq,
        Action::TxStatusResp,
        Action::Error,
        Action::BlockAnnounce,
        Action::PeerExtend,
    ];

    /// Whether `payload` is a legal body for this action.
    pub fn accepts(&self, payload: &Payload) -> bool {
        matches!(
            (self, payload),
            (Action::Balance4Addr, Payload::Address(_) | Payload::Balance(_))
                | (Action::Utxo4Addr, Payload::Address(_) | Payload::Utxos(_))
                | (Action::TxSubmit, Payload::Transaction(_))
                | (Action::TxStatusReq, Payload::TxId(_))
                | (Action::TxStatusResp, Payload::Status(_))
                | (Action::Error, Payload::Text(_))
                | (Action::BlockAnnounce, Payload::Block(_))
                | (Action::PeerExtend, Payload::Peers(_))
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Balance4Addr => "Balance4Addr",
            Action::Utxo4Addr => "UTXO4Addr",
            Action::TxSubmit => "TxSubmit",
            Action::TxStatusReq => "TxStatusReq",
            Action::TxStatusResp => "TxStatusResp",
            Action::Error => "Error",
            Action::BlockAnnounce => "BlockAnnounce",
            Action::PeerExtend => "PeerExtend",
        };
        f.write_str(name)
    }
}

/// Action-specific message body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    Address(Address),
    Balance(u64),
    Utxos(Vec<UnspentTxOut>),
    Transaction(Transaction),
    TxId(TxHash),
    Status(String),
    Text(String),
    Block(Block),
    Peers(Vec<Peer>),
}

impl Payload {
    /// Short name of the payload kind, for errors and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Address(_) => "address",
            Payload::Balance(_) => "balance",
            Payload::Utxos(_) => "utxo list",
            Payload::Transaction(_) => "transaction",
            Payload::TxId(_) => "transaction id",
            Payload::Status(_) => "status",
            Payload::Text(_) => "text",
            Payload::Block(_) => "block",
            Payload::Peers(_) => "peer list",
        }
    }
}

/// One unit of wire exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub action: Action,
    pub payload: Payload,
    /// Port the sender listens on for the reply in callback mode; 0 otherwise.
    pub reply_port: u16,
}

impl Message {
    /// Build a message, rejecting a payload that does not fit the action.
    pub fn new(action: Action, payload: Payload) -> Result<Self, ProtocolError> {
        let msg = Self {
            action,
            payload,
            reply_port: 0,
        };
        msg.validate()?;
        Ok(msg)
    }

    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.action.accepts(&self.payload) {
            Ok(())
        } else {
            Err(ProtocolError::ActionMismatch {
                action: self.action,
                payload: self.payload.kind(),
            })
        }
    }

    pub fn with_reply_port(mut self, port: u16) -> Self {
        self.reply_port = port;
        self
    }

    pub fn balance_request(address: Address) -> Self {
        Self::unchecked(Action::Balance4Addr, Payload::Address(address))
    }

    pub fn balance_reply(balance: u64) -> Self {
        Self::unchecked(Action::Balance4Addr, Payload::Balance(balance))
    }

    pub fn utxo_request(address: Address) -> Self {
        Self::unchecked(Action::Utxo4Addr, Payload::Address(address))
    }

    pub fn utxo_reply(utxos: Vec<UnspentTxOut>) -> Self {
        Self::unchecked(Action::Utxo4Addr, Payload::Utxos(utxos))
    }

    pub fn tx_submit(tx: Transaction) -> Self {
        Self::unchecked(Action::TxSubmit, Payload::Transaction(tx))
    }

    pub fn status_request(txid: TxHash) -> Self {
        Self::unchecked(Action::TxStatusReq, Payload::TxId(txid))
    }

    pub fn status_reply(status: impl Into<String>) -> Self {
        Self::unchecked(Action::TxStatusResp, Payload::Status(status.into()))
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::unchecked(Action::Error, Payload::Text(text.into()))
    }

    // Callers pair action and payload correctly; covered by `constructors_are_valid`.
    fn unchecked(action: Action, payload: Payload) -> Self {
        Self {
            action,
            payload,
            reply_port: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> Address {
        Address::new("qk_owner").unwrap()
    }

    #[test]
    fn constructors_are_valid() {
        let msgs = [
            Message::balance_request(addr()),
            Message::balance_reply(5),
            Message::utxo_request(addr()),
            Message::utxo_reply(Vec::new()),
            Message::tx_submit(Transaction::new(Vec::new(), Vec::new())),
            Message::status_request(TxHash::ZERO),
            Message::status_reply("confirmed"),
            Message::error("no such address"),
        ];
        for msg in msgs {
            msg.validate().unwrap();
            assert_eq!(msg.reply_port, 0);
        }
    }

    #[test]
    fn mismatched_payload_rejected() {
        let err = Message::new(Action::TxSubmit, Payload::Balance(1)).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::ActionMismatch {
                action: Action::TxSubmit,
                payload: "balance"
            }
        ));
    }

    #[test]
    fn reply_port_is_carried() {
        let msg = Message::balance_request(addr()).with_reply_port(4242);
        assert_eq!(msg.reply_port, 4242);
    }

    #[test]
    fn display_uses_wire_names() {
        assert_eq!(Action::Utxo4Addr.to_string(), "UTXO4Addr");
        assert_eq!(Action::TxStatusResp.to_string(), "TxStatusResp");
    }

    #[test]
    fn all_lists_every_action_once() {
        let mut seen = std::collections::HashSet::new();
        for action in Action::ALL {
            assert!(seen.insert(action));
        }
    }
}

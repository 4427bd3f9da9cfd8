//! The wallet facade: typed queries and spends against a remote full node.
//!
//! Every public operation holds the wallet's request lock for its whole
//! duration, so one wallet never has two requests in flight. Internal
//! helpers run under that lock and never take it themselves.

use tokio::sync::Mutex;

use quill_network::{choose_peer, PeerClient, PeerSet};
use quill_protocol::{Action, Message, Payload};
use quill_script::{ScriptTemplates, StandardScripts};
use quill_types::{Address, Peer, SpendingPolicy, Transaction, TxHash, UnspentTxOut};

use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::keys::{KeyManager, SigningCapability};
use crate::transaction_builder::{build_transaction, SpendPlan};

pub struct Wallet {
    keys: Box<dyn KeyManager>,
    peers: Box<dyn PeerSet>,
    client: PeerClient,
    scripts: Box<dyn ScriptTemplates>,
    threshold_keys: usize,
    default_fee: u64,
    request_lock: Mutex<()>,
}

impl Wallet {
    pub fn new(
        keys: impl KeyManager + 'static,
        peers: impl PeerSet + 'static,
        client: PeerClient,
    ) -> Self {
        Self {
            keys: Box::new(keys),
            peers: Box::new(peers),
            client,
            scripts: Box::new(StandardScripts),
            threshold_keys: quill_types::params::DEFAULT_THRESHOLD_KEYS,
            default_fee: 0,
            request_lock: Mutex::new(()),
        }
    }

    /// Build a wallet from configuration and a loaded key ring.
    pub fn from_config(
        config: &WalletConfig,
        keys: impl KeyManager + 'static,
    ) -> Result<Self, WalletError> {
        let mut wallet = Self::new(
            keys,
            config.peer_set()?,
            PeerClient::new(config.client_config()),
        );
        wallet.threshold_keys = config.threshold_keys;
        wallet.default_fee = config.default_fee;
        Ok(wallet)
    }

    pub fn with_scripts(mut self, scripts: impl ScriptTemplates + 'static) -> Self {
        self.scripts = Box::new(scripts);
        self
    }

    pub fn with_threshold_keys(mut self, n: usize) -> Self {
        self.threshold_keys = n;
        self
    }

    pub fn with_default_fee(mut self, fee: u64) -> Self {
        self.default_fee = fee;
        self
    }

    /// Key-hash address of the primary key pair.
    pub fn address(&self) -> Address {
        self.keys.primary_address()
    }

    /// Script-hash address of the threshold policy over all key pairs.
    pub fn multi_address(&self) -> Result<Address, WalletError> {
        self.check_threshold_keys()?;
        Ok(self.scripts.address_from_keys(&self.keys.public_keys())?)
    }

    /// Balance of `address` (the primary address by default).
    ///
    /// `Ok(None)` when the peer is unreachable, times out or sends nothing.
    pub async fn get_balance(&self, address: Option<&Address>) -> Result<Option<u64>, WalletError> {
        let _guard = self.request_lock.lock().await;
        let address = address.cloned().unwrap_or_else(|| self.address());
        let peer = choose_peer(self.peers.as_ref());

        let reply = degrade_unreachable(
            &peer,
            Action::Balance4Addr,
            self.client.call(&peer, Message::balance_request(address)).await,
        )?;
        match reply.map(|m| m.payload) {
            None => Ok(None),
            Some(Payload::Balance(balance)) => Ok(Some(balance)),
            Some(other) => Err(unexpected(Action::Balance4Addr, other)),
        }
    }

    /// Unspent outputs of `address` (the primary address by default).
    ///
    /// `Ok(None)` when the peer is unreachable, times out or sends nothing.
    pub async fn get_utxos(
        &self,
        address: Option<&Address>,
    ) -> Result<Option<Vec<UnspentTxOut>>, WalletError> {
        let _guard = self.request_lock.lock().await;
        let address = address.cloned().unwrap_or_else(|| self.address());
        let peer = choose_peer(self.peers.as_ref());

        let reply = degrade_unreachable(
            &peer,
            Action::Utxo4Addr,
            self.client.call(&peer, Message::utxo_request(address)).await,
        )?;
        reply.map(utxos_from_reply).transpose()
    }

    /// Build, sign and submit a spend of `value` to `destination`.
    ///
    /// Funds come from the primary address under `SingleSig` and from the
    /// multi-key address under `Threshold`; change returns there. Network
    /// failures are surfaced, never degraded.
    pub async fn submit_transaction(
        &self,
        policy: SpendingPolicy,
        destination: &Address,
        value: u64,
        fee: Option<u64>,
    ) -> Result<Transaction, WalletError> {
        let _guard = self.request_lock.lock().await;
        let fee = fee.unwrap_or(self.default_fee);
        let plan = self.spend_plan(policy, destination, value, fee)?;
        let peer = choose_peer(self.peers.as_ref());

        let candidates = match self
            .client
            .call(&peer, Message::utxo_request(plan.funding_address.clone()))
            .await?
        {
            Some(reply) => utxos_from_reply(reply)?,
            None => {
                tracing::info!(peer = %peer, "received nothing for UTXO4Addr from peer");
                Vec::new()
            }
        };

        let tx = build_transaction(&plan, &candidates, self.scripts.as_ref())?;
        let txid = quill_crypto::transaction_id(&tx)?;
        self.client.send(&peer, &Message::tx_submit(tx.clone())).await?;
        tracing::info!(peer = %peer, txid = %txid, value, fee, "sent TxSubmit to peer");
        Ok(tx)
    }

    /// Confirmation status of `txid` as reported by a peer.
    ///
    /// `Ok(None)` when the peer closes without answering; timeouts and
    /// connection failures are errors.
    pub async fn get_transaction_status(&self, txid: &TxHash) -> Result<Option<String>, WalletError> {
        let _guard = self.request_lock.lock().await;
        let peer = choose_peer(self.peers.as_ref());

        let reply = self.client.call(&peer, Message::status_request(*txid)).await?;
        match reply.map(|m| (m.action, m.payload)) {
            None => {
                tracing::info!(peer = %peer, "received nothing for TxStatus from peer");
                Ok(None)
            }
            Some((Action::TxStatusResp, Payload::Status(status))) => Ok(Some(status)),
            Some((_, Payload::Text(text))) => Err(WalletError::Remote(text)),
            Some((_, other)) => Err(unexpected(Action::TxStatusResp, other)),
        }
    }

    fn spend_plan<'a>(
        &'a self,
        policy: SpendingPolicy,
        destination: &Address,
        value: u64,
        fee: u64,
    ) -> Result<SpendPlan<'a>, WalletError> {
        let (signers, funding_address): (Vec<&dyn SigningCapability>, Address) = match policy {
            SpendingPolicy::SingleSig => (vec![self.keys.primary()], self.address()),
            SpendingPolicy::Threshold { n } => {
                if n != self.threshold_keys {
                    return Err(WalletError::PolicyMismatch {
                        expected: self.threshold_keys,
                        actual: n,
                    });
                }
                (self.keys.signers(), self.multi_address()?)
            }
        };
        Ok(SpendPlan {
            policy,
            signers,
            funding_address,
            destination: destination.clone(),
            value,
            fee,
        })
    }

    fn check_threshold_keys(&self) -> Result<(), WalletError> {
        let actual = self.keys.key_pair_count();
        if actual != self.threshold_keys {
            return Err(WalletError::PolicyMismatch {
                expected: self.threshold_keys,
                actual,
            });
        }
        Ok(())
    }
}

fn degrade_unreachable(
    peer: &Peer,
    action: Action,
    result: Result<Option<Message>, quill_network::NetworkError>,
) -> Result<Option<Message>, WalletError> {
    match result {
        Ok(reply) => Ok(reply),
        Err(e) if e.is_unreachable() => {
            tracing::warn!(peer = %peer, action = %action, error = %e, "peer unreachable");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn utxos_from_reply(reply: Message) -> Result<Vec<UnspentTxOut>, WalletError> {
    match reply.payload {
        Payload::Utxos(utxos) => Ok(utxos),
        other => Err(unexpected(Action::Utxo4Addr, other)),
    }
}

fn unexpected(expected: Action, payload: Payload) -> WalletError {
    match payload {
        Payload::Text(text) => WalletError::Remote(text),
        other => WalletError::UnexpectedResponse(format!(
            "expected {expected} reply, got {} payload",
            other.kind()
        )),
    }
}

//! Which full node to talk to.

use rand::seq::SliceRandom;

use quill_types::params::{FALLBACK_PEER_HOST, FALLBACK_PEER_PORT};
use quill_types::Peer;

/// Source of candidate peers.
pub trait PeerSet: Send + Sync {
    fn list_peers(&self) -> Vec<Peer>;
}

/// A fixed peer list, typically from configuration.
#[derive(Clone, Debug, Default)]
pub struct StaticPeers {
    peers: Vec<Peer>,
}

impl StaticPeers {
    pub fn new(peers: Vec<Peer>) -> Self {
        Self { peers }
    }
}

impl PeerSet for StaticPeers {
    fn list_peers(&self) -> Vec<Peer> {
        self.peers.clone()
    }
}

/// The peer used when no other is known: a node on this host.
pub fn fallback_peer() -> Peer {
    Peer::new(FALLBACK_PEER_HOST, FALLBACK_PEER_PORT)
}

/// Pick a peer uniformly at random, or the fallback peer when the set is empty.
pub fn choose_peer(set: &dyn PeerSet) -> Peer {
    let peers = set.list_peers();
    let mut rng = rand::thread_rng();
    peers.choose(&mut rng).cloned().unwrap_or_else(fallback_peer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_uses_fallback() {
        let peer = choose_peer(&StaticPeers::default());
        assert_eq!(peer, Peer::new("127.0.0.1", 9999));
    }

    #[test]
    fn choice_comes_from_the_set() {
        let set = StaticPeers::new(vec![Peer::new("10.0.0.1", 1), Peer::new("10.0.0.2", 2)]);
        for _ in 0..20 {
            assert!(set.list_peers().contains(&choose_peer(&set)));
        }
    }
}

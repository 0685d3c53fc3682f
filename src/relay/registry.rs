use std::net::SocketAddr;
use std::sync::Mutex;

use tokio::sync::mpsc::UnboundedSender;

pub type PeerId = String;

/// Handle to one live peer link.
///
/// Cloning is cheap. The sender feeds the link's write task, so queueing a
/// line here never performs socket I/O; a line sent to a dead link simply
/// fails, and the link's own read loop takes care of unregistering it.
#[derive(Debug, Clone)]
pub struct PeerHandle {
    pub id: PeerId,
    pub addr: SocketAddr,
    pub sender: UnboundedSender<String>,
}

impl PeerHandle {
    pub fn new(addr: SocketAddr, sender: UnboundedSender<String>) -> Self {
        Self {
            id: format!("peer-{}", uuid::Uuid::new_v4()),
            addr,
            sender,
        }
    }
}

/// Tracks the live set of peer links for this node.
///
/// Mutation and snapshotting are fully serialized under one lock. Critical
/// sections are bounded and never perform I/O, so the registry never blocks
/// a caller indefinitely.
#[derive(Debug, Default)]
pub struct Registry {
    peers: Mutex<Vec<PeerHandle>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a link. A handle with an id already present is left untouched,
    /// so the registry never holds the same link twice.
    pub fn add(&self, peer: PeerHandle) {
        let mut peers = self.peers.lock().unwrap();
        if peers.iter().all(|p| p.id != peer.id) {
            peers.push(peer);
        }
    }

    /// Removes a link by id. Removing an absent id is a no-op.
    pub fn remove(&self, id: &str) {
        self.peers.lock().unwrap().retain(|p| p.id != id);
    }

    /// The current links, in the order they were added.
    pub fn snapshot(&self) -> Vec<PeerHandle> {
        self.peers.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.peers.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

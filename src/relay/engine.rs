use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::persistence::MessageStore;
use crate::protocol::{Message, MessageKind};
use crate::relay::backlog;
use crate::relay::filter::SubscriptionFilter;
use crate::relay::registry::{PeerHandle, Registry};
use crate::utils::error::RelayError;

/// One node's relay engine.
///
/// Owns the link [`Registry`] and the [`SubscriptionFilter`], and drives
/// every connection from accept/dial through its read loop to teardown.
/// Each link runs a read task and a write task; the write task drains the
/// link's channel into the socket, so everything that forwards messages
/// stays free of socket I/O.
pub struct Relay {
    name: String,
    registry: Registry,
    filter: SubscriptionFilter,
    store: Arc<dyn MessageStore>,
}

impl Relay {
    /// Creates a new node engine named `name`, persisting through `store`.
    pub fn new(name: &str, store: Arc<dyn MessageStore>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            registry: Registry::new(),
            filter: SubscriptionFilter::new(),
            store,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn subscribe(&self, topic: &str) {
        self.filter.subscribe(topic);
    }

    pub fn unsubscribe(&self, topic: &str) {
        self.filter.unsubscribe(topic);
    }

    pub fn is_subscribed(&self, topic: &str) -> bool {
        self.filter.is_allowed(topic)
    }

    /// Binds `addr` and accepts peers in the background until the node exits.
    ///
    /// Returns the bound address (so callers may listen on port 0). A bind
    /// failure is fatal to node startup and is propagated, not retried.
    pub async fn listen(self: &Arc<Self>, addr: &str) -> Result<SocketAddr, RelayError> {
        let listener = TcpListener::bind(addr).await.map_err(|e| RelayError::Bind {
            addr: addr.to_string(),
            source: e,
        })?;
        let local = listener.local_addr().map_err(|e| RelayError::Bind {
            addr: addr.to_string(),
            source: e,
        })?;
        info!(%local, "listening for peers");

        let relay = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, addr)) => {
                        info!(%addr, "incoming peer connection");
                        relay.register(stream, addr);
                    }
                    Err(e) => warn!("failed to accept connection: {e}"),
                }
            }
        });

        Ok(local)
    }

    /// Dials `remote` and registers the link on success.
    ///
    /// A dial failure is returned to the caller with nothing registered;
    /// retrying is the caller's decision.
    pub async fn connect(self: &Arc<Self>, remote: &str) -> Result<(), RelayError> {
        let stream = TcpStream::connect(remote).await.map_err(|e| RelayError::Dial {
            addr: remote.to_string(),
            source: e,
        })?;
        let addr = stream.peer_addr().map_err(|e| RelayError::Dial {
            addr: remote.to_string(),
            source: e,
        })?;
        info!(%addr, "connected to peer");
        self.register(stream, addr);
        Ok(())
    }

    /// Registers a fresh socket: starts its write and read tasks, then
    /// replays the undelivered backlog to it.
    fn register(self: &Arc<Self>, stream: TcpStream, addr: SocketAddr) {
        let (read_half, mut write_half) = stream.into_split();
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let peer = PeerHandle::new(addr, tx);
        let id = peer.id.clone();
        self.registry.add(peer.clone());

        let writer_id = id.clone();
        tokio::spawn(async move {
            while let Some(line) = rx.recv().await {
                if let Err(e) = write_half.write_all(line.as_bytes()).await {
                    warn!(id = %writer_id, "failed to write to peer: {e}");
                    break;
                }
                if let Err(e) = write_half.write_all(b"\n").await {
                    warn!(id = %writer_id, "failed to write to peer: {e}");
                    break;
                }
            }
            debug!(id = %writer_id, "write task finished");
        });

        let relay = Arc::clone(self);
        tokio::spawn(async move {
            relay.read_loop(read_half, &id, addr).await;
            // Sole path to the link's terminal state: unregister, then let
            // the halves drop to release the socket.
            relay.registry.remove(&id);
            info!(%addr, "peer disconnected");
        });

        backlog::deliver(self.store.as_ref(), &peer);
    }

    /// Reads lines off one link until EOF or a transport error.
    async fn read_loop(&self, read_half: OwnedReadHalf, origin: &str, addr: SocketAddr) {
        let mut lines = BufReader::new(read_half).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => self.handle_line(&line, origin, addr),
                Ok(None) => break,
                Err(e) => {
                    warn!(%addr, "transport error on peer link: {e}");
                    break;
                }
            }
        }
    }

    /// Processes one inbound wire line: decode, filter, display, persist,
    /// forward.
    pub(crate) fn handle_line(&self, line: &str, origin: &str, addr: SocketAddr) {
        let msg = match Message::decode(line) {
            Ok(msg) => msg,
            Err(e) => {
                // Not a protocol message. Show it, but keep it inert: no
                // persistence, no forwarding.
                debug!(%addr, "undecodable line: {e}");
                info!("[{addr}] {line}");
                return;
            }
        };

        if !self.filter.is_allowed(&msg.topic) {
            debug!(topic = %msg.topic, "dropping message for unsubscribed topic");
            return;
        }

        self.display(&msg, addr);

        if let Err(e) = self
            .store
            .save_message(&msg.sender, &msg.content, msg.timestamp, true)
        {
            error!("failed to save received message: {e}");
        }

        // Forward the original line, not a re-encoding, to every other link.
        // Loop avoidance is origin exclusion only; a message can still
        // re-circulate in cyclic topologies of 3+ nodes.
        self.forward(line, Some(origin));
    }

    /// Presentation side effect. Each kind stays distinguishable in the log
    /// stream; nothing here affects persistence or forwarding.
    fn display(&self, msg: &Message, addr: SocketAddr) {
        match msg.classify() {
            MessageKind::Chat => info!("[{addr}] {}: {}", msg.sender, msg.content),
            MessageKind::Notification => info!("[{addr}] * {}: {}", msg.sender, msg.content),
            MessageKind::Command => {
                info!("[{addr}] {} issued command: {}", msg.sender, msg.content)
            }
            MessageKind::Unknown => {
                info!("[{addr}] {} ({}): {}", msg.sender, msg.kind, msg.content)
            }
        }
        if let Some(name) = &msg.file_name {
            info!("[{addr}] {} attached {name}", msg.sender);
        }
    }

    /// Queues `line` on every live link except `origin`.
    ///
    /// A failing destination is logged and skipped; its own read loop will
    /// notice the dead socket and unregister it. One bad link never blocks
    /// delivery to the rest.
    pub(crate) fn forward(&self, line: &str, origin: Option<&str>) {
        for peer in self.registry.snapshot() {
            if origin.is_some_and(|o| o == peer.id) {
                continue;
            }
            if peer.sender.send(line.to_string()).is_err() {
                warn!(id = %peer.id, "failed to forward to peer, link is closing");
            }
        }
    }

    /// The local send path: persist the node's own copy (already delivered),
    /// then flood to every link. There is no origin to exclude.
    pub fn broadcast(&self, mut msg: Message) {
        if msg.sender.is_empty() {
            msg.sender = self.name.clone();
        }
        let line = match msg.encode() {
            Ok(line) => line,
            Err(e) => {
                error!("dropping outgoing message: {e}");
                return;
            }
        };
        if let Err(e) = self
            .store
            .save_message(&msg.sender, &msg.content, msg.timestamp, true)
        {
            error!("failed to save broadcast message: {e}");
        }
        self.forward(&line, None);
    }

    /// Broadcasts a plain chat line under this node's own name.
    pub fn broadcast_text(&self, content: &str) {
        self.broadcast(Message::chat("", content));
    }
}

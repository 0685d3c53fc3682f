//! Store-and-forward replay for newly connected peers.

use tracing::{error, warn};

use crate::persistence::MessageStore;
use crate::protocol::Message;
use crate::relay::registry::PeerHandle;

/// Replays every message not yet marked delivered to `peer`, oldest first,
/// marking each one delivered once it has been queued.
///
/// Runs exactly once per link, right after registration. The delivered flag
/// is global, not per-peer: a message replayed to one peer is never offered
/// to a later one, even if that peer never saw it. Replayed messages keep
/// their stored timestamp rather than being re-stamped.
///
/// A write failure leaves that one message undelivered so the next
/// connecting peer picks it up. A query failure skips the whole pass; it is
/// never propagated to whoever established the connection.
pub(crate) fn deliver(store: &dyn MessageStore, peer: &PeerHandle) {
    let pending = match store.undelivered() {
        Ok(pending) => pending,
        Err(e) => {
            error!("failed to query undelivered messages: {e}");
            return;
        }
    };

    for record in pending {
        let mut msg = Message::chat(&record.sender, &record.content);
        msg.timestamp = record.timestamp;
        let line = match serde_json::to_string(&msg) {
            Ok(line) => line,
            Err(e) => {
                error!(id = record.id, "failed to encode backlog message: {e}");
                continue;
            }
        };

        if peer.sender.send(line).is_err() {
            warn!(id = record.id, peer = %peer.id, "peer went away during backlog replay");
            continue;
        }
        if let Err(e) = store.mark_delivered(record.id) {
            error!(id = record.id, "failed to mark message delivered: {e}");
        }
    }
}

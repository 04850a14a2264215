//! WebSocket connection manager.
//!
//! Tracks every live WebSocket connection by a server-assigned id and fans
//! messages out to their outgoing channels.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

use super::messages::ServerMessage;
use crate::server::metrics;

/// Server-internal identifier of a live connection. Never sent to clients.
pub type ConnectionId = usize;

/// Outgoing messages buffered per connection before new ones are dropped.
pub const DEFAULT_OUTGOING_BUFFER: usize = 64;

/// Information about an active WebSocket connection.
struct ConnectionEntry {
    sender: mpsc::Sender<ServerMessage>,
}

/// Outcome of a broadcast.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BroadcastReport {
    /// Connections the message was enqueued for.
    pub delivered: usize,
    /// Connections whose buffer was full; the message was dropped for them.
    pub dropped: usize,
    /// Connections found closed and removed from the registry.
    pub disconnected: Vec<ConnectionId>,
}

/// Manages all active WebSocket connections.
pub struct ConnectionManager {
    connections: RwLock<HashMap<ConnectionId, ConnectionEntry>>,
    next_id: AtomicUsize,
    outgoing_buffer: usize,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new(DEFAULT_OUTGOING_BUFFER)
    }
}

impl ConnectionManager {
    /// Create a new connection manager. `outgoing_buffer` is clamped to at
    /// least one message.
    pub fn new(outgoing_buffer: usize) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            next_id: AtomicUsize::new(1),
            outgoing_buffer: outgoing_buffer.max(1),
        }
    }

    /// Register a new connection.
    ///
    /// Returns the assigned id and a receiver for outgoing messages. The
    /// caller should forward messages from this receiver to the WebSocket.
    pub async fn register(&self) -> (ConnectionId, mpsc::Receiver<ServerMessage>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.outgoing_buffer);

        let mut conns = self.connections.write().await;
        conns.insert(id, ConnectionEntry { sender: tx });
        metrics::set_active_connections(conns.len());

        (id, rx)
    }

    /// Unregister a connection (called on disconnect).
    ///
    /// Returns false if the connection was already gone.
    pub async fn unregister(&self, id: ConnectionId) -> bool {
        let mut conns = self.connections.write().await;
        let removed = conns.remove(&id).is_some();
        metrics::set_active_connections(conns.len());
        removed
    }

    /// Broadcast a message to ALL connected clients.
    ///
    /// Never waits on a slow client: a full buffer drops the message for that
    /// connection only. Closed connections are skipped and unregistered.
    pub async fn broadcast_to_all(&self, message: ServerMessage) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        {
            let conns = self.connections.read().await;
            for (id, entry) in conns.iter() {
                match entry.sender.try_send(message.clone()) {
                    Ok(()) => report.delivered += 1,
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        warn!("Outgoing buffer full for connection {}, dropping message", id);
                        report.dropped += 1;
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        report.disconnected.push(*id);
                    }
                }
            }
        }

        if !report.disconnected.is_empty() {
            let mut conns = self.connections.write().await;
            for id in report.disconnected.iter() {
                debug!("Removing closed connection {}", id);
                conns.remove(id);
            }
            metrics::set_active_connections(conns.len());
        }

        report
    }

    /// Check if a connection is registered.
    pub async fn is_connected(&self, id: ConnectionId) -> bool {
        self.connections.read().await.contains_key(&id)
    }

    /// Get the total number of active connections.
    pub async fn total_connections(&self) -> usize {
        self.connections.read().await.len()
    }
}

//! Relay core.
//!
//! A `Relay` owns the last-value cache and the registry of live WebSocket
//! connections. Handling an update writes the cache and enqueues the
//! `update_data` broadcast while holding the cache lock, so the cache and the
//! broadcast stream always agree on the most recent output of each client id.

mod latest_outputs;
mod update;

pub use latest_outputs::LatestOutputs;
pub use update::{ClientUpdate, UpdateError};

use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::server::metrics;
use crate::server::websocket::{msg_types, BroadcastReport, ConnectionManager, ServerMessage};

pub struct Relay {
    latest_outputs: Mutex<LatestOutputs>,
    connections: ConnectionManager,
}

impl Default for Relay {
    fn default() -> Self {
        Self::new(ConnectionManager::default())
    }
}

impl Relay {
    pub fn new(connections: ConnectionManager) -> Self {
        Self {
            latest_outputs: Mutex::new(LatestOutputs::new()),
            connections,
        }
    }

    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    /// Record `update` as the latest output of its client id and broadcast it
    /// to every connected client, the sender included.
    pub async fn handle_update(&self, update: ClientUpdate) -> BroadcastReport {
        let mut latest_outputs = self.latest_outputs.lock().await;

        info!(
            "Received data from client {}: {}",
            update.client_id, update.output
        );

        let message = ServerMessage::new(msg_types::UPDATE_DATA, update.to_payload());
        latest_outputs.record(update.client_id, update.output);
        metrics::set_latest_outputs_entries(latest_outputs.len());

        let report = self.connections.broadcast_to_all(message).await;
        metrics::record_update(report.dropped);

        debug!(
            "Broadcast delivered to {} connection(s), {} dropped, {} gone",
            report.delivered,
            report.dropped,
            report.disconnected.len()
        );

        report
    }

    pub async fn latest_output(&self, client_id: &str) -> Option<Value> {
        self.latest_outputs.lock().await.get(client_id).cloned()
    }

    pub async fn latest_outputs(&self) -> HashMap<String, Value> {
        self.latest_outputs.lock().await.snapshot()
    }
}

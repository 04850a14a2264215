//! WebSocket route handler.
//!
//! Handles WebSocket upgrade, message loop, and cleanup.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::{
    connection::ConnectionId,
    messages::{msg_types, ClientMessage, ServerMessage},
};
use crate::relay::{ClientUpdate, Relay};
use crate::server::metrics;
use crate::server::state::GuardedRelay;

/// WebSocket upgrade handler.
///
/// This is the route handler for `GET /ws`. No handshake data is required.
pub async fn ws_handler(ws: WebSocketUpgrade, State(relay): State<GuardedRelay>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, relay))
}

/// Handle an established WebSocket connection.
async fn handle_socket(socket: WebSocket, relay: GuardedRelay) {
    // Register connection and get receiver for outgoing messages
    let (connection_id, outgoing_rx) = relay.connections().register().await;
    info!("Client connected (connection {})", connection_id);

    let (ws_sink, ws_stream) = socket.split();

    // Spawn task to forward outgoing messages to WebSocket
    let outgoing_handle = tokio::spawn(forward_outgoing(ws_sink, outgoing_rx));

    process_incoming(ws_stream, connection_id, &relay).await;

    relay.connections().unregister(connection_id).await;
    outgoing_handle.abort();
    info!("Client disconnected (connection {})", connection_id);
}

/// Forward messages from the outgoing channel to the WebSocket.
async fn forward_outgoing(
    mut ws_sink: futures::stream::SplitSink<WebSocket, Message>,
    mut outgoing_rx: mpsc::Receiver<ServerMessage>,
) {
    while let Some(msg) = outgoing_rx.recv().await {
        match serde_json::to_string(&msg) {
            Ok(json) => {
                if ws_sink.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                error!("Failed to serialize WebSocket message: {}", e);
            }
        }
    }
}

/// Process incoming messages from the WebSocket.
async fn process_incoming(
    mut ws_stream: futures::stream::SplitStream<WebSocket>,
    connection_id: ConnectionId,
    relay: &Relay,
) {
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                handle_text(connection_id, text.as_str(), relay).await;
            }
            Ok(Message::Binary(_)) => {
                debug!("Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) => {
                // Axum/tungstenite handles pong automatically
                debug!("Received ping");
            }
            Ok(Message::Pong(_)) => {
                debug!("Received pong");
            }
            Ok(Message::Close(_)) => {
                debug!("Received close frame");
                break;
            }
            Err(e) => {
                debug!("WebSocket error: {}", e);
                break;
            }
        }
    }
}

/// Handle one text frame. Malformed input is logged and dropped; nothing is
/// sent back to the client and the connection stays open.
async fn handle_text(connection_id: ConnectionId, text: &str, relay: &Relay) {
    let msg = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!(
                "Dropping unparsable message from connection {}: {}",
                connection_id, e
            );
            metrics::record_rejected_message("invalid_envelope");
            return;
        }
    };

    match msg.msg_type.as_str() {
        msg_types::CLIENT_DATA => match ClientUpdate::from_payload(msg.payload) {
            Ok(update) => {
                relay.handle_update(update).await;
            }
            Err(e) => {
                warn!(
                    "Dropping malformed {} from connection {}: {}",
                    msg_types::CLIENT_DATA,
                    connection_id,
                    e
                );
                metrics::record_rejected_message(e.reason());
            }
        },
        other => {
            debug!(
                "Ignoring unknown message type {} from connection {}",
                other, connection_id
            );
            metrics::record_rejected_message("unknown_type");
        }
    }
}

//! WebSocket message types.
//!
//! Every frame in either direction is a JSON text frame using the same
//! envelope: `{"type": <event name>, "payload": <value>}`.

use serde::{Deserialize, Serialize};

/// Server -> Client message envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerMessage {
    /// Event name (e.g. "update_data")
    #[serde(rename = "type")]
    pub msg_type: String,
    pub payload: serde_json::Value,
}

impl ServerMessage {
    /// Create a new server message with the given type and payload.
    pub fn new(msg_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            msg_type: msg_type.into(),
            payload,
        }
    }
}

/// Client -> Server message envelope.
///
/// A missing `payload` deserializes to `null` so that the envelope itself
/// still parses and the payload check can reject it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Event names.
pub mod msg_types {
    /// Client pushes its latest output (client -> server).
    pub const CLIENT_DATA: &str = "client_data";
    /// Rebroadcast of a client update (server -> all clients).
    pub const UPDATE_DATA: &str = "update_data";
}

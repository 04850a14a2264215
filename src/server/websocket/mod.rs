//! WebSocket infrastructure for the relay event transport.

pub mod connection;
pub mod handler;
pub mod messages;

pub use connection::{BroadcastReport, ConnectionId, ConnectionManager, DEFAULT_OUTGOING_BUFFER};
pub use handler::ws_handler;
pub use messages::{msg_types, ClientMessage, ServerMessage};

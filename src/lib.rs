//! Output Relay Library
//!
//! Clients push `{client_id, output}` updates over a WebSocket and every
//! update is rebroadcast to all connected clients. The library exposes the
//! relay and server modules for the binary and for end-to-end tests.

pub mod config;
pub mod relay;
pub mod server;

// Re-export commonly used types for convenience
pub use relay::{ClientUpdate, Relay};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};

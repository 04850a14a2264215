//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestClient, TestServer};
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_echo() {
//!     let server = TestServer::spawn().await;
//!     let mut client = TestClient::connect(&server).await;
//!     server.wait_for_connections(1).await;
//!
//!     client.send_update("A", json!("hello")).await;
//!     assert_eq!(client.expect_update().await, json!({"client_id": "A", "output": "hello"}));
//! }
//! ```

mod client;
mod constants;
mod server;

// Public API - this is what tests import
pub use client::TestClient;
#[allow(unused_imports)]
pub use constants::*;
pub use server::TestServer;

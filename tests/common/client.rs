//! WebSocket test client

use super::constants::*;
use super::server::TestServer;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

/// A relay client speaking the JSON envelope protocol
pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    /// Opens a WebSocket connection to the test server
    pub async fn connect(server: &TestServer) -> Self {
        let (ws, _) = connect_async(server.ws_url.as_str())
            .await
            .expect("Failed to connect to WebSocket");
        Self { ws }
    }

    /// Sends a well-formed `client_data` event
    pub async fn send_update(&mut self, client_id: &str, output: Value) {
        self.send_json(json!({
            "type": CLIENT_DATA,
            "payload": {"client_id": client_id, "output": output},
        }))
        .await;
    }

    pub async fn send_json(&mut self, value: Value) {
        self.send_text(&value.to_string()).await;
    }

    pub async fn send_text(&mut self, text: &str) {
        self.ws
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send WebSocket message");
    }

    pub async fn send_binary(&mut self, bytes: &[u8]) {
        self.ws
            .send(Message::Binary(bytes.to_vec().into()))
            .await
            .expect("Failed to send WebSocket message");
    }

    pub async fn send_ping(&mut self, payload: &[u8]) {
        self.ws
            .send(Message::Ping(payload.to_vec().into()))
            .await
            .expect("Failed to send WebSocket ping");
    }

    /// Waits for a pong echoing `payload`, skipping any other frame
    pub async fn expect_pong(&mut self, payload: &[u8]) {
        let result = timeout(Duration::from_millis(MESSAGE_TIMEOUT_MS), async {
            while let Some(Ok(msg)) = self.ws.next().await {
                if let Message::Pong(data) = msg {
                    if data.as_ref() == payload {
                        return true;
                    }
                }
            }
            false
        })
        .await;

        assert_eq!(result, Ok(true), "Expected a pong");
    }

    /// Waits for the next `update_data` event and returns its payload, or
    /// `None` if nothing arrives in `timeout_duration`.
    pub async fn next_update(&mut self, timeout_duration: Duration) -> Option<Value> {
        let result = timeout(timeout_duration, async {
            while let Some(Ok(msg)) = self.ws.next().await {
                if let Message::Text(text) = msg {
                    if let Ok(json) = serde_json::from_str::<Value>(&text) {
                        if json.get("type").and_then(|t| t.as_str()) == Some(UPDATE_DATA) {
                            return json.get("payload").cloned();
                        }
                    }
                }
            }
            None
        })
        .await;

        result.ok().flatten()
    }

    /// Like `next_update`, panicking if nothing arrives in time
    pub async fn expect_update(&mut self) -> Value {
        self.next_update(Duration::from_millis(MESSAGE_TIMEOUT_MS))
            .await
            .expect("Expected an update_data event")
    }

    /// Asserts no `update_data` event arrives for a short while
    pub async fn expect_silence(&mut self) {
        let received = self
            .next_update(Duration::from_millis(QUIET_PERIOD_MS))
            .await;
        assert!(received.is_none(), "Unexpected update: {:?}", received);
    }

    pub async fn close(mut self) {
        self.ws.close(None).await.ok();
    }
}

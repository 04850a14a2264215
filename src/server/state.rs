use axum::extract::FromRef;
use std::sync::Arc;

use crate::relay::Relay;

use super::ServerConfig;

pub type GuardedRelay = Arc<Relay>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub relay: GuardedRelay,
}

impl FromRef<ServerState> for GuardedRelay {
    fn from_ref(input: &ServerState) -> Self {
        input.relay.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

use std::collections::HashMap;

use serde_json::Value;

/// Last output received for every client id ever seen.
///
/// Entries are overwritten, never removed: the map grows with the number of
/// distinct client ids for the lifetime of the relay.
#[derive(Debug, Default)]
pub struct LatestOutputs {
    outputs: HashMap<String, Value>,
}

impl LatestOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `output` for `client_id`, returning the value it replaced.
    pub fn record(&mut self, client_id: String, output: Value) -> Option<Value> {
        self.outputs.insert(client_id, output)
    }

    pub fn get(&self, client_id: &str) -> Option<&Value> {
        self.outputs.get(client_id)
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.outputs.clone()
    }
}

//! Incoming `client_data` payload parsing.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// A single update pushed by a client: the latest `output` for `client_id`.
///
/// The same shape is rebroadcast to every connection as `update_data`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientUpdate {
    pub client_id: String,
    pub output: Value,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum UpdateError {
    #[error("payload is not a JSON object")]
    NotAnObject,
    #[error("payload is missing the `{0}` field")]
    MissingField(&'static str),
    #[error("`client_id` must be a string")]
    InvalidClientId,
}

impl UpdateError {
    /// Short label used when counting rejected messages.
    pub fn reason(&self) -> &'static str {
        match self {
            UpdateError::NotAnObject => "not_an_object",
            UpdateError::MissingField("client_id") => "missing_client_id",
            UpdateError::MissingField(_) => "missing_output",
            UpdateError::InvalidClientId => "invalid_client_id",
        }
    }
}

impl ClientUpdate {
    pub fn new(client_id: impl Into<String>, output: impl Into<Value>) -> Self {
        Self {
            client_id: client_id.into(),
            output: output.into(),
        }
    }

    /// Extract an update from a raw message payload.
    ///
    /// Only the presence of both fields is checked. `output` may be any JSON
    /// value, `null` included; unknown extra fields are discarded.
    pub fn from_payload(payload: Value) -> Result<Self, UpdateError> {
        let Value::Object(mut fields) = payload else {
            return Err(UpdateError::NotAnObject);
        };

        let client_id = match fields.remove("client_id") {
            Some(Value::String(id)) => id,
            Some(_) => return Err(UpdateError::InvalidClientId),
            None => return Err(UpdateError::MissingField("client_id")),
        };

        let output = fields
            .remove("output")
            .ok_or(UpdateError::MissingField("output"))?;

        Ok(Self { client_id, output })
    }

    /// The `update_data` payload rebroadcast for this update.
    pub fn to_payload(&self) -> Value {
        json!({
            "client_id": self.client_id,
            "output": self.output,
        })
    }
}

//! Bridge envelope: request builders and reply normalization.
//!
//! Requests are JSON bodies with a `type` discriminator
//! (`search` / `read` / `exec`); replies carry `status`, `value`, and an
//! optional `error` message.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ClientError;

pub fn search_request(pattern: &str) -> Value {
    json!({ "type": "search", "mbean": pattern })
}

pub fn read_request(mbean: &str, attribute: Option<&str>) -> Value {
    match attribute {
        Some(attribute) => json!({ "type": "read", "mbean": mbean, "attribute": attribute }),
        None => json!({ "type": "read", "mbean": mbean }),
    }
}

pub fn exec_request(mbean: &str, operation: &str, arguments: Vec<Value>) -> Value {
    json!({
        "type": "exec",
        "mbean": mbean,
        "operation": operation,
        "arguments": arguments,
    })
}

/// One bridge reply envelope.
#[derive(Debug, Deserialize)]
pub struct BridgeResponse {
    pub status: u16,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_type: Option<String>,
}

impl BridgeResponse {
    /// Unwrap a reply into its value, mapping non-200 statuses and
    /// value-less successes to errors.
    pub fn into_value(self) -> Result<Value, ClientError> {
        if self.status != 200 {
            let message = match (self.error, self.error_type) {
                (Some(error), Some(kind)) => format!("{kind}: {error}"),
                (Some(error), None) => error,
                (None, _) => "no error message".to_string(),
            };
            return Err(ClientError::Bridge {
                status: self.status,
                message,
            });
        }
        self.value
            .ok_or_else(|| ClientError::MalformedResponse("success reply without value".into()))
    }
}

/// Parse a raw reply body into its envelope.
pub fn parse_response(body: Value) -> Result<BridgeResponse, ClientError> {
    serde_json::from_value(body)
        .map_err(|err| ClientError::MalformedResponse(format!("invalid envelope: {err}")))
}

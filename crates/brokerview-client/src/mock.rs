//! In-process stand-in for the bridge, used by client and console tests.
//!
//! Registers mbeans with attribute maps and stubbed operation results,
//! then answers `search`/`read`/`exec` bodies the way the real bridge
//! does, including its error envelopes.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::client::Endpoint;
use crate::error::ClientError;

/// One recorded `exec` invocation, for assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecCall {
    pub mbean: String,
    pub operation: String,
    pub arguments: Vec<Value>,
}

#[derive(Default)]
pub struct MockBroker {
    mbeans: Mutex<BTreeMap<String, Value>>,
    exec_results: Mutex<HashMap<(String, String), Value>>,
    calls: Mutex<Vec<ExecCall>>,
}

impl MockBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an mbean with its attribute object.
    pub async fn register(&self, name: impl Into<String>, attributes: Value) {
        self.mbeans.lock().await.insert(name.into(), attributes);
    }

    /// Stub the result of one operation on one mbean.
    pub async fn stub_exec(
        &self,
        mbean: impl Into<String>,
        operation: impl Into<String>,
        result: Value,
    ) {
        self.exec_results
            .lock()
            .await
            .insert((mbean.into(), operation.into()), result);
    }

    /// Recorded `exec` invocations, in call order.
    pub async fn exec_calls(&self) -> Vec<ExecCall> {
        self.calls.lock().await.clone()
    }

    async fn handle_search(&self, pattern: &str) -> Value {
        // Trailing '*' is a prefix wildcard, matching how the console
        // queries `domain:*` and `domain:broker=...,*` patterns.
        let names: Vec<String> = {
            let mbeans = self.mbeans.lock().await;
            match pattern.strip_suffix('*') {
                Some(prefix) => {
                    let prefix = prefix.strip_suffix(',').unwrap_or(prefix);
                    mbeans
                        .keys()
                        .filter(|name| name.starts_with(prefix))
                        .cloned()
                        .collect()
                }
                None => mbeans.keys().filter(|name| *name == pattern).cloned().collect(),
            }
        };
        json!({ "status": 200, "value": names })
    }

    async fn handle_read(&self, mbean: &str, attribute: Option<&str>) -> Value {
        let mbeans = self.mbeans.lock().await;
        let Some(attributes) = mbeans.get(mbean) else {
            return not_found(format!("no such mbean: {mbean}"));
        };
        match attribute {
            None => json!({ "status": 200, "value": attributes }),
            Some(attribute) => match attributes.get(attribute) {
                Some(value) => json!({ "status": 200, "value": value }),
                None => not_found(format!("no attribute {attribute} on {mbean}")),
            },
        }
    }

    async fn handle_exec(&self, mbean: &str, operation: &str, arguments: Vec<Value>) -> Value {
        self.calls.lock().await.push(ExecCall {
            mbean: mbean.to_string(),
            operation: operation.to_string(),
            arguments,
        });
        let results = self.exec_results.lock().await;
        match results.get(&(mbean.to_string(), operation.to_string())) {
            Some(result) => json!({ "status": 200, "value": result }),
            None => json!({
                "status": 500,
                "error": format!("operation {operation} not stubbed on {mbean}"),
                "error_type": "javax.management.MBeanException",
            }),
        }
    }
}

#[async_trait]
impl Endpoint for MockBroker {
    async fn post(&self, body: Value) -> Result<Value, ClientError> {
        let kind = body.get("type").and_then(Value::as_str).unwrap_or_default();
        let mbean = body.get("mbean").and_then(Value::as_str).unwrap_or_default();
        let reply = match kind {
            "search" => self.handle_search(mbean).await,
            "read" => {
                let attribute = body.get("attribute").and_then(Value::as_str);
                self.handle_read(mbean, attribute).await
            }
            "exec" => {
                let operation = body.get("operation").and_then(Value::as_str).unwrap_or_default();
                let arguments = body
                    .get("arguments")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                self.handle_exec(mbean, operation, arguments).await
            }
            other => json!({
                "status": 400,
                "error": format!("unsupported request type: {other}"),
            }),
        };
        Ok(reply)
    }
}

fn not_found(message: String) -> Value {
    json!({
        "status": 404,
        "error": message,
        "error_type": "javax.management.InstanceNotFoundException",
    })
}

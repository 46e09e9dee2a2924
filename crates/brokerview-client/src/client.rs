//! The management client and its transport seam.

use async_trait::async_trait;
use serde_json::Value;

use brokerview_mbean::AttrValue;

use crate::error::ClientError;
use crate::jolokia::{exec_request, parse_response, read_request, search_request};

/// Transport seam for the bridge: post one JSON body, get one JSON body.
///
/// The console never depends on how replies travel; HTTP polling and an
/// in-process mock implement the same trait.
#[async_trait]
pub trait Endpoint: Send + Sync {
    async fn post(&self, body: Value) -> Result<Value, ClientError>;
}

/// Bridge endpoint over HTTP with optional basic auth.
pub struct HttpEndpoint {
    url: String,
    http: reqwest::Client,
    credentials: Option<(String, String)>,
}

impl HttpEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        HttpEndpoint {
            url: url.into(),
            http: reqwest::Client::new(),
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }
}

#[async_trait]
impl Endpoint for HttpEndpoint {
    async fn post(&self, body: Value) -> Result<Value, ClientError> {
        let mut request = self.http.post(&self.url).json(&body);
        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, Some(password));
        }
        let reply = request.send().await?.error_for_status()?;
        Ok(reply.json().await?)
    }
}

/// Typed operations over one bridge endpoint.
pub struct ManagementClient<E: Endpoint> {
    endpoint: E,
}

impl<E: Endpoint> ManagementClient<E> {
    pub fn new(endpoint: E) -> Self {
        ManagementClient { endpoint }
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// List object names matching `pattern` (`domain:props,*` style).
    ///
    /// Non-string entries in the reply list are logged and dropped; the
    /// tree builder depends only on this list's shape.
    pub async fn search(&self, pattern: &str) -> Result<Vec<String>, ClientError> {
        let value = self.roundtrip(search_request(pattern)).await?;
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(ClientError::MalformedResponse(format!(
                    "search reply is not a list: {other}"
                )))
            }
        };
        let mut names = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::String(name) => names.push(name),
                other => tracing::warn!(entry = %other, "dropping non-string search entry"),
            }
        }
        tracing::debug!(pattern, count = names.len(), "bridge search");
        Ok(names)
    }

    /// Read one attribute, or all attributes (as a mapping) when
    /// `attribute` is `None`.
    pub async fn read(&self, mbean: &str, attribute: Option<&str>) -> Result<AttrValue, ClientError> {
        let value = self.roundtrip(read_request(mbean, attribute)).await?;
        Ok(AttrValue::from_json(value))
    }

    /// Invoke a management operation.
    pub async fn exec(
        &self,
        mbean: &str,
        operation: &str,
        arguments: Vec<Value>,
    ) -> Result<AttrValue, ClientError> {
        tracing::debug!(mbean, operation, "bridge exec");
        let value = self.roundtrip(exec_request(mbean, operation, arguments)).await?;
        Ok(AttrValue::from_json(value))
    }

    async fn roundtrip(&self, body: Value) -> Result<Value, ClientError> {
        let reply = self.endpoint.post(body).await?;
        parse_response(reply)?.into_value()
    }
}

//! The single outbound request: `{message}` in, `{reply}` out.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{ChatReply, ChatRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request never produced a response (connect, timeout, TLS).
    Network(String),
    /// The service answered with a non-success status.
    Status { status: u16, body: String },
    /// The response body was not a `{"reply": string}` object.
    Decode(String),
}

impl TransportError {
    /// One-line description suitable for logs.
    pub fn summary(&self) -> String {
        match self {
            TransportError::Network(detail) => format!("network error: {}", collapse(detail)),
            TransportError::Status { status, body } => match extract_error_summary(body) {
                Some(summary) => format!("HTTP {status}: {summary}"),
                None if body.trim().is_empty() => format!("HTTP {status}"),
                None => format!("HTTP {status}: {}", collapse(body)),
            },
            TransportError::Decode(detail) => format!("malformed reply: {}", collapse(detail)),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for TransportError {}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pull a human-readable message out of a JSON error body, if there is one.
fn extract_error_summary(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body.trim()).ok()?;
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        })?;
    let collapsed = collapse(&summary);
    (!collapsed.is_empty()).then_some(collapsed)
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, message: &str) -> Result<String, TransportError>;
}

/// Posts JSON to a fixed endpoint over HTTP(S).
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, endpoint))
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, message: &str) -> Result<String, TransportError> {
        let request = ChatRequest {
            message: message.to_string(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;
        debug!(
            endpoint = %self.endpoint,
            status = status.as_u16(),
            bytes = body.len(),
            "Chat response received"
        );

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<ChatReply>(&body)
            .map(|reply| reply.reply)
            .map_err(|err| TransportError::Decode(err.to_string()))
    }
}

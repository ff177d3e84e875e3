//! HTTP client for the chatbot server (POST /chat, POST /reset).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, Result};

const CHAT_PATH: &str = "/chat";
const RESET_PATH: &str = "/reset";

/// What the server said back to a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    /// `{"response": "..."}`
    Response(String),
    /// `{"error": "..."}`, reported by the server itself.
    Error(String),
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponseBody {
    #[serde(default)]
    response: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

impl ChatResponseBody {
    /// A truthy `error` wins over `response`.
    fn into_reply(self) -> Option<ChatReply> {
        if let Some(err) = self.error.and_then(truthy_text) {
            return Some(ChatReply::Error(err));
        }
        match self.response {
            Some(Value::String(s)) => Some(ChatReply::Response(s)),
            _ => None,
        }
    }
}

fn truthy_text(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// The server the chat pane talks to.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one message (already trimmed) and wait for the reply.
    async fn send(&self, message: &str) -> Result<ChatReply>;

    /// Drop the server-side conversation history.
    async fn reset(&self) -> Result<()>;

    /// Shown in the header.
    fn base_url(&self) -> &str;
}

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// `timeout` of `None` lets a request run until the transport gives up.
    pub fn new(base_url: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send(&self, message: &str) -> Result<ChatReply> {
        let url = self.endpoint(CHAT_PATH);
        tracing::debug!(%url, len = message.len(), "sending chat message");

        let resp = self
            .client
            .post(&url)
            .json(&ChatRequest { message })
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;

        // The server answers failures with a 500 and an `error` body, so the
        // body is parsed before the status is looked at.
        let body: ChatResponseBody = match serde_json::from_str(&text) {
            Ok(b) => b,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => return Err(ClientError::Status { status, body: text }),
        };

        match body.into_reply() {
            Some(reply @ ChatReply::Error(_)) => Ok(reply),
            Some(reply) if status.is_success() => Ok(reply),
            _ if !status.is_success() => Err(ClientError::Status { status, body: text }),
            _ => Err(ClientError::Malformed(text)),
        }
    }

    async fn reset(&self) -> Result<()> {
        let url = self.endpoint(RESET_PATH);
        tracing::debug!(%url, "resetting conversation");

        let resp = self.client.post(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status,
                body: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

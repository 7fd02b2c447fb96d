//! Core types: inbound message, handler response, and the Handler trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single text event seen on the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    /// Nickname of whoever wrote the line.
    pub sender: String,
    /// Channel (or user, for private lines) the line was addressed to.
    pub target: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Builds an incoming message stamped with the current time.
    pub fn incoming(
        sender: impl Into<String>,
        target: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let sender = sender.into();
        let created_at = Utc::now();
        Self {
            id: format!("{}-{}", sender, created_at.timestamp_micros()),
            sender,
            target: target.into(),
            content: content.into(),
            created_at,
        }
    }
}

/// Handler result for the chain. `Reply(text)` carries the response body so later handlers can use it in `after()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; no response body.
    Stop,
    /// Skip this handler, try next.
    Ignore,
    /// Stop the chain and attach reply text.
    Reply(String),
}

/// Single handler concept: optional before / handle / after. Chain runs all before → handle until Stop/Reply → all after (reverse).
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _message: &Message) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the message. Return Stop or Reply to end the handle phase. Default: Continue.
    async fn handle(&self, _message: &Message) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final response.
    async fn after(
        &self,
        _message: &Message,
        _response: &HandlerResponse,
    ) -> crate::error::Result<()> {
        Ok(())
    }
}

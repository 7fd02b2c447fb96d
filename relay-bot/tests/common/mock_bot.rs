//! Mock implementation of [`relay_core::Bot`] for integration tests.
//!
//! Every `send_message(target, text)` is forwarded over an unbounded channel so tests can assert
//! on the exact lines the session put on the wire.

use async_trait::async_trait;
use relay_core::{Bot, Result};
use std::sync::Arc;
use tokio::sync::mpsc;

/// One recorded call to `send_message(target, text)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentLine {
    pub target: String,
    pub text: String,
}

pub struct MockBot {
    tx: mpsc::UnboundedSender<SentLine>,
}

impl MockBot {
    /// Creates a MockBot and returns the receiver for sent lines.
    pub fn with_receiver() -> (Arc<Self>, mpsc::UnboundedReceiver<SentLine>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, target: &str, text: &str) -> Result<()> {
        let _ = self.tx.send(SentLine {
            target: target.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}

/// Texts sent so far, without waiting.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<SentLine>) -> Vec<String> {
    let mut texts = Vec::new();
    while let Ok(line) = rx.try_recv() {
        texts.push(line.text);
    }
    texts
}

//! Bot abstraction for delivering text to a channel or user.
//!
//! [`Bot`] is transport-agnostic: the connector that owns the socket (IRC, console, ...) implements it,
//! the session controller only ever calls `send_message`.

use crate::error::Result;
use async_trait::async_trait;

/// Outbound half of a transport connector.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends one line of text to `target` (a channel name or a user name).
    async fn send_message(&self, target: &str, text: &str) -> Result<()>;
}

/// Splits a transport line of the form `<sender> <text>` into its parts. Returns `None` when the
/// line has no sender or no text.
pub fn split_sender_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    let (sender, text) = line.split_once(char::is_whitespace)?;
    let text = text.trim_start();
    if sender.is_empty() || text.is_empty() {
        return None;
    }
    Some((sender, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sender_line_valid() {
        assert_eq!(split_sender_line("alice relay: hi"), Some(("alice", "relay: hi")));
        assert_eq!(split_sender_line("  bob   hello  "), Some(("bob", "hello")));
    }

    #[test]
    fn test_split_sender_line_invalid() {
        assert_eq!(split_sender_line(""), None);
        assert_eq!(split_sender_line("alice"), None);
        assert_eq!(split_sender_line("   "), None);
    }
}

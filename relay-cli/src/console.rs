//! Console transport: stdin lines are inbound messages, sends are printed to stdout.

use async_trait::async_trait;
use relay_core::{split_sender_line, Bot, Message, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

pub struct ConsoleBot;

#[async_trait]
impl Bot for ConsoleBot {
    async fn send_message(&self, target: &str, text: &str) -> Result<()> {
        let mut out = tokio::io::stdout();
        out.write_all(format!("[{}] {}\n", target, text).as_bytes())
            .await?;
        out.flush().await?;
        Ok(())
    }
}

/// Reads `<sender> <text>` lines until EOF and forwards them as messages on `channel`. Returns the
/// number of lines forwarded.
pub async fn forward_lines<R>(reader: R, channel: &str, tx: mpsc::Sender<Message>) -> usize
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut forwarded = 0;
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Failed to read input");
                break;
            }
        };
        let Some((sender, text)) = split_sender_line(&line) else {
            if !line.trim().is_empty() {
                warn!(line = %line, "Expected '<sender> <text>'");
            }
            continue;
        };
        if tx
            .send(Message::incoming(sender, channel, text))
            .await
            .is_err()
        {
            break;
        }
        forwarded += 1;
    }
    info!(forwarded, "Input closed");
    forwarded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_forward_lines_skips_malformed() {
        let input: &[u8] = b"alice relay: hi\n\nlonely\nbob   relay, !clear\n";
        let (tx, mut rx) = mpsc::channel(8);

        let forwarded = forward_lines(input, "#lobby", tx).await;
        assert_eq!(forwarded, 2);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.sender, "alice");
        assert_eq!(first.target, "#lobby");
        assert_eq!(first.content, "relay: hi");
        let second = rx.recv().await.unwrap();
        assert_eq!(second.sender, "bob");
        assert_eq!(second.content, "relay, !clear");
        assert!(rx.recv().await.is_none());
    }
}

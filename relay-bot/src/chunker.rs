//! Reply chunker and pacer.
//!
//! Replies are cut into lines no longer than the channel's message budget (counted in chars) and
//! sent one by one with a fixed pause in between. Line breaks always end a chunk.

use relay_core::Bot;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Splits `text` into non-empty chunks of at most `max_size` chars. A `max_size` of 0 counts as 1.
pub fn chunk(text: &str, max_size: usize) -> Vec<String> {
    let max_size = max_size.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for c in text.chars() {
        if c == '\n' || c == '\r' {
            flush(&mut chunks, &mut current, &mut current_len);
            continue;
        }
        if current_len + 1 > max_size {
            flush(&mut chunks, &mut current, &mut current_len);
        }
        current.push(c);
        current_len += 1;
    }
    flush(&mut chunks, &mut current, &mut current_len);
    chunks
}

fn flush(chunks: &mut Vec<String>, current: &mut String, current_len: &mut usize) {
    if !current.is_empty() {
        chunks.push(std::mem::take(current));
    }
    *current_len = 0;
}

/// Sends `text` to `target` in chunks, the first one prefixed with `user: `. Sleeps `delay`
/// between sends. A failed send is logged and the rest are still tried. Returns the number of
/// chunks delivered.
#[instrument(skip(bot, text))]
pub async fn send_paced(
    bot: &dyn Bot,
    target: &str,
    user: &str,
    text: &str,
    max_size: usize,
    delay: Duration,
) -> usize {
    let chunks = chunk(text, max_size);
    let total = chunks.len();
    let mut delivered = 0;

    for (i, part) in chunks.iter().enumerate() {
        let line = if i == 0 {
            format!("{}: {}", user, part)
        } else {
            part.clone()
        };
        match bot.send_message(target, &line).await {
            Ok(()) => delivered += 1,
            Err(e) => error!(error = %e, chunk = i, total, "Failed to send reply chunk"),
        }
        if i + 1 < total {
            tokio::time::sleep(delay).await;
        }
    }
    debug!(delivered, total, "Reply sent");
    delivered
}

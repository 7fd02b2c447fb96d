//! Per-turn completion faults. None of them are fatal: callers turn them into an apology line
//! with [`CompletionError::apology`] and send it through the normal reply path.

use thiserror::Error;
use transcript::TranscriptError;

pub const MSG_ENCODE_FAILED: &str = "Error encoding request payload.";
pub const MSG_SEND_FAILED: &str = "Error sending request.";
pub const MSG_READ_FAILED: &str = "Error reading response.";
pub const MSG_PARSE_FAILED: &str = "Error parsing response.";
pub const MSG_STATUS_FAILED: &str = "The completion service returned an error.";
pub const MSG_TRANSCRIPT_FAILED: &str = "I could not access my memory.";
pub const MSG_CLIENT_FAILED: &str = "Error creating request.";

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Failed to encode request payload: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("Completion service answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to read response body: {0}")]
    Read(#[source] reqwest::Error),
    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),
}

impl CompletionError {
    /// User-facing line for this fault.
    pub fn apology(&self) -> &'static str {
        match self {
            CompletionError::Client(_) => MSG_CLIENT_FAILED,
            CompletionError::Encode(_) => MSG_ENCODE_FAILED,
            CompletionError::Request(_) => MSG_SEND_FAILED,
            CompletionError::Status { .. } => MSG_STATUS_FAILED,
            CompletionError::Read(_) => MSG_READ_FAILED,
            CompletionError::Decode(_) => MSG_PARSE_FAILED,
            CompletionError::Transcript(_) => MSG_TRANSCRIPT_FAILED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apologies_are_distinct() {
        let decode = CompletionError::Decode(serde_json::from_str::<u8>("x").unwrap_err());
        let status = CompletionError::Status {
            status: 500,
            body: "boom".into(),
        };
        let transcript = CompletionError::Transcript(TranscriptError::NoArchives);
        let all = [decode.apology(), status.apology(), transcript.apology()];
        assert_eq!(all, [MSG_PARSE_FAILED, MSG_STATUS_FAILED, MSG_TRANSCRIPT_FAILED]);
    }
}

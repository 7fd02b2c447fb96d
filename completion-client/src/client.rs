//! HTTP client for the completion endpoint.
//!
//! One POST per turn, JSON body, bearer token. In chat mode the transcript is updated around the
//! call: the user entry is written before the request goes out, the assistant entry (and the
//! optional reminder) after a reply comes back.

use crate::error::CompletionError;
use crate::mode::ApiMode;
use crate::params::GenerationParams;
use crate::payload::{chat_payload, parse_chat_reply, parse_query_reply, query_payload};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use transcript::{Entry, TranscriptStore};

/// Masks an API key for safe logging: first 7 chars + "***" + last 4 chars.
/// Keys of 11 chars or fewer are fully masked.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

#[derive(Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl CompletionClient {
    /// Builds a client for `api_url`. `timeout` bounds the whole request when set; without it a
    /// hung endpoint keeps the call pending.
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, CompletionError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(CompletionError::Client)?;
        Ok(Self {
            http,
            api_url: api_url.into(),
            api_key: api_key.into(),
        })
    }

    /// POSTs `payload` and returns the raw response body of a successful answer.
    pub async fn post(&self, payload: &Value) -> Result<String, CompletionError> {
        let body = serde_json::to_vec(payload).map_err(CompletionError::Encode)?;
        debug!(
            api_url = %self.api_url,
            api_key = %mask_token(&self.api_key),
            payload = %payload,
            "Sending completion request"
        );

        let response = self
            .http
            .post(&self.api_url)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(&self.api_key)
            .body(body)
            .send()
            .await
            .map_err(CompletionError::Request)?;

        let status = response.status();
        let text = response.text().await.map_err(CompletionError::Read)?;
        debug!(status = status.as_u16(), body = %text, "Received completion response");

        if !status.is_success() {
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }

    /// Runs one turn and returns the reply text (possibly empty).
    ///
    /// - `Chat`: appends `user` to the transcript and persists it, sends the whole transcript,
    ///   then persists the `assistant` reply followed by `reminder` as a `system` entry.
    /// - `Query`: sends only the prompt; the transcript is not touched.
    #[instrument(skip(self, transcript, text, params, reminder))]
    pub async fn complete(
        &self,
        transcript: &TranscriptStore,
        text: &str,
        params: &GenerationParams,
        mode: ApiMode,
        reminder: Option<&str>,
    ) -> Result<String, CompletionError> {
        match mode {
            ApiMode::Chat => {
                let entries = transcript.append(&[Entry::user(text)]).await?;
                info!(
                    entries = entries.len(),
                    params = params.iter_set().count(),
                    "step: chat completion request"
                );
                let body = self.post(&chat_payload(&entries, params)).await?;
                let reply = parse_chat_reply(&body).map_err(CompletionError::Decode)?;

                if !reply.is_empty() {
                    let mut new_entries = vec![Entry::assistant(reply.as_str())];
                    if let Some(reminder) = reminder.filter(|r| !r.trim().is_empty()) {
                        new_entries.push(Entry::system(reminder));
                    }
                    if let Err(e) = transcript.append(&new_entries).await {
                        error!(error = %e, "Failed to persist assistant reply");
                    }
                }
                info!(reply_len = reply.chars().count(), "step: chat completion done");
                Ok(reply)
            }
            ApiMode::Query => {
                info!(
                    params = params.iter_set().count(),
                    "step: query completion request"
                );
                let body = self.post(&query_payload(text, params)).await?;
                let reply = parse_query_reply(&body).map_err(CompletionError::Decode)?;
                info!(reply_len = reply.chars().count(), "step: query completion done");
                Ok(reply)
            }
        }
    }
}

//! Request bodies and reply extraction for both endpoint shapes.

use crate::params::GenerationParams;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use transcript::Entry;

/// `{"messages": [...], "stream": false, <params>}` from the whole transcript, in order.
pub fn chat_payload(entries: &[Entry], params: &GenerationParams) -> Value {
    let messages: Vec<Value> = entries
        .iter()
        .map(|e| json!({ "role": e.role.as_str(), "content": e.content }))
        .collect();
    let mut payload = Map::new();
    payload.insert("messages".into(), Value::Array(messages));
    payload.insert("stream".into(), Value::Bool(false));
    params.merge_into(&mut payload);
    Value::Object(payload)
}

/// `{"prompt": text, "stream": false, <params>}`.
pub fn query_payload(prompt: &str, params: &GenerationParams) -> Value {
    let mut payload = Map::new();
    payload.insert("prompt".into(), Value::String(prompt.to_string()));
    payload.insert("stream".into(), Value::Bool(false));
    params.merge_into(&mut payload);
    Value::Object(payload)
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    content: Option<String>,
}

/// First choice's message content; empty when the response has none.
pub fn parse_chat_reply(body: &str) -> Result<String, serde_json::Error> {
    let response: ChatResponse = serde_json::from_str(body)?;
    Ok(response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .unwrap_or_default())
}

/// Top-level `content`; empty when absent.
pub fn parse_query_reply(body: &str) -> Result<String, serde_json::Error> {
    let response: QueryResponse = serde_json::from_str(body)?;
    Ok(response.content.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_payload_keeps_transcript_order() {
        let entries = vec![
            Entry::system("p"),
            Entry::user("q"),
            Entry::assistant("a"),
            Entry::system("reminder"),
            Entry::user("q2"),
        ];
        let params = GenerationParams {
            temperature: Some(0.25),
            ..Default::default()
        };

        let payload = chat_payload(&entries, &params);

        assert_eq!(
            payload,
            json!({
                "messages": [
                    {"role": "system", "content": "p"},
                    {"role": "user", "content": "q"},
                    {"role": "assistant", "content": "a"},
                    {"role": "system", "content": "reminder"},
                    {"role": "user", "content": "q2"}
                ],
                "stream": false,
                "temperature": 0.25
            })
        );
    }

    #[test]
    fn test_query_payload_has_no_messages() {
        let payload = query_payload("hello", &GenerationParams::default());
        assert_eq!(payload, json!({"prompt": "hello", "stream": false}));
    }

    #[test]
    fn test_parse_chat_reply() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"hi"}},{"message":{"content":"ignored"}}]}"#;
        assert_eq!(parse_chat_reply(body).unwrap(), "hi");
        assert_eq!(parse_chat_reply(r#"{"choices":[]}"#).unwrap(), "");
        assert_eq!(parse_chat_reply(r#"{"error":"x"}"#).unwrap(), "");
        assert!(parse_chat_reply("<html>").is_err());
    }

    #[test]
    fn test_parse_query_reply() {
        assert_eq!(parse_query_reply(r#"{"content":"done","stop":true}"#).unwrap(), "done");
        assert_eq!(parse_query_reply("{}").unwrap(), "");
        assert!(parse_query_reply("").is_err());
    }
}

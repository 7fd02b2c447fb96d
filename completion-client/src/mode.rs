use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which endpoint shape the bot talks to.
///
/// - `Chat`: `/v1/chat/completions` style, whole transcript as `messages`, reply at `choices[0].message.content`.
/// - `Query`: single-prompt `/completion` style, reply at top-level `content`, nothing persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiMode {
    #[default]
    Chat,
    Query,
}

impl fmt::Display for ApiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiMode::Chat => f.write_str("chat"),
            ApiMode::Query => f.write_str("query"),
        }
    }
}

impl FromStr for ApiMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chat" => Ok(ApiMode::Chat),
            "query" => Ok(ApiMode::Query),
            other => Err(format!("unknown api mode '{}' (expected chat or query)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("chat".parse::<ApiMode>().unwrap(), ApiMode::Chat);
        assert_eq!(" Query ".parse::<ApiMode>().unwrap(), ApiMode::Query);
        assert!("stream".parse::<ApiMode>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let mode: ApiMode = serde_json::from_str(r#""query""#).unwrap();
        assert_eq!(mode, ApiMode::Query);
        assert_eq!(serde_json::to_string(&ApiMode::Chat).unwrap(), r#""chat""#);
    }
}

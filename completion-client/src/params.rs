//! Generation parameters: a sparse bag of optional sampling options merged into outbound payloads.
//!
//! Unset options are left out of the request entirely (never sent as `null`). A parameter set is
//! loaded wholesale from a profile file and replaces the active set as a unit.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Cannot read parameter profile: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid parameter profile: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_predict: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_keep: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tfs_z: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typical_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_last_n: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirostat: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirostat_tau: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirostat_eta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_probs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalize_nl: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_eos: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_prompt: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

type Getter = fn(&GenerationParams) -> Option<Value>;

fn float(v: Option<f64>) -> Option<Value> {
    v.and_then(serde_json::Number::from_f64).map(Value::Number)
}

fn int(v: Option<i64>) -> Option<Value> {
    v.map(Value::from)
}

fn flag(v: Option<bool>) -> Option<Value> {
    v.map(Value::Bool)
}

fn text(v: &Option<String>) -> Option<Value> {
    v.clone().map(Value::String)
}

/// Payload key → value for every known option. This table is the wire contract.
///
/// Keys are the snake_case parameter names of the llama.cpp server (`top_k`, `n_predict`), which
/// OpenAI-compatible servers share for the common options; profile files use the same names.
pub static PARAMETERS: &[(&str, Getter)] = &[
    ("model", |p| text(&p.model)),
    ("max_tokens", |p| int(p.max_tokens)),
    ("temperature", |p| float(p.temperature)),
    ("top_k", |p| int(p.top_k)),
    ("top_p", |p| float(p.top_p)),
    ("min_p", |p| float(p.min_p)),
    ("n_predict", |p| int(p.n_predict)),
    ("n_keep", |p| int(p.n_keep)),
    ("tfs_z", |p| float(p.tfs_z)),
    ("typical_p", |p| float(p.typical_p)),
    ("repeat_penalty", |p| float(p.repeat_penalty)),
    ("repeat_last_n", |p| int(p.repeat_last_n)),
    ("presence_penalty", |p| float(p.presence_penalty)),
    ("frequency_penalty", |p| float(p.frequency_penalty)),
    ("mirostat", |p| int(p.mirostat)),
    ("mirostat_tau", |p| float(p.mirostat_tau)),
    ("mirostat_eta", |p| float(p.mirostat_eta)),
    ("seed", |p| int(p.seed)),
    ("n_probs", |p| int(p.n_probs)),
    ("slot_id", |p| int(p.slot_id)),
    ("penalize_nl", |p| flag(p.penalize_nl)),
    ("ignore_eos", |p| flag(p.ignore_eos)),
    ("cache_prompt", |p| flag(p.cache_prompt)),
    ("penalty_prompt", |p| text(&p.penalty_prompt)),
    ("system_prompt", |p| text(&p.system_prompt)),
];

impl GenerationParams {
    /// Reads a profile file (a JSON object, every field optional).
    pub async fn load_profile(path: &Path) -> Result<Self, ProfileError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// The options that are set, in table order.
    pub fn iter_set(&self) -> impl Iterator<Item = (&'static str, Value)> + '_ {
        PARAMETERS
            .iter()
            .filter_map(move |(name, get)| get(self).map(|v| (*name, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter_set().next().is_none()
    }

    /// Copies every set option into `payload` under its key.
    pub fn merge_into(&self, payload: &mut Map<String, Value>) {
        for (name, value) in self.iter_set() {
            payload.insert(name.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fully_set() -> GenerationParams {
        GenerationParams {
            model: Some("m".into()),
            max_tokens: Some(1),
            temperature: Some(0.5),
            top_k: Some(2),
            top_p: Some(0.5),
            min_p: Some(0.5),
            n_predict: Some(3),
            n_keep: Some(4),
            tfs_z: Some(0.5),
            typical_p: Some(0.5),
            repeat_penalty: Some(0.5),
            repeat_last_n: Some(5),
            presence_penalty: Some(0.5),
            frequency_penalty: Some(0.5),
            mirostat: Some(6),
            mirostat_tau: Some(0.5),
            mirostat_eta: Some(0.5),
            seed: Some(7),
            n_probs: Some(8),
            slot_id: Some(9),
            penalize_nl: Some(true),
            ignore_eos: Some(false),
            cache_prompt: Some(true),
            penalty_prompt: Some("pp".into()),
            system_prompt: Some("sp".into()),
        }
    }

    #[test]
    fn test_table_matches_profile_field_names() {
        let params = fully_set();
        let mut merged = Map::new();
        params.merge_into(&mut merged);

        let serialized = serde_json::to_value(&params).unwrap();
        assert_eq!(Value::Object(merged), serialized);
    }

    #[test]
    fn test_table_keys_are_snake_case() {
        for (name, _) in PARAMETERS {
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "{} is not snake_case",
                name
            );
        }
        assert!(PARAMETERS.iter().any(|(name, _)| *name == "n_predict"));
    }

    #[test]
    fn test_default_is_empty() {
        let params = GenerationParams::default();
        assert!(params.is_empty());
        let mut payload = Map::new();
        params.merge_into(&mut payload);
        assert!(payload.is_empty());
    }

    #[test]
    fn test_merge_is_sparse() {
        let params = GenerationParams {
            temperature: Some(0.7),
            top_k: Some(40),
            cache_prompt: Some(true),
            ..Default::default()
        };
        let mut payload = Map::new();
        payload.insert("stream".into(), json!(false));
        params.merge_into(&mut payload);

        assert_eq!(
            Value::Object(payload),
            json!({"stream": false, "temperature": 0.7, "top_k": 40, "cache_prompt": true})
        );
    }

    #[test]
    fn test_nan_float_is_dropped() {
        let params = GenerationParams {
            temperature: Some(f64::NAN),
            ..Default::default()
        };
        assert!(params.is_empty());
    }

    #[test]
    fn test_profile_with_unknown_fields_still_parses() {
        let params: GenerationParams =
            serde_json::from_str(r#"{"temperature": 0.2, "grammar": "x"}"#).unwrap();
        assert_eq!(params.temperature, Some(0.2));
        assert_eq!(params.iter_set().count(), 1);
    }
}

//! Interpretation of raw command-line input.
//!
//! The embedding service shares one argument slot between a single text and
//! a JSON batch; the classification service takes structured optional
//! arguments as strings. Both are resolved here, at the process boundary,
//! into explicit types rather than by implicit coercion deeper in the
//! pipeline.

use serde_json::Value;

use crate::labels::default_skills;

/// Default confidence threshold for classification.
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Embedding input, disambiguated from the raw argument.
///
/// A JSON array selects batch mode; a JSON string selects single mode with
/// the decoded string; any other scalar or a failed parse selects single
/// mode with the literal argument.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbedInput {
    Single(String),
    Batch(Vec<String>),
}

impl EmbedInput {
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => {
                let texts = items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect();
                Self::Batch(texts)
            }
            Ok(Value::String(s)) => Self::Single(s),
            Ok(_) | Err(_) => Self::Single(raw.to_string()),
        }
    }
}

/// Resolve the candidate-label argument.
///
/// Absent or malformed JSON falls back to the built-in vocabulary; a
/// malformed argument is logged but never fatal, so a caller with a broken
/// label list still gets the domain-prior scoring.
pub fn candidate_labels_or_default(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return default_skills();
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(labels) if !labels.is_empty() => labels,
        Ok(_) => {
            tracing::warn!("empty candidate_labels array, using default vocabulary");
            default_skills()
        }
        Err(err) => {
            tracing::warn!(%err, "malformed candidate_labels JSON, using default vocabulary");
            default_skills()
        }
    }
}

/// Parse the threshold argument.
///
/// There is no safe fallback for a malformed threshold, so this is an input
/// error the caller must surface before any model work.
pub fn parse_threshold(raw: Option<&str>) -> Result<f32, String> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_THRESHOLD);
    };
    raw.parse::<f32>()
        .map_err(|_| format!("invalid threshold: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_array_selects_batch_mode() {
        let input = EmbedInput::parse(r#"["first text", "second text"]"#);
        assert_eq!(
            input,
            EmbedInput::Batch(vec!["first text".to_string(), "second text".to_string()])
        );
    }

    #[test]
    fn serialized_list_round_trips_to_batch() {
        let texts = vec!["hello world".to_string(), "goodbye".to_string()];
        let raw = serde_json::to_string(&texts).unwrap();
        assert_eq!(EmbedInput::parse(&raw), EmbedInput::Batch(texts));
    }

    #[test]
    fn plain_string_selects_single_mode() {
        let input = EmbedInput::parse("hello world");
        assert_eq!(input, EmbedInput::Single("hello world".to_string()));
    }

    #[test]
    fn json_string_is_decoded() {
        let input = EmbedInput::parse(r#""quoted text""#);
        assert_eq!(input, EmbedInput::Single("quoted text".to_string()));
    }

    #[test]
    fn json_scalar_keeps_literal_argument() {
        assert_eq!(EmbedInput::parse("42"), EmbedInput::Single("42".to_string()));
    }

    #[test]
    fn mixed_array_renders_non_strings() {
        let input = EmbedInput::parse(r#"["text", 7]"#);
        assert_eq!(
            input,
            EmbedInput::Batch(vec!["text".to_string(), "7".to_string()])
        );
    }

    #[test]
    fn empty_array_is_an_empty_batch() {
        assert_eq!(EmbedInput::parse("[]"), EmbedInput::Batch(vec![]));
    }

    #[test]
    fn missing_labels_use_default_vocabulary() {
        let labels = candidate_labels_or_default(None);
        assert_eq!(labels.len(), 46);
        assert_eq!(labels[0], "javascript");
    }

    #[test]
    fn valid_labels_override_default() {
        let labels = candidate_labels_or_default(Some(r#"["haskell", "prolog"]"#));
        assert_eq!(labels, vec!["haskell", "prolog"]);
    }

    #[test]
    fn malformed_labels_fall_back_to_default() {
        let labels = candidate_labels_or_default(Some("[not json"));
        assert_eq!(labels.len(), 46);
    }

    #[test]
    fn empty_labels_fall_back_to_default() {
        let labels = candidate_labels_or_default(Some("[]"));
        assert_eq!(labels.len(), 46);
    }

    #[test]
    fn threshold_defaults_when_absent() {
        assert_eq!(parse_threshold(None).unwrap(), DEFAULT_THRESHOLD);
    }

    #[test]
    fn threshold_parses_floats() {
        assert_eq!(parse_threshold(Some("0.75")).unwrap(), 0.75);
    }

    #[test]
    fn threshold_rejects_garbage() {
        let err = parse_threshold(Some("very high")).unwrap_err();
        assert!(err.contains("invalid threshold"));
    }
}

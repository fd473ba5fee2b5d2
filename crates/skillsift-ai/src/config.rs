//! Model location and `config.json` metadata.
//!
//! Model directories are provisioned out-of-band (each holds `model.onnx`,
//! `tokenizer.json`, and for classifier/NER models a HuggingFace-style
//! `config.json`). The root is taken from `SKILLSIFT_MODELS_DIR`, with one
//! override variable per model.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AiError;

/// Default models root, relative to the working directory.
pub const DEFAULT_MODELS_DIR: &str = "models";

/// Default sub-directory for the zero-shot NLI cross-encoder.
pub const NLI_MODEL_DIR: &str = "bart-large-mnli";
/// Default sub-directory for the sentence-embedding model.
pub const EMBED_MODEL_DIR: &str = "all-MiniLM-L6-v2";
/// Default sub-directory for the token-classification model.
pub const NER_MODEL_DIR: &str = "bert-base-NER";

/// Root directory holding all model sub-directories.
pub fn models_dir() -> PathBuf {
    std::env::var("SKILLSIFT_MODELS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODELS_DIR))
}

pub fn nli_model_dir() -> PathBuf {
    resolve(std::env::var("SKILLSIFT_NLI_MODEL").ok(), NLI_MODEL_DIR)
}

pub fn embed_model_dir() -> PathBuf {
    resolve(std::env::var("SKILLSIFT_EMBED_MODEL").ok(), EMBED_MODEL_DIR)
}

pub fn ner_model_dir() -> PathBuf {
    resolve(std::env::var("SKILLSIFT_NER_MODEL").ok(), NER_MODEL_DIR)
}

/// An override that is itself a path replaces the whole location; a bare
/// name is resolved under the models root.
fn resolve(override_name: Option<String>, default_name: &str) -> PathBuf {
    match override_name {
        Some(name) if name.contains(std::path::MAIN_SEPARATOR) => PathBuf::from(name),
        Some(name) => models_dir().join(name),
        None => models_dir().join(default_name),
    }
}

/// The slice of a HuggingFace `config.json` this layer consumes.
#[derive(Debug, Default, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub id2label: HashMap<String, String>,
}

impl ModelConfig {
    /// Load `config.json` from a model directory.
    pub fn load(model_dir: &Path) -> Result<Self, AiError> {
        let path = model_dir.join("config.json");
        if !path.exists() {
            return Err(AiError::MissingAsset(path));
        }
        let raw = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Labels ordered by numeric id; non-numeric ids are dropped.
    pub fn labels_in_order(&self) -> Vec<String> {
        let mut entries: Vec<(usize, &String)> = self
            .id2label
            .iter()
            .filter_map(|(id, label)| id.parse::<usize>().ok().map(|id| (id, label)))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries.into_iter().map(|(_, label)| label.clone()).collect()
    }

    /// Index of the entailment label, for NLI cross-encoders.
    pub fn entailment_id(&self) -> Option<usize> {
        self.labels_in_order()
            .iter()
            .position(|label| label.to_lowercase().starts_with("entail"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mnli_config() -> ModelConfig {
        serde_json::from_str(
            r#"{"id2label": {"0": "contradiction", "1": "neutral", "2": "entailment"}}"#,
        )
        .unwrap()
    }

    #[test]
    fn labels_sorted_by_numeric_id() {
        let cfg: ModelConfig =
            serde_json::from_str(r#"{"id2label": {"2": "c", "0": "a", "1": "b"}}"#).unwrap();
        assert_eq!(cfg.labels_in_order(), vec!["a", "b", "c"]);
    }

    #[test]
    fn entailment_id_found_for_mnli_order() {
        assert_eq!(mnli_config().entailment_id(), Some(2));
    }

    #[test]
    fn entailment_id_case_insensitive() {
        let cfg: ModelConfig =
            serde_json::from_str(r#"{"id2label": {"0": "ENTAILMENT", "1": "NEUTRAL"}}"#).unwrap();
        assert_eq!(cfg.entailment_id(), Some(0));
    }

    #[test]
    fn missing_table_yields_no_entailment() {
        let cfg = ModelConfig::default();
        assert!(cfg.labels_in_order().is_empty());
        assert_eq!(cfg.entailment_id(), None);
    }

    #[test]
    fn bare_override_resolves_under_root() {
        let dir = resolve(Some("custom-nli".to_string()), NLI_MODEL_DIR);
        assert!(dir.ends_with("custom-nli"));
    }

    #[test]
    fn path_override_replaces_location() {
        let sep = std::path::MAIN_SEPARATOR;
        let dir = resolve(Some(format!("{sep}opt{sep}models{sep}nli")), NLI_MODEL_DIR);
        assert_eq!(dir, PathBuf::from(format!("{sep}opt{sep}models{sep}nli")));
    }

    #[test]
    fn default_resolution_uses_default_name() {
        let dir = resolve(None, EMBED_MODEL_DIR);
        assert!(dir.ends_with(EMBED_MODEL_DIR));
    }
}

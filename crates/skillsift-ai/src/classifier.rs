//! Zero-shot classification over an NLI cross-encoder ONNX export
//! (bart-large-mnli).
//!
//! Each candidate label is phrased as a hypothesis against the input text
//! and scored independently (multi-label mode); the entailment probability
//! becomes the label's confidence.

use std::path::Path;

use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::{info, warn};

use crate::assets;
use crate::config::ModelConfig;
use crate::error::AiError;
use crate::scoring::{entailment_score, hypothesis_for, rank_descending};

/// Truncation limit for the premise/hypothesis pair.
const MAX_LENGTH: usize = 512;

/// Zero-shot classification pipeline.
pub struct ZeroShotClassifier {
    session: Session,
    tokenizer: Tokenizer,
    entailment_id: usize,
    num_labels: usize,
}

impl ZeroShotClassifier {
    /// Load from a directory containing `model.onnx`, `tokenizer.json`,
    /// and a `config.json` with the NLI label table.
    pub fn load(model_dir: &Path) -> Result<Self, AiError> {
        let session = assets::load_session(model_dir)?;
        let tokenizer = assets::load_tokenizer(model_dir, Some(MAX_LENGTH), false)?;

        let config = ModelConfig::load(model_dir)?;
        let num_labels = config.id2label.len();
        let entailment_id = config.entailment_id().unwrap_or_else(|| {
            let fallback = num_labels.saturating_sub(1);
            warn!(fallback, "no entailment label in config, assuming last");
            fallback
        });

        info!(entailment_id, num_labels, "zero-shot classifier ready");
        Ok(Self {
            session,
            tokenizer,
            entailment_id,
            num_labels,
        })
    }

    /// Score every candidate label independently against `text`.
    ///
    /// Returns `(label, confidence)` pairs sorted by descending confidence,
    /// the output order downstream filtering preserves.
    pub fn score_labels(
        &mut self,
        text: &str,
        labels: &[String],
    ) -> Result<Vec<(String, f32)>, AiError> {
        let mut scored = Vec::with_capacity(labels.len());

        for label in labels {
            let score = self.entailment_for(text, label)?;
            scored.push((label.clone(), score));
        }

        Ok(rank_descending(scored))
    }

    /// Run one premise/hypothesis pair through the cross-encoder.
    fn entailment_for(&mut self, text: &str, label: &str) -> Result<f32, AiError> {
        let hypothesis = hypothesis_for(label);
        let encoded = assets::encode_pair(&self.tokenizer, text, &hypothesis)?;
        let shape = encoded.shape();

        let ids_tensor = Tensor::from_array((shape, encoded.input_ids.into_boxed_slice()))?;
        let mask_tensor = Tensor::from_array((shape, encoded.attention_mask.into_boxed_slice()))?;

        let outputs = self.session.run(ort::inputs![
            "input_ids" => ids_tensor,
            "attention_mask" => mask_tensor,
        ])?;

        let logits = outputs
            .get("logits")
            .ok_or_else(|| AiError::ModelOutput("no logits output".to_string()))?;
        let (logits_shape, logits_data) = logits.try_extract_tensor::<f32>()?;
        let dims: &[i64] = logits_shape;

        if dims.len() != 2 || dims[0] != 1 {
            return Err(AiError::ModelOutput(format!(
                "unexpected logits shape {dims:?}"
            )));
        }
        if self.num_labels > 0 && dims[1] as usize != self.num_labels {
            return Err(AiError::ModelOutput(format!(
                "expected {} NLI logits, got {}",
                self.num_labels, dims[1]
            )));
        }

        Ok(entailment_score(logits_data, self.entailment_id))
    }
}

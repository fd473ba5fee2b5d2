//! Named-entity recognition over a token-classification ONNX export
//! (bert-base-NER) with max-score aggregation.

use std::path::Path;

use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::info;

use skillsift_core::envelope::EntitySpan;

use crate::aggregate::{TokenScore, aggregate_spans, condense_whitespace};
use crate::assets::{self, EncodedBatch};
use crate::config::ModelConfig;
use crate::error::AiError;
use crate::math::softmax;

/// Truncation limit matching the BERT export.
const MAX_LENGTH: usize = 512;

/// Token-classification pipeline.
pub struct EntityTagger {
    session: Session,
    tokenizer: Tokenizer,
    labels: Vec<String>,
}

impl EntityTagger {
    /// Load from a directory containing `model.onnx`, `tokenizer.json`,
    /// and a `config.json` with the BIO label table.
    pub fn load(model_dir: &Path) -> Result<Self, AiError> {
        let session = assets::load_session(model_dir)?;
        let tokenizer = assets::load_tokenizer(model_dir, Some(MAX_LENGTH), false)?;
        let labels = ModelConfig::load(model_dir)?.labels_in_order();

        info!(num_labels = labels.len(), "entity tagger ready");
        Ok(Self {
            session,
            tokenizer,
            labels,
        })
    }

    /// Extract entity spans from `text`.
    ///
    /// Whitespace runs are collapsed before inference; reported offsets
    /// refer to the condensed text.
    pub fn extract(&mut self, text: &str) -> Result<Vec<EntitySpan>, AiError> {
        let condensed = condense_whitespace(text);
        if condensed.is_empty() {
            return Ok(vec![]);
        }

        let encoding = self
            .tokenizer
            .encode(condensed.as_str(), true)
            .map_err(|e| AiError::Tokenizer(format!("tokenize: {e}")))?;
        let encoded = EncodedBatch::from_encodings(std::slice::from_ref(&encoding));
        let shape = encoded.shape();

        let ids_tensor = Tensor::from_array((shape, encoded.input_ids.into_boxed_slice()))?;
        let mask_tensor = Tensor::from_array((shape, encoded.attention_mask.into_boxed_slice()))?;
        let type_tensor = Tensor::from_array((shape, encoded.token_type_ids.into_boxed_slice()))?;

        let outputs = self.session.run(ort::inputs![
            "input_ids" => ids_tensor,
            "attention_mask" => mask_tensor,
            "token_type_ids" => type_tensor,
        ])?;

        let logits = outputs
            .get("logits")
            .ok_or_else(|| AiError::ModelOutput("no logits output".to_string()))?;
        let (logits_shape, logits_data) = logits.try_extract_tensor::<f32>()?;
        let dims: &[i64] = logits_shape;

        if dims.len() != 3 || dims[0] != 1 {
            return Err(AiError::ModelOutput(format!(
                "unexpected logits shape {dims:?}"
            )));
        }
        let num_labels = dims[2] as usize;
        if !self.labels.is_empty() && num_labels != self.labels.len() {
            return Err(AiError::ModelOutput(format!(
                "expected {} token labels, got {num_labels}",
                self.labels.len()
            )));
        }

        let tokens = score_tokens(&self.labels, &encoding, logits_data, dims[1] as usize, num_labels);
        Ok(aggregate_spans(&condensed, tokens))
    }
}

/// Per-token argmax over the softmaxed logit rows, skipping special tokens
/// ([CLS], [SEP], padding).
fn score_tokens(
    labels: &[String],
    encoding: &tokenizers::Encoding,
    logits: &[f32],
    seq_len: usize,
    num_labels: usize,
) -> Vec<TokenScore> {
    let pieces = encoding.get_tokens();
    let offsets = encoding.get_offsets();
    let special = encoding.get_special_tokens_mask();

    let count = seq_len.min(pieces.len());
    let mut scored = Vec::with_capacity(count);

    for t in 0..count {
        if special.get(t).copied().unwrap_or(0) == 1 {
            continue;
        }

        let row = &logits[t * num_labels..(t + 1) * num_labels];
        let probs = softmax(row);
        let (best, score) = probs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, &p)| (i, p))
            .unwrap_or((0, 0.0));

        let (start, end) = offsets.get(t).copied().unwrap_or((0, 0));
        scored.push(TokenScore {
            piece: pieces[t].clone(),
            label: labels.get(best).cloned().unwrap_or_default(),
            score,
            start,
            end,
        });
    }

    scored
}

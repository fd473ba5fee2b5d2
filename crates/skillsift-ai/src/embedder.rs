//! Sentence embeddings: mean-pooled, L2-normalized vectors from a
//! sentence-transformers ONNX export (all-MiniLM-L6-v2, 384 dimensions).

use std::path::Path;

use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::info;

use crate::assets;
use crate::error::AiError;
use crate::math::{l2_normalize, masked_mean};

/// Truncation limit matching the MiniLM export.
const MAX_LENGTH: usize = 256;
/// Fallback dimension when the model metadata leaves it dynamic.
const DEFAULT_DIM: usize = 384;

/// Sentence embedding pipeline.
///
/// Unit vectors by construction, so downstream cosine similarity reduces to
/// a dot product.
pub struct Embedder {
    session: Session,
    tokenizer: Tokenizer,
    dim: usize,
}

impl Embedder {
    /// Load from a directory containing `model.onnx` and `tokenizer.json`.
    pub fn load(model_dir: &Path) -> Result<Self, AiError> {
        let session = assets::load_session(model_dir)?;
        let tokenizer = assets::load_tokenizer(model_dir, Some(MAX_LENGTH), true)?;

        let dim = assets::infer_dim(session.outputs()[0].dtype()).unwrap_or(DEFAULT_DIM);
        info!(dim, "embedding model ready");

        Ok(Self {
            session,
            tokenizer,
            dim,
        })
    }

    /// Embedding dimensionality, fixed per model.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Embed a single text.
    pub fn embed(&mut self, text: &str) -> Result<Vec<f32>, AiError> {
        let mut vectors = self.embed_batch(&[text])?;
        vectors
            .pop()
            .ok_or_else(|| AiError::ModelOutput("empty embedding batch".to_string()))
    }

    /// Embed a batch of texts; one unit vector per input, in input order.
    pub fn embed_batch(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>, AiError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let encoded = assets::encode_batch(&self.tokenizer, texts)?;
        let shape = encoded.shape();
        let mask = encoded.attention_mask.clone();

        let ids_tensor = Tensor::from_array((shape, encoded.input_ids.into_boxed_slice()))?;
        let mask_tensor = Tensor::from_array((shape, encoded.attention_mask.into_boxed_slice()))?;
        let type_tensor = Tensor::from_array((shape, encoded.token_type_ids.into_boxed_slice()))?;

        let outputs = self.session.run(ort::inputs![
            "input_ids" => ids_tensor,
            "attention_mask" => mask_tensor,
            "token_type_ids" => type_tensor,
        ])?;

        // Per-token hidden states: [rows, seq_len, dim].
        let (output_shape, hidden) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        if dims.len() != 3 || dims[0] as usize != encoded.rows || dims[2] as usize != self.dim {
            return Err(AiError::ModelOutput(format!(
                "unexpected hidden-state shape {dims:?}, expected [{}, _, {}]",
                encoded.rows, self.dim
            )));
        }

        let out_seq = dims[1] as usize;
        let tokens = out_seq.min(encoded.seq_len);

        let mut vectors = Vec::with_capacity(encoded.rows);
        for row in 0..encoded.rows {
            let hidden_row = &hidden[row * out_seq * self.dim..(row + 1) * out_seq * self.dim];
            let mask_row = &mask[row * encoded.seq_len..(row + 1) * encoded.seq_len];

            let mut pooled = masked_mean(hidden_row, mask_row, tokens, self.dim);
            l2_normalize(&mut pooled);
            vectors.push(pooled);
        }

        Ok(vectors)
    }
}

//! Session and tokenizer loading shared by the three pipelines.
//!
//! Each model directory holds `model.onnx` and `tokenizer.json`; loading
//! verifies both up front so a bad deployment fails with a path, not an
//! opaque runtime error.

use std::path::Path;

use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use tokenizers::Tokenizer;
use tracing::info;

use crate::error::AiError;

/// Build an ONNX session from `<model_dir>/model.onnx`.
pub fn load_session(model_dir: &Path) -> Result<Session, AiError> {
    let model_path = model_dir.join("model.onnx");
    if !model_path.exists() {
        return Err(AiError::MissingAsset(model_path));
    }

    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .commit_from_file(&model_path)?;

    info!(model = %model_path.display(), "loaded ONNX session");
    Ok(session)
}

/// Load `<model_dir>/tokenizer.json`, optionally configured with
/// truncation to `max_length` and batch padding.
pub fn load_tokenizer(
    model_dir: &Path,
    max_length: Option<usize>,
    padding: bool,
) -> Result<Tokenizer, AiError> {
    let tokenizer_path = model_dir.join("tokenizer.json");
    if !tokenizer_path.exists() {
        return Err(AiError::MissingAsset(tokenizer_path));
    }

    let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
        .map_err(|e| AiError::Tokenizer(format!("load tokenizer: {e}")))?;

    if let Some(max_length) = max_length {
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| AiError::Tokenizer(format!("set truncation: {e}")))?;
    }
    if padding {
        tokenizer.with_padding(Some(tokenizers::PaddingParams {
            ..Default::default()
        }));
    }

    Ok(tokenizer)
}

/// A tokenized batch flattened into `[rows, seq_len]` i64 buffers, the
/// layout the ONNX text encoders expect.
pub struct EncodedBatch {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
    pub token_type_ids: Vec<i64>,
    pub rows: usize,
    pub seq_len: usize,
}

impl EncodedBatch {
    pub fn shape(&self) -> [i64; 2] {
        [self.rows as i64, self.seq_len as i64]
    }

    pub fn from_encodings(encodings: &[tokenizers::Encoding]) -> Self {
        let rows = encodings.len();
        let seq_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut input_ids = vec![0i64; rows * seq_len];
        let mut attention_mask = vec![0i64; rows * seq_len];
        let mut token_type_ids = vec![0i64; rows * seq_len];

        for (i, encoding) in encodings.iter().enumerate() {
            let offset = i * seq_len;
            for (j, &id) in encoding.get_ids().iter().enumerate() {
                input_ids[offset + j] = id as i64;
            }
            for (j, &mask) in encoding.get_attention_mask().iter().enumerate() {
                attention_mask[offset + j] = mask as i64;
            }
            for (j, &tid) in encoding.get_type_ids().iter().enumerate() {
                token_type_ids[offset + j] = tid as i64;
            }
        }

        Self {
            input_ids,
            attention_mask,
            token_type_ids,
            rows,
            seq_len,
        }
    }
}

/// Tokenize a batch of texts into one flat buffer set.
pub fn encode_batch(tokenizer: &Tokenizer, texts: &[&str]) -> Result<EncodedBatch, AiError> {
    let encodings = tokenizer
        .encode_batch(texts.to_vec(), true)
        .map_err(|e| AiError::Tokenizer(format!("tokenize: {e}")))?;
    Ok(EncodedBatch::from_encodings(&encodings))
}

/// Tokenize a (premise, hypothesis) pair into a single-row buffer set.
pub fn encode_pair(
    tokenizer: &Tokenizer,
    premise: &str,
    hypothesis: &str,
) -> Result<EncodedBatch, AiError> {
    let encoding = tokenizer
        .encode((premise, hypothesis), true)
        .map_err(|e| AiError::Tokenizer(format!("tokenize pair: {e}")))?;
    Ok(EncodedBatch::from_encodings(std::slice::from_ref(
        &encoding,
    )))
}

/// Try to read the hidden dimension from the model's output metadata.
pub fn infer_dim(output_type: &ort::value::ValueType) -> Option<usize> {
    match output_type {
        ort::value::ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}

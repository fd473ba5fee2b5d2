use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("model asset not found: {0}")]
    MissingAsset(std::path::PathBuf),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[cfg(feature = "onnx")]
    #[error("inference error: {0}")]
    Session(#[from] ort::Error),

    #[error("malformed model output: {0}")]
    ModelOutput(String),

    #[error("model config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

//! Sentence embedding entry point.
//!
//! `sift-embed <text-or-json-array>` prints one JSON envelope on stdout. A
//! JSON array argument selects batch mode; anything else embeds a single
//! text. A batch succeeds or fails atomically.

use clap::Parser;

use skillsift_ai::Embedder;
use skillsift_ai::config;
use skillsift_ai::error::AiError;
use skillsift_core::envelope::{EmbeddingBatchEnvelope, EmbeddingEnvelope, RejectedInput};
use skillsift_core::input::EmbedInput;

#[derive(Parser)]
#[command(name = "sift-embed", about = "Generate sentence embeddings", version)]
struct Args {
    /// Text to embed, or a JSON array of texts for batch mode.
    input: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("sift-embed v{}", env!("CARGO_PKG_VERSION"));
    let args = Args::parse();

    let Some(raw) = args.input else {
        println!(
            "{}",
            serde_json::to_string(&RejectedInput::no_input())?
        );
        std::process::exit(1);
    };

    let line = match EmbedInput::parse(&raw) {
        EmbedInput::Single(text) => {
            let envelope = match embed_single(&text) {
                Ok(vector) => EmbeddingEnvelope::success(vector),
                Err(err) => EmbeddingEnvelope::failure(err.to_string()),
            };
            serde_json::to_string(&envelope)?
        }
        EmbedInput::Batch(texts) => {
            let envelope = match embed_batch(&texts) {
                Ok((vectors, dimension)) => EmbeddingBatchEnvelope::success(vectors, dimension),
                Err(err) => EmbeddingBatchEnvelope::failure(err.to_string()),
            };
            serde_json::to_string(&envelope)?
        }
    };
    println!("{line}");
    Ok(())
}

fn embed_single(text: &str) -> Result<Vec<f32>, AiError> {
    let mut embedder = Embedder::load(&config::embed_model_dir())?;
    embedder.embed(text)
}

fn embed_batch(texts: &[String]) -> Result<(Vec<Vec<f32>>, usize), AiError> {
    let mut embedder = Embedder::load(&config::embed_model_dir())?;
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let vectors = embedder.embed_batch(&refs)?;
    Ok((vectors, embedder.dim()))
}

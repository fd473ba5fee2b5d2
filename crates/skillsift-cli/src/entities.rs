//! Named-entity extraction entry point.
//!
//! `sift-entities --text <string>` or `--file <path>` prints one JSON
//! envelope on stdout. A file takes precedence over inline text; an
//! unreadable file folds into the "no input" path.

use std::path::PathBuf;

use clap::Parser;

use skillsift_ai::EntityTagger;
use skillsift_ai::config;
use skillsift_core::envelope::{EntitiesEnvelope, RejectedInput};

#[derive(Parser)]
#[command(name = "sift-entities", about = "Extract named entities from text", version)]
struct Args {
    /// Inline input text.
    #[arg(long)]
    text: Option<String>,
    /// Path to a file containing the input text.
    #[arg(long)]
    file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("sift-entities v{}", env!("CARGO_PKG_VERSION"));
    let args = Args::parse();

    let Some(text) = resolve_input(args).filter(|t| !t.is_empty()) else {
        println!(
            "{}",
            serde_json::to_string(&RejectedInput::no_input())?
        );
        std::process::exit(1);
    };

    let envelope = match extract(&text) {
        Ok(entities) => EntitiesEnvelope::success(entities),
        Err(err) => EntitiesEnvelope::failure(err.to_string()),
    };
    println!("{}", serde_json::to_string(&envelope)?);
    Ok(())
}

/// File input wins over inline text; read lossily so odd encodings still
/// yield usable text, and treat read errors as "no text".
fn resolve_input(args: Args) -> Option<String> {
    if let Some(path) = &args.file
        && let Ok(bytes) = std::fs::read(path)
    {
        return Some(String::from_utf8_lossy(&bytes).into_owned());
    }
    args.text
}

fn extract(text: &str) -> Result<Vec<skillsift_core::envelope::EntitySpan>, skillsift_ai::AiError> {
    let mut tagger = EntityTagger::load(&config::ner_model_dir())?;
    tagger.extract(text)
}

//! Zero-shot skill classification entry point.
//!
//! `sift-classify <text> [threshold] [candidate_labels]` prints one JSON
//! envelope on stdout. Inference failures are reported gracefully in the
//! envelope (exit 0); only missing/unusable input exits 1.

use clap::Parser;

use skillsift_ai::ZeroShotClassifier;
use skillsift_ai::config;
use skillsift_ai::error::AiError;
use skillsift_ai::scoring::filter_skills;
use skillsift_core::envelope::{RejectedInput, SkillResult, SkillsEnvelope};
use skillsift_core::input::{candidate_labels_or_default, parse_threshold};

#[derive(Parser)]
#[command(name = "sift-classify", about = "Score skill labels against text", version)]
struct Args {
    /// Text to classify.
    text: Option<String>,
    /// Minimum confidence for a label to be kept (default 0.5).
    threshold: Option<String>,
    /// JSON array of candidate labels; defaults to the built-in vocabulary.
    candidate_labels: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("sift-classify v{}", env!("CARGO_PKG_VERSION"));
    let args = Args::parse();

    let Some(text) = args.text else {
        return reject(RejectedInput::no_input());
    };
    let threshold = match parse_threshold(args.threshold.as_deref()) {
        Ok(threshold) => threshold,
        Err(msg) => return reject(RejectedInput::because(msg)),
    };
    let labels = candidate_labels_or_default(args.candidate_labels.as_deref());

    let envelope = match classify(&text, &labels, threshold) {
        Ok(skills) => SkillsEnvelope::success(skills),
        Err(err) => SkillsEnvelope::failure(err.to_string()),
    };
    println!("{}", serde_json::to_string(&envelope)?);
    Ok(())
}

fn classify(text: &str, labels: &[String], threshold: f32) -> Result<Vec<SkillResult>, AiError> {
    let mut classifier = ZeroShotClassifier::load(&config::nli_model_dir())?;
    let ranked = classifier.score_labels(text, labels)?;
    Ok(filter_skills(&ranked, threshold))
}

fn reject(envelope: RejectedInput) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(&envelope)?);
    std::process::exit(1);
}

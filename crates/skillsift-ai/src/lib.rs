//! Inference layer: ONNX Runtime sessions for zero-shot skill
//! classification, mean-pooled sentence embeddings, and named-entity
//! recognition.
//!
//! The numerical post-processing (pooling, normalization, entailment
//! scoring, entity aggregation) lives in plain modules with no runtime
//! dependency; the session-driving pipelines are gated behind the `onnx`
//! feature.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod math;
pub mod scoring;

#[cfg(feature = "onnx")]
mod assets;
#[cfg(feature = "onnx")]
mod classifier;
#[cfg(feature = "onnx")]
mod embedder;
#[cfg(feature = "onnx")]
mod ner;

pub use error::AiError;

#[cfg(feature = "onnx")]
pub use classifier::ZeroShotClassifier;
#[cfg(feature = "onnx")]
pub use embedder::Embedder;
#[cfg(feature = "onnx")]
pub use ner::EntityTagger;

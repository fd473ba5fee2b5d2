//! JSON result envelopes shared by the three extraction services.
//!
//! Every service prints exactly one of these as a single JSON line. The
//! shape is uniform: `success` is always present; on success the payload
//! carries its collection plus `count`/`dimension`; on failure the payload
//! collection is empty, the counters are absent, and `error` holds a
//! human-readable message.

use serde::{Deserialize, Serialize};

/// Method discriminator stamped on every classification result, so callers
/// merging skills from several extractors can tell the sources apart.
pub const ZERO_SHOT_METHOD: &str = "zero-shot-classification";

/// Canonical error message when a service is invoked without input text.
pub const NO_INPUT_ERROR: &str = "No input text provided";

/// A skill label that scored at or above the request threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillResult {
    pub skill: String,
    pub confidence: f32,
    pub method: String,
}

impl SkillResult {
    pub fn new(skill: impl Into<String>, confidence: f32) -> Self {
        Self {
            skill: skill.into(),
            confidence,
            method: ZERO_SHOT_METHOD.to_string(),
        }
    }
}

/// A named-entity span over the condensed input text.
///
/// `start`/`end` are character offsets; a 0/0 span means "offset unknown",
/// not "entity at position 0".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySpan {
    pub entity_group: String,
    pub word: String,
    pub score: f32,
    pub start: usize,
    pub end: usize,
}

/// Classification service envelope.
#[derive(Debug, Serialize)]
pub struct SkillsEnvelope {
    pub success: bool,
    pub skills: Vec<SkillResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SkillsEnvelope {
    pub fn success(skills: Vec<SkillResult>) -> Self {
        let count = skills.len();
        Self {
            success: true,
            skills,
            count: Some(count),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            skills: Vec::new(),
            count: None,
            error: Some(error.into()),
        }
    }
}

/// Single-text embedding envelope.
#[derive(Debug, Serialize)]
pub struct EmbeddingEnvelope {
    pub success: bool,
    pub embedding: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EmbeddingEnvelope {
    pub fn success(embedding: Vec<f32>) -> Self {
        let dimension = embedding.len();
        Self {
            success: true,
            embedding,
            dimension: Some(dimension),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            embedding: Vec::new(),
            dimension: None,
            error: Some(error.into()),
        }
    }
}

/// Batch embedding envelope. A batch succeeds or fails atomically.
#[derive(Debug, Serialize)]
pub struct EmbeddingBatchEnvelope {
    pub success: bool,
    pub embeddings: Vec<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EmbeddingBatchEnvelope {
    pub fn success(embeddings: Vec<Vec<f32>>, dimension: usize) -> Self {
        let count = embeddings.len();
        Self {
            success: true,
            embeddings,
            count: Some(count),
            dimension: Some(dimension),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            embeddings: Vec::new(),
            count: None,
            dimension: None,
            error: Some(error.into()),
        }
    }
}

/// Entity extraction envelope.
#[derive(Debug, Serialize)]
pub struct EntitiesEnvelope {
    pub success: bool,
    pub entities: Vec<EntitySpan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EntitiesEnvelope {
    pub fn success(entities: Vec<EntitySpan>) -> Self {
        let count = entities.len();
        Self {
            success: true,
            entities,
            count: Some(count),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            entities: Vec::new(),
            count: None,
            error: Some(error.into()),
        }
    }
}

/// Minimal envelope printed when no usable input reached a service.
///
/// Unlike the inference-failure envelopes this carries no payload collection
/// at all; the process exits with status 1 after printing it.
#[derive(Debug, Serialize)]
pub struct RejectedInput {
    pub success: bool,
    pub error: String,
}

impl RejectedInput {
    pub fn no_input() -> Self {
        Self {
            success: false,
            error: NO_INPUT_ERROR.to_string(),
        }
    }

    pub fn because(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

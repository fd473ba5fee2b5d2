//! Zero-shot classification scoring and filtering.
//!
//! Multi-label zero-shot scoring phrases each candidate label as an NLI
//! hypothesis against the input text and reads the entailment probability
//! off the cross-encoder logits. Each label is scored independently, so
//! scores do not sum to 1 across labels.

use skillsift_core::envelope::SkillResult;

use crate::math::softmax;

/// Phrase a candidate label as an NLI hypothesis.
pub fn hypothesis_for(label: &str) -> String {
    format!("This example is {label}.")
}

/// Entailment probability from one cross-encoder logit row.
///
/// Softmax over the [contradiction, entailment] pair, discarding neutral;
/// the contradiction index is 0 unless entailment itself sits at 0, in
/// which case the last logit is used.
pub fn entailment_score(logits: &[f32], entailment_id: usize) -> f32 {
    if logits.is_empty() {
        return 0.0;
    }
    let entailment_id = entailment_id.min(logits.len() - 1);
    let contradiction_id = if entailment_id == 0 {
        logits.len() - 1
    } else {
        0
    };
    let pair = [logits[contradiction_id], logits[entailment_id]];
    softmax(&pair)[1]
}

/// Order scored labels by descending confidence.
///
/// This descending order is the model-output order downstream consumers
/// see; the threshold filter below preserves it rather than re-sorting.
pub fn rank_descending(mut scored: Vec<(String, f32)>) -> Vec<(String, f32)> {
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored
}

/// Keep labels scoring at or above `threshold`, tagged as skill results.
pub fn filter_skills(ranked: &[(String, f32)], threshold: f32) -> Vec<SkillResult> {
    ranked
        .iter()
        .filter(|(_, score)| *score >= threshold)
        .map(|(label, score)| SkillResult::new(label.clone(), *score))
        .collect()
}

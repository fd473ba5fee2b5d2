//! Entity aggregation: sub-word pieces → words → entity spans.
//!
//! Implements the max-score merge policy: when several pieces form one
//! word, the word takes the score and label of its best-scoring piece; when
//! several words form one entity, the span reports the max constituent
//! score. Labels follow the BIO scheme (`B-X` opens an entity, `I-X`
//! extends it, `O` is outside); a model emitting bare labels is tolerated.

use skillsift_core::envelope::EntitySpan;

/// Sentinel group for tokens whose label could not be resolved.
pub const UNKNOWN_GROUP: &str = "UNKNOWN";

/// Sub-word continuation marker used by WordPiece tokenizers.
const SUBWORD_MARKER: &str = "##";

/// One scored token straight out of the model.
#[derive(Debug, Clone)]
pub struct TokenScore {
    /// Token surface form as the tokenizer produced it (may carry `##`).
    pub piece: String,
    /// Raw model label (`B-ORG`, `I-ORG`, `O`, ...); empty when the label
    /// id was not in the model's table.
    pub label: String,
    pub score: f32,
    /// Offsets into the condensed input text; 0/0 when unknown.
    pub start: usize,
    pub end: usize,
}

/// Collapse all whitespace runs (including newlines) to single spaces.
pub fn condense_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip the sub-word continuation marker from a surface form.
pub fn clean_word(word: &str) -> String {
    word.replace(SUBWORD_MARKER, "")
}

/// Resolve a raw label to its entity group.
///
/// Fallback chain, preserved verbatim: aggregated BIO group → raw label →
/// the `UNKNOWN` sentinel.
pub fn entity_group(label: &str) -> String {
    match label.strip_prefix("B-").or_else(|| label.strip_prefix("I-")) {
        Some(group) if !group.is_empty() => group.to_string(),
        _ if !label.is_empty() => label.to_string(),
        _ => UNKNOWN_GROUP.to_string(),
    }
}

/// Aggregate scored tokens into entity spans over `text` (the condensed
/// input the offsets refer to).
pub fn aggregate_spans(text: &str, tokens: Vec<TokenScore>) -> Vec<EntitySpan> {
    group_words(text, merge_subwords(tokens))
}

/// A whole word assembled from one or more sub-word pieces.
#[derive(Debug)]
struct Word {
    text: String,
    label: String,
    score: f32,
    start: usize,
    end: usize,
}

/// Merge `##`-continuation pieces into whole words, keeping the label and
/// score of the best-scoring constituent piece.
fn merge_subwords(tokens: Vec<TokenScore>) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();

    for tok in tokens {
        if tok.piece.starts_with(SUBWORD_MARKER)
            && let Some(last) = words.last_mut()
        {
            last.text.push_str(tok.piece.trim_start_matches(SUBWORD_MARKER));
            if tok.score > last.score {
                last.score = tok.score;
                last.label = tok.label;
            }
            last.end = tok.end;
        } else {
            words.push(Word {
                text: clean_word(&tok.piece),
                label: tok.label,
                score: tok.score,
                start: tok.start,
                end: tok.end,
            });
        }
    }

    words
}

/// Group adjacent in-entity words into spans.
fn group_words(text: &str, words: Vec<Word>) -> Vec<EntitySpan> {
    let mut spans = Vec::new();
    let mut current: Option<SpanBuilder> = None;

    for word in words {
        if word.label == "O" {
            flush(&mut current, &mut spans, text);
            continue;
        }

        let group = entity_group(&word.label);
        let continues = word.label.starts_with("I-") || !word.label.starts_with("B-");
        if continues
            && let Some(span) = current.as_mut()
            && span.group == group
        {
            span.push(word);
        } else {
            flush(&mut current, &mut spans, text);
            current = Some(SpanBuilder::open(group, word));
        }
    }

    flush(&mut current, &mut spans, text);
    spans
}

fn flush(current: &mut Option<SpanBuilder>, spans: &mut Vec<EntitySpan>, text: &str) {
    if let Some(span) = current.take() {
        spans.push(span.finish(text));
    }
}

struct SpanBuilder {
    group: String,
    pieces: Vec<String>,
    score: f32,
    start: usize,
    end: usize,
}

impl SpanBuilder {
    fn open(group: String, word: Word) -> Self {
        Self {
            group,
            score: word.score,
            start: word.start,
            end: word.end,
            pieces: vec![word.text],
        }
    }

    fn push(&mut self, word: Word) {
        self.score = self.score.max(word.score);
        self.end = word.end;
        self.pieces.push(word.text);
    }

    fn finish(self, text: &str) -> EntitySpan {
        // Prefer the original surface form; fall back to rejoined pieces
        // when offsets are unknown or out of bounds.
        let word = match text.get(self.start..self.end) {
            Some(slice) if self.end > self.start => slice.to_string(),
            _ => self.pieces.join(" "),
        };

        EntitySpan {
            entity_group: self.group,
            word: clean_word(&word),
            score: self.score,
            start: self.start,
            end: self.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(piece: &str, label: &str, score: f32, start: usize, end: usize) -> TokenScore {
        TokenScore {
            piece: piece.to_string(),
            label: label.to_string(),
            score,
            start,
            end,
        }
    }

    #[test]
    fn condense_collapses_runs_and_newlines() {
        assert_eq!(
            condense_whitespace("  John \n\n  works\tat   Acme  "),
            "John works at Acme"
        );
    }

    #[test]
    fn condense_of_blank_text_is_empty() {
        assert_eq!(condense_whitespace(" \n \t "), "");
    }

    #[test]
    fn clean_word_strips_marker() {
        assert_eq!(clean_word("##thropic"), "thropic");
        assert_eq!(clean_word("An##thro##pic"), "Anthropic");
    }

    #[test]
    fn group_fallback_chain() {
        assert_eq!(entity_group("B-PER"), "PER");
        assert_eq!(entity_group("I-ORG"), "ORG");
        assert_eq!(entity_group("MISC"), "MISC");
        assert_eq!(entity_group(""), "UNKNOWN");
    }

    #[test]
    fn subwords_merge_with_max_score_label() {
        let text = "Anthropic";
        let spans = aggregate_spans(
            text,
            vec![
                tok("An", "B-ORG", 0.80, 0, 2),
                tok("##thro", "I-ORG", 0.95, 2, 6),
                tok("##pic", "I-ORG", 0.70, 6, 9),
            ],
        );

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].word, "Anthropic");
        assert_eq!(spans[0].entity_group, "ORG");
        assert!((spans[0].score - 0.95).abs() < 1e-6, "score must be the max");
        assert_eq!((spans[0].start, spans[0].end), (0, 9));
    }

    #[test]
    fn multi_word_entity_reports_max_not_average() {
        let text = "New York City";
        let spans = aggregate_spans(
            text,
            vec![
                tok("New", "B-LOC", 0.60, 0, 3),
                tok("York", "I-LOC", 0.99, 4, 8),
                tok("City", "I-LOC", 0.30, 9, 13),
            ],
        );

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].word, "New York City");
        assert!((spans[0].score - 0.99).abs() < 1e-6);
    }

    #[test]
    fn outside_tokens_break_adjacency() {
        let text = "Paris loves Berlin";
        let spans = aggregate_spans(
            text,
            vec![
                tok("Paris", "B-LOC", 0.9, 0, 5),
                tok("loves", "O", 0.99, 6, 11),
                tok("Berlin", "B-LOC", 0.8, 12, 18),
            ],
        );

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].word, "Paris");
        assert_eq!(spans[1].word, "Berlin");
    }

    #[test]
    fn b_tag_always_opens_a_new_span() {
        let text = "Alice Bob";
        let spans = aggregate_spans(
            text,
            vec![
                tok("Alice", "B-PER", 0.9, 0, 5),
                tok("Bob", "B-PER", 0.9, 6, 9),
            ],
        );
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn type_change_splits_spans() {
        let text = "Acme Paris";
        let spans = aggregate_spans(
            text,
            vec![
                tok("Acme", "B-ORG", 0.9, 0, 4),
                tok("Paris", "I-LOC", 0.9, 5, 10),
            ],
        );
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].entity_group, "ORG");
        assert_eq!(spans[1].entity_group, "LOC");
    }

    #[test]
    fn bare_labels_group_and_continue() {
        let text = "Rust Belt";
        let spans = aggregate_spans(
            text,
            vec![tok("Rust", "MISC", 0.7, 0, 4), tok("Belt", "MISC", 0.8, 5, 9)],
        );
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].entity_group, "MISC");
        assert!((spans[0].score - 0.8).abs() < 1e-6);
    }

    #[test]
    fn unknown_label_uses_sentinel_group() {
        let spans = aggregate_spans("x", vec![tok("x", "", 0.5, 0, 1)]);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].entity_group, "UNKNOWN");
    }

    #[test]
    fn zero_offsets_fall_back_to_rejoined_pieces() {
        let spans = aggregate_spans(
            "irrelevant",
            vec![
                tok("Ada", "B-PER", 0.9, 0, 0),
                tok("Lovelace", "I-PER", 0.9, 0, 0),
            ],
        );
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].word, "Ada Lovelace");
        assert_eq!((spans[0].start, spans[0].end), (0, 0));
    }

    #[test]
    fn emitted_words_never_contain_the_marker() {
        let spans = aggregate_spans(
            "irrelevant",
            vec![
                tok("Ko", "B-ORG", 0.9, 0, 0),
                tok("##fi", "I-ORG", 0.8, 0, 0),
                tok("##co", "I-ORG", 0.7, 0, 0),
            ],
        );
        for span in &spans {
            assert!(!span.word.contains("##"), "marker leaked: {}", span.word);
        }
    }

    #[test]
    fn no_tokens_no_spans() {
        assert!(aggregate_spans("", vec![]).is_empty());
    }
}

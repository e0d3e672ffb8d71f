//! Content-addressed annotation alignment.
//!
//! The review backend identifies each correction by surrounding text
//! (`context_before` + `target_text`) rather than by offset. This module
//! reconstructs offsets via substring search and partitions the submission
//! into an ordered sequence of plain and annotated segments suitable for
//! rendering.
//!
//! Matching is best-effort: an annotation whose search key does not occur
//! in the text is dropped (logged at `warn`), never surfaced as an error.

use tracing::warn;

use crate::models::Annotation;

/// A contiguous slice of submission text, either plain or carrying the
/// annotation that covers it.
///
/// `key` is the segment's `start-end` byte range, stable across repeated
/// alignments of the same input.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub key: String,
    pub text: String,
    pub annotation: Option<Annotation>,
}

impl Segment {
    fn plain(start: usize, end: usize, text: &str) -> Self {
        Self {
            key: format!("{}-{}", start, end),
            text: text.to_string(),
            annotation: None,
        }
    }

    fn annotated(start: usize, end: usize, text: &str, annotation: Annotation) -> Self {
        Self {
            key: format!("{}-{}", start, end),
            text: text.to_string(),
            annotation: Some(annotation),
        }
    }

    pub fn is_annotation(&self) -> bool {
        self.annotation.is_some()
    }
}

/// Partition `text` into plain and annotated segments.
///
/// Annotations are processed single-pass in the given order. Each is
/// located by the first occurrence of `context_before + " " + target_text`
/// in the **full** text; the search is deliberately not cursor-relative,
/// so a context phrase that recurs can re-match text an earlier annotation
/// already consumed. Whether matching should instead be restricted to the
/// unconsumed remainder is an open product question, not something this
/// function decides.
///
/// All offsets are byte offsets. The annotated span boundaries always land
/// on char boundaries because they are derived from a successful substring
/// match.
pub fn align(text: &str, annotations: &[Annotation]) -> Vec<Segment> {
    if annotations.is_empty() {
        return vec![Segment::plain(0, text.len(), text)];
    }

    let mut segments = Vec::new();
    let mut cursor = 0usize;

    for annotation in annotations {
        let search_key = format!(
            "{} {}",
            annotation.context_before, annotation.target_text
        );
        let Some(match_index) = text.find(&search_key) else {
            warn!(
                target_text = %annotation.target_text,
                "annotation context not found in submission, dropping"
            );
            continue;
        };
        // The annotated span starts after the context and the joining space.
        let start = match_index + annotation.context_before.len() + 1;
        let end = start + annotation.target_text.len();

        if cursor < start {
            segments.push(Segment::plain(cursor, start, &text[cursor..start]));
        }
        segments.push(Segment::annotated(
            start,
            end,
            &text[start..end],
            annotation.clone(),
        ));
        cursor = end;
    }

    // Trailing remainder covers through the end of the text.
    if cursor < text.len() {
        segments.push(Segment::plain(cursor, text.len(), &text[cursor..]));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnnotationKind;

    fn ann(context: &str, target: &str, kind: AnnotationKind) -> Annotation {
        Annotation {
            context_before: context.to_string(),
            target_text: target.to_string(),
            kind,
            replacement: None,
            feedback: String::new(),
        }
    }

    #[test]
    fn test_no_annotations_single_segment() {
        let segments = align("I go to school yesterday.", &[]);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "I go to school yesterday.");
        assert!(!segments[0].is_annotation());
    }

    #[test]
    fn test_empty_text_no_annotations() {
        let segments = align("", &[]);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "");
    }

    #[test]
    fn test_single_annotation_splits_text() {
        let text = "I go to school yesterday.";
        let segments = align(text, &[ann("I", "go", AnnotationKind::Grammar)]);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].text, "I ");
        assert!(!segments[0].is_annotation());
        assert_eq!(segments[1].text, "go");
        assert!(segments[1].is_annotation());
        assert_eq!(
            segments[1].annotation.as_ref().unwrap().kind,
            AnnotationKind::Grammar
        );
        assert_eq!(segments[2].text, " to school yesterday.");
        assert!(!segments[2].is_annotation());
        // Segments reassemble the full text.
        let joined: String = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_segment_keys_are_byte_ranges() {
        let segments = align(
            "I go to school yesterday.",
            &[ann("I", "go", AnnotationKind::Grammar)],
        );
        assert_eq!(segments[0].key, "0-2");
        assert_eq!(segments[1].key, "2-4");
        assert_eq!(segments[2].key, "4-25");
    }

    #[test]
    fn test_annotated_text_equals_target_verbatim() {
        let text = "She have two cat in her house.";
        let annotations = [
            ann("She", "have", AnnotationKind::Grammar),
            ann("two", "cat", AnnotationKind::Grammar),
        ];
        let segments = align(text, &annotations);
        let annotated: Vec<&Segment> =
            segments.iter().filter(|s| s.is_annotation()).collect();
        assert_eq!(annotated.len(), 2);
        assert_eq!(annotated[0].text, "have");
        assert_eq!(annotated[1].text, "cat");
    }

    #[test]
    fn test_unmatched_annotation_dropped() {
        let text = "I go to school yesterday.";
        let segments = align(text, &[ann("xyz", "go", AnnotationKind::Grammar)]);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, text);
        assert!(!segments[0].is_annotation());
    }

    #[test]
    fn test_dropped_annotation_leaves_neighbors_intact() {
        let text = "I go to school yesterday.";
        let annotations = [
            ann("I", "go", AnnotationKind::Grammar),
            ann("not present", "anywhere", AnnotationKind::Vocabulary),
            ann("school", "yesterday", AnnotationKind::Grammar),
        ];
        let segments = align(text, &annotations);
        let with_all_matched = align(
            text,
            &[
                ann("I", "go", AnnotationKind::Grammar),
                ann("school", "yesterday", AnnotationKind::Grammar),
            ],
        );
        assert_eq!(segments, with_all_matched);
    }

    #[test]
    fn test_trailing_remainder_includes_last_char() {
        let segments = align(
            "I go to school yesterday.",
            &[ann("I", "go", AnnotationKind::Grammar)],
        );
        assert!(segments.last().unwrap().text.ends_with('.'));
    }

    #[test]
    fn test_annotation_reaching_end_of_text() {
        let text = "I go to school yesterday";
        let segments = align(text, &[ann("school", "yesterday", AnnotationKind::Grammar)]);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].text, "yesterday");
        assert!(segments[1].is_annotation());
    }

    #[test]
    fn test_deterministic() {
        let text = "She have two cat in her house.";
        let annotations = [
            ann("She", "have", AnnotationKind::Grammar),
            ann("two", "cat", AnnotationKind::Vocabulary),
        ];
        let a = align(text, &annotations);
        let b = align(text, &annotations);
        assert_eq!(a, b);
    }

    #[test]
    fn test_multibyte_text_around_annotation() {
        // Non-ASCII context must not break byte-offset slicing.
        let text = "Café culture — I enjoys it daily.";
        let segments = align(text, &[ann("I", "enjoys", AnnotationKind::Grammar)]);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].text, "enjoys");
        let joined: String = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_first_occurrence_wins_for_repeated_phrase() {
        // The search is against the full text, so the leftmost occurrence
        // of the key is chosen even if a later one was intended.
        let text = "the cat sat near the cat door.";
        let segments = align(text, &[ann("the", "cat", AnnotationKind::Vocabulary)]);
        assert_eq!(segments[1].key, "4-7");
        assert_eq!(segments[1].text, "cat");
    }
}

//! Core data models for the review pipeline.
//!
//! These types mirror the review backend's wire format: submissions, reviews
//! with their lifecycle status, and the content-addressed annotations the
//! aligner resolves into renderable segments.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// An essay submission. Immutable once created.
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub id: String,
    pub topic_id: String,
    /// The essay text as submitted.
    pub submission: String,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle status of a review.
///
/// Created server-side in `Reviewing`; transitions exactly once to a
/// terminal value and is immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Reviewing,
    Done,
    Failed,
}

/// Per-criterion scores, 0–100 each.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailScore {
    pub grammar: u8,
    pub vocabulary: u8,
    pub organization: u8,
    pub task_fulfillment: u8,
}

/// Category of a correction annotation.
///
/// Unknown categories from a newer backend deserialize to
/// [`AnnotationKind::Other`] instead of failing, and render with the
/// default highlight color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    Grammar,
    Vocabulary,
    Coherence,
    Mechanics,
    #[serde(other)]
    Other,
}

impl AnnotationKind {
    /// Highlight color for the annotated span.
    pub fn highlight_color(&self) -> &'static str {
        match self {
            AnnotationKind::Grammar => "amber",
            AnnotationKind::Coherence => "blue",
            AnnotationKind::Mechanics => "red",
            AnnotationKind::Vocabulary | AnnotationKind::Other => "green",
        }
    }
}

/// A single correction item.
///
/// Identifies its span of the submission by surrounding content
/// (`context_before` + `target_text`), not by offset; the aligner resolves
/// it to a position.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Annotation {
    pub context_before: String,
    pub target_text: String,
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    #[serde(default)]
    pub replacement: Option<String>,
    pub feedback: String,
}

/// AI feedback artifact for one submission.
///
/// Score and feedback fields are absent while `status` is `Reviewing` and
/// stay absent if the review failed.
#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    pub id: String,
    pub topic_id: String,
    pub submission_id: String,
    pub status: ReviewStatus,
    #[serde(default)]
    pub score_range: Option<(u32, u32)>,
    #[serde(default)]
    pub level_achieved: Option<u32>,
    #[serde(default)]
    pub overall_feedback: Option<String>,
    #[serde(default)]
    pub summary_feedback: Option<String>,
    #[serde(default)]
    pub detail_score: Option<DetailScore>,
    #[serde(default)]
    pub annotations: Option<Vec<Annotation>>,
    #[serde(default)]
    pub improvement_suggestions: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_annotation_kind_falls_back() {
        let json = r#"{
            "context_before": "the",
            "target_text": "tone",
            "type": "register",
            "replacement": null,
            "feedback": "too informal"
        }"#;
        let annotation: Annotation = serde_json::from_str(json).unwrap();
        assert_eq!(annotation.kind, AnnotationKind::Other);
        assert_eq!(annotation.kind.highlight_color(), "green");
    }

    #[test]
    fn test_highlight_colors_per_kind() {
        assert_eq!(AnnotationKind::Grammar.highlight_color(), "amber");
        assert_eq!(AnnotationKind::Coherence.highlight_color(), "blue");
        assert_eq!(AnnotationKind::Mechanics.highlight_color(), "red");
        assert_eq!(AnnotationKind::Vocabulary.highlight_color(), "green");
    }

    #[test]
    fn test_review_deserializes_in_progress_shape() {
        // While reviewing, all result fields are null.
        let json = r#"{
            "id": "rev-1",
            "topic_id": "top-1",
            "submission_id": "sub-1",
            "status": "reviewing",
            "score_range": null,
            "level_achieved": null,
            "overall_feedback": null,
            "summary_feedback": null,
            "detail_score": null,
            "annotations": null,
            "created_at": "2025-06-01T12:00:00Z"
        }"#;
        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.status, ReviewStatus::Reviewing);
        assert!(review.annotations.is_none());
        assert!(review.improvement_suggestions.is_none());
    }
}

//! Terminal rendering for finished reviews.
//!
//! Prints the score summary, the corrected essay with annotated spans
//! highlighted in their category color, and the per-annotation feedback
//! list. Plain `println!` on stdout; the polling UI itself lives in the
//! CLI.

use owo_colors::OwoColorize;

use crate::align::Segment;
use crate::models::{Annotation, AnnotationKind};
use crate::poll::ReviewView;

/// Render an annotated span with its category's highlight color.
fn highlight(kind: AnnotationKind, text: &str) -> String {
    match kind {
        AnnotationKind::Grammar => text.black().on_yellow().to_string(),
        AnnotationKind::Coherence => text.black().on_blue().to_string(),
        AnnotationKind::Mechanics => text.black().on_red().to_string(),
        AnnotationKind::Vocabulary | AnnotationKind::Other => {
            text.black().on_green().to_string()
        }
    }
}

fn print_annotation_detail(index: usize, annotation: &Annotation) {
    println!(
        "  {}. [{}] \"{}\"",
        index + 1,
        annotation.kind.highlight_color(),
        annotation.target_text
    );
    if let Some(replacement) = &annotation.replacement {
        println!("     -> {}", replacement.green());
    }
    println!("     {}", annotation.feedback);
}

/// Print a finished review: scores, feedback, and the aligned correction
/// view.
pub fn print_review(view: &ReviewView) {
    let review = &view.review;

    if let Some((low, high)) = review.score_range {
        println!("Score range: {} - {}", low, high);
    }
    if let Some(level) = review.level_achieved {
        println!("Level achieved: {}", level);
    }
    if let Some(detail) = &review.detail_score {
        println!("Details:");
        println!("  grammar          {:>3}", detail.grammar);
        println!("  vocabulary       {:>3}", detail.vocabulary);
        println!("  organization     {:>3}", detail.organization);
        println!("  task fulfillment {:>3}", detail.task_fulfillment);
    }
    if let Some(feedback) = &review.overall_feedback {
        println!();
        println!("Feedback: {}", feedback);
    }

    println!();
    println!("Correction:");
    let segments = view.segments();
    print!("  ");
    for segment in &segments {
        match &segment.annotation {
            Some(annotation) => print!("{}", highlight(annotation.kind, &segment.text)),
            None => print!("{}", segment.text),
        }
    }
    println!();

    let annotated: Vec<&Segment> = segments.iter().filter(|s| s.is_annotation()).collect();
    if !annotated.is_empty() {
        println!();
        println!("Annotations:");
        for (i, segment) in annotated.iter().enumerate() {
            if let Some(annotation) = &segment.annotation {
                print_annotation_detail(i, annotation);
            }
        }
    }

    if let Some(suggestions) = &review.improvement_suggestions {
        if !suggestions.is_empty() {
            println!();
            println!("Suggestions:");
            for suggestion in suggestions {
                println!("  - {}", suggestion);
            }
        }
    }
}

use crate::constants::{
    FALLBACK_CONFIDENCE_QUESTION_ONLY, FALLBACK_CONFIDENCE_WITH_REFERENCE, OPEN_RUBRIC_WEIGHT,
};
use crate::normalize::{content_tokens, jaccard};
use crate::request::GradingRequest;

use super::types::{FallbackReason, FallbackScore};

/// Content-token Jaccard similarity, scaled to `max_points`.
///
/// Compares against the reference answer when there is one, otherwise against
/// the question, in which case credit is capped at [`OPEN_RUBRIC_WEIGHT`].
/// Pure and deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackHeuristic;

impl FallbackHeuristic {
    pub fn new() -> Self {
        Self
    }

    pub fn estimate(&self, request: &GradingRequest, reason: FallbackReason) -> FallbackScore {
        let answer = content_tokens(request.student_answer());
        let target = content_tokens(request.comparison_text());

        let similarity = jaccard(&answer, &target);
        let shared = answer.intersection(&target).count();

        let (weight, confidence, against) = if request.is_open_rubric() {
            (OPEN_RUBRIC_WEIGHT, FALLBACK_CONFIDENCE_QUESTION_ONLY, "the question")
        } else {
            (1.0, FALLBACK_CONFIDENCE_WITH_REFERENCE, "the expected answer")
        };

        FallbackScore {
            raw_score: similarity * weight * request.max_points(),
            rationale: format!(
                "Shares {} of {} key terms with {}.",
                shared,
                target.len(),
                against
            ),
            confidence,
            reason,
        }
    }
}

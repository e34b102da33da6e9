use tracing::{debug, warn};

use crate::constants::MAX_FEEDBACK_CHARS;
use crate::fallback::FallbackScore;
use crate::lexical::{LexicalCredit, MatchKind};
use crate::request::GradingRequest;
use crate::scoring::ScoringBackendResponse;

use super::config::Rounding;
use super::error::InvariantViolation;
use super::types::{GradingMethod, GradingResult};

const CORRECTED_FEEDBACK: &str =
    "The automated score could not be verified and was adjusted; flagged for human review.";

/// How a raw score is snapped before it is packaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Snap {
    /// Keep the exact value.
    Exact,
    /// Round the score in points to the configured step.
    Points,
    /// Round the fraction of `max_points`, so scores scale with it.
    Fraction,
}

/// Turns the output of any pipeline stage into a [`GradingResult`].
///
/// This is the single place where the `0 <= score <= max_points` invariant is
/// enforced.
#[derive(Debug, Clone, Default)]
pub struct ResultAssembler {
    rounding: Rounding,
}

impl ResultAssembler {
    pub fn new(rounding: Rounding) -> Self {
        Self { rounding }
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    pub fn from_lexical(&self, request: &GradingRequest, credit: &LexicalCredit) -> GradingResult {
        let raw = credit.credit * request.max_points();
        let feedback = lexical_feedback(&credit.kind, request);
        self.assemble(
            request.max_points(),
            raw,
            GradingMethod::ExactMatch,
            credit.confidence,
            feedback,
            Snap::Exact,
        )
    }

    pub fn from_semantic(
        &self,
        request: &GradingRequest,
        response: &ScoringBackendResponse,
        confidence: f64,
    ) -> GradingResult {
        let feedback = feedback_from_rationale(&response.rationale)
            .unwrap_or_else(|| "Scored by automated semantic review.".to_string());
        self.finalize(
            request.max_points(),
            response.raw_score,
            GradingMethod::Semantic,
            confidence,
            feedback,
        )
    }

    pub fn from_fallback(&self, request: &GradingRequest, fallback: &FallbackScore) -> GradingResult {
        let detail = feedback_from_rationale(&fallback.rationale)
            .unwrap_or_else(|| "Score estimated from keyword overlap.".to_string());
        let feedback = format!(
            "Automated review was unavailable ({}); score estimated from keyword overlap and flagged for human review. {}",
            fallback.reason.describe(),
            detail
        );
        self.assemble(
            request.max_points(),
            fallback.raw_score,
            GradingMethod::FallbackHeuristic,
            fallback.confidence,
            truncate_chars(&feedback, MAX_FEEDBACK_CHARS),
            Snap::Fraction,
        )
    }

    /// Clamps, rounds to the configured step and packages a raw score.
    ///
    /// Non-finite or out-of-range scores are corrected and downgraded to
    /// `FALLBACK_HEURISTIC` with zero confidence.
    pub fn finalize(
        &self,
        max_points: f64,
        raw_score: f64,
        method: GradingMethod,
        confidence: f64,
        feedback: String,
    ) -> GradingResult {
        self.assemble(max_points, raw_score, method, confidence, feedback, Snap::Points)
    }

    fn assemble(
        &self,
        max_points: f64,
        raw_score: f64,
        method: GradingMethod,
        confidence: f64,
        feedback: String,
        snap: Snap,
    ) -> GradingResult {
        if let Some(violation) = check_invariants(max_points, raw_score, method) {
            warn!(
                error = %violation,
                method = %method,
                raw_score = raw_score,
                max_points = max_points,
                "Internal invariant violation while assembling grading result"
            );
            let corrected = if raw_score.is_finite() {
                raw_score.clamp(0.0, max_points)
            } else {
                0.0
            };
            return GradingResult {
                score: corrected + 0.0,
                max_points,
                feedback: CORRECTED_FEEDBACK.to_string(),
                method: GradingMethod::FallbackHeuristic,
                confidence: 0.0,
            };
        }

        let snapped = match snap {
            _ if raw_score >= max_points => max_points,
            Snap::Exact => raw_score,
            Snap::Points => self.rounding.apply(raw_score),
            Snap::Fraction => self.rounding.scale_fraction(raw_score / max_points, max_points),
        };
        // `+ 0.0` turns a negative zero into zero.
        let score = snapped.clamp(0.0, max_points) + 0.0;

        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };

        debug!(
            method = %method,
            raw_score = raw_score,
            score = score,
            max_points = max_points,
            confidence = confidence,
            "Assembled grading result"
        );

        GradingResult {
            score,
            max_points,
            feedback,
            method,
            confidence,
        }
    }
}

fn check_invariants(
    max_points: f64,
    raw_score: f64,
    method: GradingMethod,
) -> Option<InvariantViolation> {
    if !raw_score.is_finite() {
        return Some(InvariantViolation::NonFinite { method });
    }
    if raw_score < 0.0 || raw_score > max_points {
        return Some(InvariantViolation::OutOfRange {
            method,
            score: raw_score,
            max_points,
        });
    }
    None
}

fn lexical_feedback(kind: &MatchKind, request: &GradingRequest) -> String {
    match kind {
        MatchKind::Exact => "Correct.".to_string(),
        MatchKind::Contained => {
            "Correct: your answer contains the expected answer.".to_string()
        }
        MatchKind::TokenOverlap { coverage } => format!(
            "Essentially correct: your answer covers {:.0}% of the expected answer.",
            coverage * 100.0
        ),
        MatchKind::ChoiceSelected => "Correct option selected.".to_string(),
        MatchKind::ChoiceMismatch => match request.correct_answer() {
            Some(expected) => truncate_chars(
                &format!("Incorrect option. The correct answer is: {}", expected.trim()),
                MAX_FEEDBACK_CHARS,
            ),
            None => "Incorrect option.".to_string(),
        },
    }
}

/// Collapses whitespace and bounds the length of a backend rationale.
pub fn feedback_from_rationale(rationale: &str) -> Option<String> {
    let collapsed = rationale.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    Some(truncate_chars(&collapsed, MAX_FEEDBACK_CHARS))
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

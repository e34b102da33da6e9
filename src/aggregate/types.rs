use serde::{Deserialize, Serialize};

use crate::constants::REVIEW_CONFIDENCE_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Which path of the pipeline produced a score.
pub enum GradingMethod {
    /// Deterministic normalized/lexical comparison.
    ExactMatch,
    /// Scored by a semantic backend.
    Semantic,
    /// Deterministic token-overlap estimate (or a corrected defect).
    FallbackHeuristic,
}

impl GradingMethod {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            GradingMethod::ExactMatch => "EXACT_MATCH",
            GradingMethod::Semantic => "SEMANTIC",
            GradingMethod::FallbackHeuristic => "FALLBACK_HEURISTIC",
        }
    }

    /// Returns `true` for paths that do not depend on any backend.
    #[inline]
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, GradingMethod::Semantic)
    }
}

impl std::fmt::Display for GradingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Final outcome of grading one answer.
///
/// Always satisfies `0 <= score <= max_points` and `0 <= confidence <= 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingResult {
    pub score: f64,
    pub max_points: f64,
    pub feedback: String,
    pub method: GradingMethod,
    pub confidence: f64,
}

impl GradingResult {
    /// Score as a fraction of `max_points`.
    pub fn fraction(&self) -> f64 {
        if self.max_points > 0.0 {
            self.score / self.max_points
        } else {
            0.0
        }
    }

    pub fn is_full_credit(&self) -> bool {
        self.score >= self.max_points
    }

    /// Returns `true` if a human grader should double-check this result.
    pub fn needs_review(&self) -> bool {
        self.method == GradingMethod::FallbackHeuristic
            || self.confidence < REVIEW_CONFIDENCE_THRESHOLD
    }
}

//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants from primary ones to avoid drift.
//!
//! # Confidence Ladder
//!
//! Confidence values are ordered so that callers can compare results produced
//! by different paths of the pipeline:
//!
//! 1. [`EXACT_CONFIDENCE`] for normalized equality (and multiple-choice grading)
//! 2. [`NEAR_EXACT_CONFIDENCE`] for containment / high token overlap
//! 3. Backend-specific semantic confidence (see `ScoringBackend::confidence`)
//! 4. [`FALLBACK_CONFIDENCE_WITH_REFERENCE`] / [`FALLBACK_CONFIDENCE_QUESTION_ONLY`]
//! 5. `0.0` for results that were corrected after an invariant violation

use std::time::Duration;

pub const EXACT_CONFIDENCE: f64 = 1.0;
pub const NEAR_EXACT_CONFIDENCE: f64 = 0.9;

pub const FALLBACK_CONFIDENCE_WITH_REFERENCE: f64 = 0.4;
pub const FALLBACK_CONFIDENCE_QUESTION_ONLY: f64 = 0.2;

/// Upper bound for any fallback confidence. Results at or below this value are
/// flagged for human review.
pub const MAX_FALLBACK_CONFIDENCE: f64 = 0.5;

pub const REVIEW_CONFIDENCE_THRESHOLD: f64 = MAX_FALLBACK_CONFIDENCE;

pub const DEFAULT_NEAR_EXACT_DISCOUNT: f64 = 0.95;
pub const DEFAULT_OVERLAP_THRESHOLD: f64 = 0.90;

/// Cap on fallback credit when the only rubric is the question itself.
pub const OPEN_RUBRIC_WEIGHT: f64 = 0.5;

pub const DEFAULT_ROUNDING_STEP: f64 = 0.5;

/// Fallback scores are rounded to this many equal parts of `max_points`.
pub const FRACTION_DIVISIONS: f64 = 20.0;

pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(2_000);
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(100);
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_millis(1_000);
pub const DEFAULT_OVERALL_BUDGET: Duration = Duration::from_millis(5_000);

pub const MAX_TEXT_CHARS: usize = 20_000;
pub const MAX_FEEDBACK_CHARS: usize = 600;

/// Largest batch accepted by the HTTP gateway.
pub const MAX_BATCH_SIZE: usize = 100;

pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

/// Words ignored by keyword-oriented comparisons (fallback heuristic, local backends).
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "shall",
    "can", "to", "of", "in", "for", "on", "with", "at", "by", "from", "as", "into", "through",
    "during", "before", "after", "above", "below", "between", "under", "then", "once", "here",
    "there", "when", "where", "why", "how", "all", "each", "few", "more", "most", "other", "some",
    "such", "nor", "only", "own", "same", "so", "than", "too", "very", "just", "and", "but",
    "if", "or", "because", "until", "while", "what", "which", "who", "whom", "this", "that",
    "these", "those", "am", "it", "its", "i", "you", "he", "she", "we", "they", "my", "your",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_ladder_is_ordered() {
        assert!(EXACT_CONFIDENCE > NEAR_EXACT_CONFIDENCE);
        assert!(NEAR_EXACT_CONFIDENCE > MAX_FALLBACK_CONFIDENCE);
        assert!(FALLBACK_CONFIDENCE_WITH_REFERENCE <= MAX_FALLBACK_CONFIDENCE);
        assert!(FALLBACK_CONFIDENCE_QUESTION_ONLY < FALLBACK_CONFIDENCE_WITH_REFERENCE);
    }

    #[test]
    fn test_default_timeouts_fit_budget() {
        assert!(DEFAULT_ATTEMPT_TIMEOUT <= DEFAULT_OVERALL_BUDGET);
        assert!(DEFAULT_INITIAL_BACKOFF <= DEFAULT_MAX_BACKOFF);
    }

    #[test]
    fn test_stop_words_are_lowercase() {
        for word in STOP_WORDS {
            assert_eq!(*word, word.to_lowercase());
        }
    }
}

use crate::scoring::ScoringBackendResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Why the semantic backend result was not used.
pub enum FallbackReason {
    NoBackend,
    Rejected,
    RetriesExhausted,
    BudgetExhausted,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::NoBackend => "no_backend",
            FallbackReason::Rejected => "rejected",
            FallbackReason::RetriesExhausted => "retries_exhausted",
            FallbackReason::BudgetExhausted => "budget_exhausted",
        }
    }

    /// Student-facing description, embedded in fallback feedback.
    pub fn describe(&self) -> &'static str {
        match self {
            FallbackReason::NoBackend => "no automated grader is configured",
            FallbackReason::Rejected => "the automated grader could not score this answer",
            FallbackReason::RetriesExhausted => "the automated grader did not respond",
            FallbackReason::BudgetExhausted => "the automated grader ran out of time",
        }
    }
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Deterministic estimate produced when no backend score is available.
pub struct FallbackScore {
    pub raw_score: f64,
    pub rationale: String,
    /// Never above `MAX_FALLBACK_CONFIDENCE`.
    pub confidence: f64,
    pub reason: FallbackReason,
}

#[derive(Debug, Clone, PartialEq)]
/// Outcome of the scoring stage. Always present.
pub enum ScoreOutcome {
    Semantic {
        response: ScoringBackendResponse,
        confidence: f64,
        attempts: u32,
    },
    Fallback(FallbackScore),
}

impl ScoreOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, ScoreOutcome::Fallback(_))
    }
}

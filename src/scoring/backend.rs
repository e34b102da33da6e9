use async_trait::async_trait;

use super::error::BackendError;
use super::types::{ScoringBackendResponse, ScoringContext};

/// Default confidence attached to results scored by a backend.
pub const DEFAULT_SEMANTIC_CONFIDENCE: f64 = 0.8;

/// Capability interface for anything that can grade a free-text answer.
///
/// Implementations must return scores on the `[0, context.max_points]` scale
/// and map their own failures onto [`BackendError`]. Callers never trust the
/// returned number to be in range.
#[async_trait]
pub trait ScoringBackend: Send + Sync + std::fmt::Debug {
    /// Short identifier used in logs and readiness reports.
    fn name(&self) -> &str;

    /// Confidence attached to a successful score from this backend.
    fn confidence(&self) -> f64 {
        DEFAULT_SEMANTIC_CONFIDENCE
    }

    /// Returns `true` if this backend calls out of process.
    fn is_remote(&self) -> bool {
        false
    }

    /// Scores one answer.
    async fn score(
        &self,
        context: &ScoringContext<'_>,
    ) -> Result<ScoringBackendResponse, BackendError>;
}

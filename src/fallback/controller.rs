use tracing::{debug, instrument, warn};

use crate::request::GradingRequest;
use crate::scoring::{BackendError, ScoringBackendResponse, ScoringContext, SemanticScorer};

use super::config::RetryPolicy;
use super::heuristic::FallbackHeuristic;
use super::types::{FallbackReason, ScoreOutcome};

/// Drives the semantic backend under a retry policy and guarantees an outcome.
///
/// - `Unavailable` errors and attempt timeouts are retried with doubling backoff.
/// - `Rejected` errors go straight to the heuristic.
/// - The whole exchange is bounded by `overall_budget`; when it runs out the
///   in-flight call is dropped.
#[derive(Debug, Clone)]
pub struct FallbackController {
    scorer: Option<SemanticScorer>,
    policy: RetryPolicy,
    heuristic: FallbackHeuristic,
}

impl FallbackController {
    pub fn new(scorer: Option<SemanticScorer>, policy: RetryPolicy) -> Self {
        Self {
            scorer,
            policy,
            heuristic: FallbackHeuristic::new(),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn scorer(&self) -> Option<&SemanticScorer> {
        self.scorer.as_ref()
    }

    #[instrument(skip(self, request), fields(question_type = %request.question_type()))]
    pub async fn score(&self, request: &GradingRequest) -> ScoreOutcome {
        let Some(scorer) = self.scorer.as_ref() else {
            debug!("No scoring backend configured; using fallback heuristic");
            return self.fallback(request, FallbackReason::NoBackend);
        };

        let context = ScoringContext::from_request(request);
        let budget = self.policy.overall_budget;

        match tokio::time::timeout(budget, self.attempt_loop(scorer, &context)).await {
            Ok(Ok((response, attempts))) => ScoreOutcome::Semantic {
                response,
                confidence: scorer.confidence(),
                attempts,
            },
            Ok(Err(reason)) => self.fallback(request, reason),
            Err(_) => {
                warn!(
                    backend = %scorer.backend_name(),
                    budget_ms = budget.as_millis() as u64,
                    "Scoring budget exhausted; dropping in-flight call"
                );
                self.fallback(request, FallbackReason::BudgetExhausted)
            }
        }
    }

    async fn attempt_loop(
        &self,
        scorer: &SemanticScorer,
        context: &ScoringContext<'_>,
    ) -> Result<(ScoringBackendResponse, u32), FallbackReason> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;

            let result =
                match tokio::time::timeout(self.policy.attempt_timeout, scorer.score(context)).await
                {
                    Ok(res) => res,
                    Err(_) => Err(BackendError::unavailable(
                        scorer.backend_name(),
                        format!("attempt timed out after {:?}", self.policy.attempt_timeout),
                    )),
                };

            let err = match result {
                Ok(response) => return Ok((response, attempt)),
                Err(err) => err,
            };

            if !err.is_transient() {
                warn!(error = %err, attempt, "Backend rejected the request; not retrying");
                return Err(FallbackReason::Rejected);
            }

            if attempt > self.policy.max_retries {
                warn!(error = %err, attempts = attempt, "Backend unavailable; retries exhausted");
                return Err(FallbackReason::RetriesExhausted);
            }

            let backoff = self.policy.backoff_for(attempt - 1);
            debug!(
                error = %err,
                attempt,
                backoff_ms = backoff.as_millis() as u64,
                "Backend unavailable; retrying"
            );
            tokio::time::sleep(backoff).await;
        }
    }

    fn fallback(&self, request: &GradingRequest, reason: FallbackReason) -> ScoreOutcome {
        let estimate = self.heuristic.estimate(request, reason);
        if reason != FallbackReason::NoBackend {
            warn!(
                reason = %reason,
                raw_score = estimate.raw_score,
                confidence = estimate.confidence,
                "Falling back to heuristic score"
            );
        }
        ScoreOutcome::Fallback(estimate)
    }
}

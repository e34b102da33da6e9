//! The grading pipeline.
//!
//! ```text
//! GradingRequest ─▶ LexicalMatcher ──hit──────────────────────────┐
//!                        │ miss                                    ▼
//!                        └─▶ FallbackController ─▶ backend │ heuristic ─▶ ResultAssembler ─▶ GradingResult
//! ```
//!
//! [`GradingEngine::grade`] is total: once a request is validated it always
//! yields a [`GradingResult`].

pub mod config;


pub use config::EngineConfig;

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, info, instrument};

use crate::aggregate::{GradingResult, ResultAssembler};
use crate::fallback::{FallbackController, ScoreOutcome};
use crate::hashing::fingerprint_hex;
use crate::lexical::LexicalMatcher;
use crate::request::{GradingRequest, GradingRequestPayload, ValidationError};
use crate::scoring::{ScoringBackend, SemanticScorer};

/// Grades answers. Cheap to share behind `Arc`; holds no mutable state.
#[derive(Debug, Clone)]
pub struct GradingEngine {
    matcher: LexicalMatcher,
    controller: FallbackController,
    assembler: ResultAssembler,
}

impl GradingEngine {
    /// Builds the engine with the backend named in `config`.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_backend(config, config.backend.build())
    }

    /// Builds the engine around an explicit backend (`None` disables semantic scoring).
    pub fn with_backend(config: &EngineConfig, backend: Option<Arc<dyn ScoringBackend>>) -> Self {
        Self {
            matcher: LexicalMatcher::new(config.matcher),
            controller: FallbackController::new(backend.map(SemanticScorer::new), config.retry),
            assembler: ResultAssembler::new(config.rounding),
        }
    }

    /// Name of the semantic backend, if one is configured.
    pub fn backend_name(&self) -> Option<&str> {
        self.controller.scorer().map(|s| s.backend_name())
    }

    pub fn has_remote_backend(&self) -> bool {
        self.controller.scorer().is_some_and(|s| s.is_remote())
    }

    #[instrument(
        skip(self, request),
        fields(
            fingerprint = %fingerprint_hex(request),
            question_type = %request.question_type(),
            max_points = request.max_points(),
        )
    )]
    pub async fn grade(&self, request: &GradingRequest) -> GradingResult {
        if let Some(credit) = self.matcher.evaluate(request) {
            let result = self.assembler.from_lexical(request, &credit);
            debug!(
                match_kind = credit.kind.debug_status(),
                score = result.score,
                "Settled by lexical match"
            );
            return result;
        }

        let result = match self.controller.score(request).await {
            ScoreOutcome::Semantic {
                response,
                confidence,
                attempts,
            } => {
                debug!(attempts, "Scored by semantic backend");
                self.assembler.from_semantic(request, &response, confidence)
            }
            ScoreOutcome::Fallback(fallback) => self.assembler.from_fallback(request, &fallback),
        };

        info!(
            method = %result.method,
            score = result.score,
            confidence = result.confidence,
            "Graded answer"
        );
        result
    }

    /// Validates then grades. Invalid payloads never produce a partial result.
    pub async fn grade_payload(
        &self,
        payload: GradingRequestPayload,
    ) -> Result<GradingResult, ValidationError> {
        let request = payload.validate()?;
        Ok(self.grade(&request).await)
    }

    /// Grades independent requests concurrently; results keep input order.
    pub async fn grade_batch(&self, requests: &[GradingRequest]) -> Vec<GradingResult> {
        join_all(requests.iter().map(|r| self.grade(r))).await
    }

    /// Validates every payload first; any invalid item fails the whole batch
    /// with field names prefixed by `requests[i]`.
    pub async fn grade_payloads(
        &self,
        payloads: Vec<GradingRequestPayload>,
    ) -> Result<Vec<GradingResult>, ValidationError> {
        let mut requests = Vec::with_capacity(payloads.len());
        let mut problems = Vec::new();

        for (i, payload) in payloads.into_iter().enumerate() {
            match payload.validate() {
                Ok(request) => requests.push(request),
                Err(err) => problems.extend(err.with_prefix(&format!("requests[{}]", i)).fields),
            }
        }

        if !problems.is_empty() {
            return Err(ValidationError::new(problems));
        }

        Ok(self.grade_batch(&requests).await)
    }
}

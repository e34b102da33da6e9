use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::backend::ScoringBackend;
use super::error::BackendError;
use super::types::{ScoringBackendResponse, ScoringContext};

/// Thin wrapper around the configured backend.
///
/// Logs every call and re-checks the score scale. Out-of-scale scores are
/// passed through unchanged; the result assembler corrects and downgrades them.
#[derive(Clone)]
pub struct SemanticScorer {
    backend: Arc<dyn ScoringBackend>,
}

impl std::fmt::Debug for SemanticScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScorer")
            .field("backend", &self.backend)
            .finish()
    }
}

impl SemanticScorer {
    pub fn new(backend: Arc<dyn ScoringBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn confidence(&self) -> f64 {
        self.backend.confidence()
    }

    pub fn is_remote(&self) -> bool {
        self.backend.is_remote()
    }

    #[instrument(skip(self, context), fields(backend = %self.backend.name(), max_points = context.max_points))]
    pub async fn score(
        &self,
        context: &ScoringContext<'_>,
    ) -> Result<ScoringBackendResponse, BackendError> {
        let response = self.backend.score(context).await?;

        if response.is_on_scale(context.max_points) {
            debug!(raw_score = response.raw_score, "Backend score received");
        } else {
            warn!(
                raw_score = response.raw_score,
                max_points = context.max_points,
                "Backend returned a score outside the requested scale"
            );
        }

        Ok(response)
    }
}

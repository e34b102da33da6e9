use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::backend::{DEFAULT_SEMANTIC_CONFIDENCE, ScoringBackend};
use super::error::BackendError;
use super::types::{ScoringBackendResponse, ScoringContext};

const MOCK_NAME: &str = "mock";

/// What a [`MockScoringBackend`] does on one call.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOutcome {
    Score { raw_score: f64, rationale: String },
    Unavailable(String),
    Rejected(String),
    /// Never completes.
    Hang,
}

impl MockOutcome {
    pub fn score(raw_score: f64, rationale: impl Into<String>) -> Self {
        MockOutcome::Score {
            raw_score,
            rationale: rationale.into(),
        }
    }
}

/// Scripted backend for tests.
///
/// Plays queued outcomes in order, then repeats the default outcome.
#[derive(Debug)]
pub struct MockScoringBackend {
    script: Mutex<VecDeque<MockOutcome>>,
    default: MockOutcome,
    latency: Duration,
    confidence: f64,
    calls: AtomicUsize,
}

impl MockScoringBackend {
    pub fn new(default: MockOutcome) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default,
            latency: Duration::ZERO,
            confidence: DEFAULT_SEMANTIC_CONFIDENCE,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fixed(raw_score: f64, rationale: impl Into<String>) -> Self {
        Self::new(MockOutcome::score(raw_score, rationale))
    }

    pub fn unavailable() -> Self {
        Self::new(MockOutcome::Unavailable("connection refused".to_string()))
    }

    pub fn rejected() -> Self {
        Self::new(MockOutcome::Rejected("content policy".to_string()))
    }

    pub fn hanging() -> Self {
        Self::new(MockOutcome::Hang)
    }

    /// Plays `outcomes` first, then `default` forever.
    pub fn scripted(outcomes: impl IntoIterator<Item = MockOutcome>, default: MockOutcome) -> Self {
        let backend = Self::new(default);
        backend.script.lock().extend(outcomes);
        backend
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Number of `score` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScoringBackend for MockScoringBackend {
    fn name(&self) -> &str {
        MOCK_NAME
    }

    fn confidence(&self) -> f64 {
        self.confidence
    }

    async fn score(
        &self,
        _context: &ScoringContext<'_>,
    ) -> Result<ScoringBackendResponse, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.default.clone());

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match outcome {
            MockOutcome::Score {
                raw_score,
                rationale,
            } => Ok(ScoringBackendResponse::new(raw_score, rationale)),
            MockOutcome::Unavailable(reason) => Err(BackendError::unavailable(MOCK_NAME, reason)),
            MockOutcome::Rejected(reason) => Err(BackendError::rejected(MOCK_NAME, reason)),
            MockOutcome::Hang => std::future::pending().await,
        }
    }
}

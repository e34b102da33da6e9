//! Autograde library crate (used by the server and integration tests).
//!
//! Grades free-text answers against a reference answer or an open rubric and
//! always returns a bounded, explainable score.
//!
//! # Pipeline
//!
//! 1. [`request`] validates input into an immutable [`GradingRequest`]
//! 2. [`lexical`] settles exact and near-exact answers deterministically
//! 3. [`fallback`] drives a [`ScoringBackend`] under timeouts and retries, or
//!    estimates a score from token overlap when no backend answer is usable
//! 4. [`aggregate`] clamps, rounds and packages the [`GradingResult`]
//!
//! [`GradingEngine`] wires the stages together; [`gateway`] exposes it over HTTP.
//!
//! ## Test/Mock Support
//! `MockScoringBackend` is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod aggregate;
pub mod config;
pub mod constants;
pub mod engine;
pub mod fallback;
pub mod gateway;
pub mod hashing;
pub mod lexical;
pub mod normalize;
pub mod request;
pub mod scoring;

pub use aggregate::{GradingMethod, GradingResult, ResultAssembler, Rounding};
pub use config::{Config, ConfigError};
pub use engine::{EngineConfig, GradingEngine};
pub use fallback::{FallbackController, FallbackReason, FallbackScore, RetryPolicy, ScoreOutcome};
pub use hashing::{fingerprint_hex, fingerprint_request};
pub use lexical::{LexicalMatcher, MatcherConfig};
pub use request::{GradingRequest, GradingRequestPayload, QuestionType, ValidationError};
#[cfg(any(test, feature = "mock"))]
pub use scoring::{MockOutcome, MockScoringBackend};
pub use scoring::{
    BackendConfig, BackendError, BackendKind, KeywordBackend, LlmBackend, ScoringBackend,
    ScoringBackendResponse, ScoringContext, SemanticScorer, TermVectorBackend,
};

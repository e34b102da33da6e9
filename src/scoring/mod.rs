//! Semantic scoring backends.
//!
//! A [`ScoringBackend`] grades a free-text answer on the request's point
//! scale. The engine holds one behind [`SemanticScorer`] and never trusts its
//! output: scores are re-checked by the result assembler and every failure is
//! mapped to a [`BackendError`] that the fallback controller can act on.
//!
//! # Backends
//!
//! - [`LlmBackend`]: chat model through `genai`, strict JSON reply
//! - [`KeywordBackend`]: key-term recall against the rubric
//! - [`TermVectorBackend`]: term-frequency cosine similarity
//! - `MockScoringBackend` (feature `mock`): scripted outcomes for tests

pub mod backend;
pub mod config;
pub mod error;
pub mod llm;
pub mod local;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod parse;
pub mod prompt;
pub mod scorer;
pub mod types;


pub use backend::{DEFAULT_SEMANTIC_CONFIDENCE, ScoringBackend};
pub use config::{BackendConfig, BackendKind};
pub use error::BackendError;
pub use llm::LlmBackend;
pub use local::{KeywordBackend, TermVectorBackend, cosine_similarity};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockOutcome, MockScoringBackend};
pub use scorer::SemanticScorer;
pub use types::{RubricMode, ScoringBackendResponse, ScoringContext};

//! Retry, timeout and fallback policy around the semantic backend.
//!
//! [`FallbackController::score`] never fails: it returns either a backend
//! score or a deterministic [`FallbackHeuristic`] estimate tagged with the
//! [`FallbackReason`].

pub mod config;
pub mod controller;
pub mod heuristic;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::RetryPolicy;
pub use controller::FallbackController;
pub use heuristic::FallbackHeuristic;
pub use types::{FallbackReason, FallbackScore, ScoreOutcome};

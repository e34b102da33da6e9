//! Score aggregation and result assembly.
//!
//! Every path through the pipeline (lexical short-circuit, semantic backend,
//! fallback heuristic) ends in [`ResultAssembler`], which clamps and rounds the
//! raw score and builds the caller-facing [`GradingResult`].

pub mod assembler;
pub mod config;
pub mod error;
pub mod types;


pub use assembler::{ResultAssembler, feedback_from_rationale};
pub use config::Rounding;
pub use error::InvariantViolation;
pub use types::{GradingMethod, GradingResult};

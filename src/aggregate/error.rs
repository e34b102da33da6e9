use thiserror::Error;

use super::types::GradingMethod;

/// A defect detected while assembling a result.
///
/// Never surfaced to callers: the assembler corrects it, downgrades the
/// result to `FALLBACK_HEURISTIC` with zero confidence and logs it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InvariantViolation {
    #[error("{method} produced a non-numeric score")]
    NonFinite { method: GradingMethod },

    #[error("{method} produced score {score} outside [0, {max_points}]")]
    OutOfRange {
        method: GradingMethod,
        score: f64,
        max_points: f64,
    },
}

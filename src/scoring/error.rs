use thiserror::Error;

/// Failure of a scoring backend call. Never fatal to the pipeline.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackendError {
    /// Transient failure reaching the backend (timeout, network, transport).
    #[error("scoring backend '{backend}' unavailable: {reason}")]
    Unavailable { backend: String, reason: String },

    /// Backend answered with an explicit error or an unusable payload.
    #[error("scoring backend '{backend}' rejected the request: {reason}")]
    Rejected { backend: String, reason: String },
}

impl BackendError {
    pub fn unavailable(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        BackendError::Unavailable {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    pub fn rejected(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        BackendError::Rejected {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, BackendError::Unavailable { .. })
    }

    pub fn reason(&self) -> &str {
        match self {
            BackendError::Unavailable { reason, .. } | BackendError::Rejected { reason, .. } => {
                reason
            }
        }
    }
}

use std::str::FromStr;
use std::sync::Arc;

use crate::constants::DEFAULT_LLM_MODEL;

use super::backend::ScoringBackend;
use super::llm::LlmBackend;
use super::local::{KeywordBackend, TermVectorBackend};

/// Which semantic backend the engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Chat model through `genai`.
    Llm,
    /// In-process key-term recall.
    #[default]
    Keyword,
    /// In-process term-vector cosine similarity.
    TermVector,
    /// No backend: free-text answers go straight to the fallback heuristic.
    Disabled,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Llm => "llm",
            BackendKind::Keyword => "keyword",
            BackendKind::TermVector => "term-vector",
            BackendKind::Disabled => "none",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "llm" | "remote" => Ok(BackendKind::Llm),
            "keyword" | "keywords" => Ok(BackendKind::Keyword),
            "term-vector" | "term_vector" | "similarity" => Ok(BackendKind::TermVector),
            "none" | "off" | "disabled" => Ok(BackendKind::Disabled),
            other => Err(format!(
                "unknown backend '{}' (expected llm, keyword, term-vector or none)",
                other
            )),
        }
    }
}

/// Backend selection and model parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub model: String,
    pub temperature: f64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            model: DEFAULT_LLM_MODEL.to_string(),
            temperature: 0.0,
        }
    }
}

impl BackendConfig {
    pub const ENV_BACKEND: &'static str = "AUTOGRADE_BACKEND";
    pub const ENV_MODEL: &'static str = "AUTOGRADE_MODEL";
    pub const ENV_TEMPERATURE: &'static str = "AUTOGRADE_TEMPERATURE";

    pub fn llm(model: impl Into<String>) -> Self {
        Self {
            kind: BackendKind::Llm,
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: BackendKind) -> Self {
        self.kind = kind;
        self
    }

    /// Reads the backend settings. Unparseable values are reported, not ignored.
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var(Self::ENV_BACKEND) {
            config.kind = value
                .parse()
                .map_err(|e| format!("{}: {}", Self::ENV_BACKEND, e))?;
        }
        if let Ok(value) = std::env::var(Self::ENV_MODEL) {
            config.model = value.trim().to_string();
        }
        if let Ok(value) = std::env::var(Self::ENV_TEMPERATURE) {
            config.temperature = value
                .trim()
                .parse()
                .map_err(|_| format!("{}: '{}' is not a number", Self::ENV_TEMPERATURE, value))?;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.kind == BackendKind::Llm && self.model.trim().is_empty() {
            return Err("model name must not be empty for the llm backend".to_string());
        }
        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be within [0, 2], got {}",
                self.temperature
            ));
        }
        Ok(())
    }

    /// Builds the configured backend, or `None` when scoring is disabled.
    pub fn build(&self) -> Option<Arc<dyn ScoringBackend>> {
        match self.kind {
            BackendKind::Llm => Some(Arc::new(LlmBackend::new(&self.model, self.temperature))),
            BackendKind::Keyword => Some(Arc::new(KeywordBackend::new())),
            BackendKind::TermVector => Some(Arc::new(TermVectorBackend::new())),
            BackendKind::Disabled => None,
        }
    }
}

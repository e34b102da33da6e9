use crate::aggregate::Rounding;
use crate::config::ConfigError;
use crate::fallback::RetryPolicy;
use crate::lexical::MatcherConfig;
use crate::scoring::BackendConfig;

/// Settings for every stage of the grading pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub matcher: MatcherConfig,
    pub retry: RetryPolicy,
    pub rounding: Rounding,
    pub backend: BackendConfig,
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            matcher: MatcherConfig::from_env().map_err(|e| ConfigError::invalid("matcher", e))?,
            retry: RetryPolicy::from_env().map_err(|e| ConfigError::invalid("retry", e))?,
            rounding: Rounding::from_env().map_err(|e| ConfigError::invalid("rounding", e))?,
            backend: BackendConfig::from_env().map_err(|e| ConfigError::invalid("backend", e))?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.matcher
            .validate()
            .map_err(|e| ConfigError::invalid("matcher", e))?;
        self.retry
            .validate()
            .map_err(|e| ConfigError::invalid("retry", e))?;
        self.rounding
            .validate()
            .map_err(|e| ConfigError::invalid("rounding", e))?;
        self.backend
            .validate()
            .map_err(|e| ConfigError::invalid("backend", e))?;
        Ok(())
    }
}

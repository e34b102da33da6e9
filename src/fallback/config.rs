use std::time::Duration;

use crate::constants::{
    DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_INITIAL_BACKOFF, DEFAULT_MAX_BACKOFF, DEFAULT_MAX_RETRIES,
    DEFAULT_OVERALL_BUDGET,
};

/// Timeouts and retry schedule for semantic backend calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Hard limit for one backend call.
    pub attempt_timeout: Duration,
    /// Retries after the first attempt (so `max_retries + 1` attempts at most).
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// Wall-clock limit for all attempts and backoff sleeps together.
    pub overall_budget: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
            overall_budget: DEFAULT_OVERALL_BUDGET,
        }
    }
}

impl RetryPolicy {
    pub const ENV_ATTEMPT_TIMEOUT_MS: &'static str = "AUTOGRADE_ATTEMPT_TIMEOUT_MS";
    pub const ENV_MAX_RETRIES: &'static str = "AUTOGRADE_MAX_RETRIES";
    pub const ENV_INITIAL_BACKOFF_MS: &'static str = "AUTOGRADE_INITIAL_BACKOFF_MS";
    pub const ENV_MAX_BACKOFF_MS: &'static str = "AUTOGRADE_MAX_BACKOFF_MS";
    pub const ENV_BUDGET_MS: &'static str = "AUTOGRADE_BUDGET_MS";

    /// No retries, same timeouts.
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    pub fn with_overall_budget(mut self, budget: Duration) -> Self {
        self.overall_budget = budget;
        self
    }

    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();
        Ok(Self {
            attempt_timeout: env_millis(Self::ENV_ATTEMPT_TIMEOUT_MS)?
                .unwrap_or(defaults.attempt_timeout),
            max_retries: match std::env::var(Self::ENV_MAX_RETRIES) {
                Ok(v) => v.trim().parse().map_err(|_| {
                    format!("{}: '{}' is not a valid retry count", Self::ENV_MAX_RETRIES, v)
                })?,
                Err(_) => defaults.max_retries,
            },
            initial_backoff: env_millis(Self::ENV_INITIAL_BACKOFF_MS)?
                .unwrap_or(defaults.initial_backoff),
            max_backoff: env_millis(Self::ENV_MAX_BACKOFF_MS)?.unwrap_or(defaults.max_backoff),
            overall_budget: env_millis(Self::ENV_BUDGET_MS)?.unwrap_or(defaults.overall_budget),
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.attempt_timeout.is_zero() {
            return Err("attempt timeout must be > 0".to_string());
        }
        if self.overall_budget.is_zero() {
            return Err("overall budget must be > 0".to_string());
        }
        if self.initial_backoff > self.max_backoff {
            return Err(format!(
                "initial backoff ({:?}) exceeds max backoff ({:?})",
                self.initial_backoff, self.max_backoff
            ));
        }
        Ok(())
    }

    /// Sleep before retry number `retry` (0-based): doubles each time, capped.
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

fn env_millis(key: &str) -> Result<Option<Duration>, String> {
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| format!("{}: '{}' is not a number of milliseconds", key, v)),
        Err(_) => Ok(None),
    }
}

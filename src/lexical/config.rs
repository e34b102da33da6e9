use crate::constants::{DEFAULT_NEAR_EXACT_DISCOUNT, DEFAULT_OVERLAP_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherConfig {
    /// Fraction of `max_points` awarded for a near-exact match.
    pub near_exact_discount: f64,

    /// Share of reference tokens that must appear in the student answer.
    pub overlap_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            near_exact_discount: DEFAULT_NEAR_EXACT_DISCOUNT,
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
        }
    }
}

impl MatcherConfig {
    pub const ENV_NEAR_EXACT_DISCOUNT: &'static str = "AUTOGRADE_NEAR_EXACT_DISCOUNT";
    pub const ENV_OVERLAP_THRESHOLD: &'static str = "AUTOGRADE_OVERLAP_THRESHOLD";

    pub fn with_near_exact_discount(mut self, discount: f64) -> Self {
        self.near_exact_discount = discount;
        self
    }

    pub fn with_overlap_threshold(mut self, threshold: f64) -> Self {
        self.overlap_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.near_exact_discount > 0.0 && self.near_exact_discount <= 1.0) {
            return Err(format!(
                "near-exact discount must be in (0.0, 1.0], got {}",
                self.near_exact_discount
            ));
        }
        if !(self.overlap_threshold > 0.0 && self.overlap_threshold <= 1.0) {
            return Err(format!(
                "overlap threshold must be in (0.0, 1.0], got {}",
                self.overlap_threshold
            ));
        }
        Ok(())
    }

    /// Reads thresholds from the environment. Unparseable values are reported.
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();
        if let Some(discount) = env_f64(Self::ENV_NEAR_EXACT_DISCOUNT)? {
            config.near_exact_discount = discount;
        }
        if let Some(threshold) = env_f64(Self::ENV_OVERLAP_THRESHOLD)? {
            config.overlap_threshold = threshold;
        }
        Ok(config)
    }
}

fn env_f64(key: &str) -> Result<Option<f64>, String> {
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| format!("{}: '{}' is not a number", key, v)),
        Err(_) => Ok(None),
    }
}

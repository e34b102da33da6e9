use crate::constants::{DEFAULT_ROUNDING_STEP, FRACTION_DIVISIONS};

/// Score rounding granularity.
///
/// Scores are rounded to the nearest multiple of `step`, ties toward zero so
/// rounding never inflates a grade. A step of `0.0` disables rounding, both in
/// points and for fractions of `max_points`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rounding {
    pub step: f64,
}

impl Default for Rounding {
    fn default() -> Self {
        Self {
            step: DEFAULT_ROUNDING_STEP,
        }
    }
}

impl Rounding {
    pub const ENV_STEP: &'static str = "AUTOGRADE_ROUNDING_STEP";

    pub fn new(step: f64) -> Self {
        Self { step }
    }

    pub fn none() -> Self {
        Self { step: 0.0 }
    }

    pub fn from_env() -> Result<Self, String> {
        match std::env::var(Self::ENV_STEP) {
            Ok(v) => v
                .trim()
                .parse()
                .map(Self::new)
                .map_err(|_| format!("{}: '{}' is not a number", Self::ENV_STEP, v)),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.step.is_finite() || self.step < 0.0 {
            return Err(format!(
                "rounding step must be a finite number >= 0, got {}",
                self.step
            ));
        }
        Ok(())
    }

    /// Rounds `value` to the configured step.
    pub fn apply(&self, value: f64) -> f64 {
        if self.step <= 0.0 {
            return value;
        }
        round_units(value / self.step) * self.step
    }

    /// Rounds `fraction` to whole [`FRACTION_DIVISIONS`] and returns it in
    /// points of `max_points`.
    ///
    /// The rounded fraction does not depend on `max_points`, so doubling
    /// `max_points` doubles the score exactly.
    pub fn scale_fraction(&self, fraction: f64, max_points: f64) -> f64 {
        if self.step <= 0.0 {
            return fraction * max_points;
        }
        round_units(fraction * FRACTION_DIVISIONS) * max_points / FRACTION_DIVISIONS
    }
}

/// Nearest whole number of units.
fn round_units(units: f64) -> f64 {
    let lower = units.floor();
    // Ties (and float noise around them) go down.
    if units - lower > 0.5 + 1e-9 {
        lower + 1.0
    } else {
        lower
    }
}

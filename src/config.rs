//! Typed session configuration.
//!
//! A session is configured by its time increment, its total simulated
//! duration and the policy applied to stocks that no flow touched during a
//! step. Configurations can be built in code or parsed from JSON; missing
//! fields fall back to the defaults below.

use crate::error::{ModelError, SimResult};
use serde::{Deserialize, Serialize};

// Absorbs floating-point error in `duration / dt` (e.g. 80 / 0.25).
const STEP_COUNT_TOLERANCE: f64 = 1e-9;

/// What happens to a stock that no flow affected during a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdleStockPolicy {
    /// Repeat the last value so the stock stays step-aligned with everything else.
    #[default]
    Hold,
    /// Leave the history untouched; the stock falls behind the step counter.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Time increment per step. Must be positive.
    pub dt: f64,
    /// Total simulated time. Must be non-negative; zero means no steps.
    pub duration: f64,
    pub idle_stock: IdleStockPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dt: 0.25,
            duration: 13.0,
            idle_stock: IdleStockPolicy::default(),
        }
    }
}

impl SessionConfig {
    pub fn new(dt: f64, duration: f64) -> Self {
        Self { dt, duration, ..Self::default() }
    }

    pub fn with_idle_stock(mut self, policy: IdleStockPolicy) -> Self {
        self.idle_stock = policy;
        self
    }

    /// Parses and validates a JSON document such as
    /// `{"dt": 0.25, "duration": 80, "idle_stock": "skip"}`.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SimResult<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ModelError::InvalidConfiguration {
                reason: format!("dt must be positive and finite, got {}", self.dt),
            });
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(ModelError::InvalidConfiguration {
                reason: format!("duration must be non-negative and finite, got {}", self.duration),
            });
        }
        let steps = self.duration / self.dt;
        if !steps.is_finite() || steps >= usize::MAX as f64 {
            return Err(ModelError::InvalidConfiguration {
                reason: format!("duration / dt is too large to count steps, got {steps}"),
            });
        }
        Ok(())
    }

    /// `floor(duration / dt)`.
    pub fn total_steps(&self) -> usize {
        (self.duration / self.dt + STEP_COUNT_TOLERANCE).floor() as usize
    }
}

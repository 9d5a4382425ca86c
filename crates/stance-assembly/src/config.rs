//! Analysis configuration.
//!
//! Parameters that control matrix assembly and the feasibility solve:
//! tolerances, iteration limit, gravity and optional force rounding.

use serde::{Deserialize, Serialize};
use stance_math::SimplexOptions;
use stance_types::constants::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_PIVOT_TOLERANCE, DEFAULT_TOLERANCE, GRAVITY,
    REFERENCE_FORCE_DECIMALS,
};
use stance_types::{StanceError, StanceResult};

/// Configuration for a stability analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StabilityConfig {
    /// Absolute tolerance for equality-constraint satisfaction: a standing
    /// verdict guarantees `max |A·x| ≤ tolerance`.
    pub tolerance: f64,

    /// Simplex pivot threshold.
    pub pivot_tolerance: f64,

    /// Maximum simplex pivots per solve.
    pub max_iterations: u32,

    /// Gravitational acceleration (m/s²), acting along −Y.
    pub gravity: f64,

    /// Round unit force components to this many decimals before building
    /// wrenches. `None` keeps full precision.
    pub force_decimals: Option<u32>,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            gravity: GRAVITY,
            force_decimals: None,
        }
    }
}

impl StabilityConfig {
    /// Tighter equality tolerance.
    pub fn strict() -> Self {
        Self {
            tolerance: 1e-9,
            pivot_tolerance: 1e-12,
            ..Default::default()
        }
    }

    /// Four-decimal force rounding, matching the reference analysis tables.
    pub fn reference() -> Self {
        Self {
            force_decimals: Some(REFERENCE_FORCE_DECIMALS),
            ..Default::default()
        }
    }

    /// Rejects values the solver cannot work with.
    pub fn validate(&self) -> StanceResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(StanceError::InvalidConfig(format!(
                "Tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if !(self.pivot_tolerance.is_finite() && self.pivot_tolerance > 0.0) {
            return Err(StanceError::InvalidConfig(format!(
                "Pivot tolerance must be positive, got {}",
                self.pivot_tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(StanceError::InvalidConfig(
                "Solver iterations must be >= 1".into(),
            ));
        }
        if !(self.gravity.is_finite() && self.gravity >= 0.0) {
            return Err(StanceError::InvalidConfig(format!(
                "Gravity must be finite and non-negative, got {}",
                self.gravity
            )));
        }
        if matches!(self.force_decimals, Some(d) if d > 15) {
            return Err(StanceError::InvalidConfig(
                "Force rounding beyond 15 decimals is meaningless for f64".into(),
            ));
        }
        Ok(())
    }

    /// Simplex options derived from this configuration.
    pub fn simplex_options(&self) -> SimplexOptions {
        SimplexOptions {
            tolerance: self.tolerance,
            pivot_tolerance: self.pivot_tolerance,
            max_iterations: self.max_iterations,
        }
    }
}

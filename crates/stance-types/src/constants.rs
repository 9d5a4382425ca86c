//! Physical constants and analysis defaults.

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Default tolerance for equality-constraint satisfaction.
pub const DEFAULT_TOLERANCE: f64 = 1.0e-6;

/// Default pivot threshold for the simplex tableau.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1.0e-9;

/// Default simplex iteration cap (both phases combined).
pub const DEFAULT_MAX_ITERATIONS: u32 = 10_000;

/// Decimal places the reference analysis rounds unit force components to.
pub const REFERENCE_FORCE_DECIMALS: u32 = 4;

/// Equations per body: moment, force-x, force-y.
pub const ROWS_PER_BODY: usize = 3;

/// Friction-cone edge generators per contact.
pub const EDGES_PER_CONTACT: usize = 2;

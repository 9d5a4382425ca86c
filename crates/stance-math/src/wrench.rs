//! Planar wrenches.
//!
//! A wrench is stored as `(moment_z, force_x, force_y)`, with the moment
//! taken about the global-frame origin.

use std::ops::{Add, Mul, Neg};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A planar generalized force: moment about the origin plus a force vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Wrench {
    /// Z-component of the moment about the global origin.
    pub moment: f64,
    /// Force along X.
    pub fx: f64,
    /// Force along Y.
    pub fy: f64,
}

impl Wrench {
    pub const ZERO: Wrench = Wrench {
        moment: 0.0,
        fx: 0.0,
        fy: 0.0,
    };

    pub fn new(moment: f64, fx: f64, fy: f64) -> Self {
        Self { moment, fx, fy }
    }

    /// Wrench of `force` acting at `point`.
    pub fn from_point_force(point: DVec2, force: DVec2) -> Self {
        Self {
            moment: point.perp_dot(force),
            fx: force.x,
            fy: force.y,
        }
    }

    /// Force part as a vector.
    #[inline]
    pub fn force(&self) -> DVec2 {
        DVec2::new(self.fx, self.fy)
    }

    /// Components in equation-row order: moment, force-x, force-y.
    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.moment, self.fx, self.fy]
    }

    /// Largest absolute component.
    pub fn max_abs(&self) -> f64 {
        self.moment.abs().max(self.fx.abs()).max(self.fy.abs())
    }
}

impl Neg for Wrench {
    type Output = Wrench;

    fn neg(self) -> Wrench {
        Wrench::new(-self.moment, -self.fx, -self.fy)
    }
}

impl Add for Wrench {
    type Output = Wrench;

    fn add(self, rhs: Wrench) -> Wrench {
        Wrench::new(self.moment + rhs.moment, self.fx + rhs.fx, self.fy + rhs.fy)
    }
}

impl Mul<f64> for Wrench {
    type Output = Wrench;

    fn mul(self, s: f64) -> Wrench {
        Wrench::new(self.moment * s, self.fx * s, self.fy * s)
    }
}

/// Wrench of a unit force with direction `angle` (radians) applied at `point`.
///
/// The moment is the 2-D cross product `x·f_y − y·f_x`.
pub fn wrench_from_force(point: DVec2, angle: f64) -> Wrench {
    let (sin, cos) = angle.sin_cos();
    Wrench::from_point_force(point, DVec2::new(cos, sin))
}

/// Like [`wrench_from_force`], but rounds the unit force components to
/// `decimals` places before taking the moment.
pub fn wrench_from_force_rounded(point: DVec2, angle: f64, decimals: u32) -> Wrench {
    let (sin, cos) = angle.sin_cos();
    let force = DVec2::new(round_to_decimals(cos, decimals), round_to_decimals(sin, decimals));
    Wrench::from_point_force(point, force)
}

/// Round half away from zero to a fixed number of decimal places.
pub fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

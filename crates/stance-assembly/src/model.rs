//! Scenario records: rigid bodies and the contacts between them.
//!
//! Both are plain immutable values supplied by the caller. The analysis
//! never mutates them.

use serde::{Deserialize, Serialize};
use stance_math::DVec2;
use stance_types::BodyId;

/// A rigid planar body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Non-zero identifier (`0` is the ground).
    pub id: BodyId,
    /// Center of mass in the global frame.
    pub center_of_mass: DVec2,
    /// Mass (kg). Zero is allowed: the body then carries no weight.
    pub mass: f64,
}

impl Body {
    pub fn new(id: u32, cm_x: f64, cm_y: f64, mass: f64) -> Self {
        Self {
            id: BodyId(id),
            center_of_mass: DVec2::new(cm_x, cm_y),
            mass,
        }
    }

    /// Weight force under gravitational acceleration `gravity`.
    #[inline]
    pub fn weight(&self, gravity: f64) -> DVec2 {
        DVec2::new(0.0, -self.mass * gravity)
    }
}

/// A point of force transmission between two bodies (either may be ground).
///
/// `normal_angle` is the direction of the contact normal in the global
/// frame, pointing from `body_2` into `body_1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub body_1: BodyId,
    pub body_2: BodyId,
    /// Contact point in the global frame.
    pub point: DVec2,
    /// Normal direction (radians).
    pub normal_angle: f64,
    /// Coulomb friction coefficient.
    pub mu: f64,
}

impl Contact {
    pub fn new(body_1: u32, body_2: u32, x: f64, y: f64, normal_angle: f64, mu: f64) -> Self {
        Self {
            body_1: BodyId(body_1),
            body_2: BodyId(body_2),
            point: DVec2::new(x, y),
            normal_angle,
            mu,
        }
    }

    /// Unit contact normal.
    #[inline]
    pub fn normal(&self) -> DVec2 {
        DVec2::from_angle(self.normal_angle)
    }

    /// Returns true if either side is the ground.
    pub fn touches_ground(&self) -> bool {
        self.body_1.is_ground() || self.body_2.is_ground()
    }

    /// Returns true if `id` is one of the two sides.
    pub fn involves(&self, id: BodyId) -> bool {
        self.body_1 == id || self.body_2 == id
    }

    /// Copy of this contact with a different friction coefficient.
    pub fn with_mu(mut self, mu: f64) -> Self {
        self.mu = mu;
        self
    }
}

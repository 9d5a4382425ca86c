//! Linearized Coulomb friction cones.
//!
//! The cone at a contact has half-angle `α = atan(mu)` around the normal.
//! It is replaced by its two edge generators at `normal − α` and `normal + α`;
//! any admissible contact force is a non-negative combination of the two.

use stance_math::{wrench_from_force, wrench_from_force_rounded, Wrench};

use crate::model::Contact;

/// The two boundary wrenches of a contact's friction cone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrenchCone {
    /// Edge at `normal − α`.
    pub first: Wrench,
    /// Edge at `normal + α`.
    pub second: Wrench,
    /// Half-angle `α` (radians).
    pub half_angle: f64,
}

impl WrenchCone {
    /// Edges in column order.
    #[inline]
    pub fn edges(&self) -> [Wrench; 2] {
        [self.first, self.second]
    }

    /// Angle between the two edges, `2·atan(mu)`.
    #[inline]
    pub fn opening(&self) -> f64 {
        2.0 * self.half_angle
    }

    /// Wrench of the force `a·first + b·second`.
    pub fn combine(&self, a: f64, b: f64) -> Wrench {
        self.first * a + self.second * b
    }
}

/// Friction cone of `contact` at full precision.
pub fn wrench_cone(contact: &Contact) -> WrenchCone {
    wrench_cone_with(contact, None)
}

/// Friction cone of `contact`, optionally rounding unit force components
/// to `force_decimals` places.
///
/// `mu = 0` yields two identical edges (a frictionless contact).
pub fn wrench_cone_with(contact: &Contact, force_decimals: Option<u32>) -> WrenchCone {
    let half_angle = contact.mu.atan();
    let edge = |angle: f64| match force_decimals {
        Some(decimals) => wrench_from_force_rounded(contact.point, angle, decimals),
        None => wrench_from_force(contact.point, angle),
    };

    WrenchCone {
        first: edge(contact.normal_angle - half_angle),
        second: edge(contact.normal_angle + half_angle),
        half_angle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn edges_straddle_the_normal() {
        let contact = Contact::new(1, 0, 0.0, 0.0, FRAC_PI_2, 1.0);
        let cone = wrench_cone(&contact);
        // mu = 1 → edges at 45° and 135°
        assert!((cone.first.fx - cone.first.fy).abs() < 1e-12);
        assert!((cone.second.fx + cone.second.fy).abs() < 1e-12);
        assert!(cone.first.fx > 0.0 && cone.second.fx < 0.0);
    }

    #[test]
    fn combine_is_linear() {
        let contact = Contact::new(1, 0, 2.0, 0.0, FRAC_PI_2, 0.5);
        let cone = wrench_cone(&contact);
        let w = cone.combine(1.0, 1.0);
        // Symmetric edges cancel tangentially
        assert!(w.fx.abs() < 1e-12);
        assert!(w.fy > 0.0);
    }
}

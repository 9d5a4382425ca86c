//! Contact forces recovered from a standing solution.

use serde::{Deserialize, Serialize};
use stance_math::DVec2;
use stance_types::constants::EDGES_PER_CONTACT;
use stance_types::{StanceError, StanceResult};

use crate::cone::wrench_cone_with;
use crate::config::StabilityConfig;
use crate::model::Contact;

/// Resultant force a contact applies to its `body_1` side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactForce {
    /// Position of the contact in the input list.
    pub contact: usize,
    /// Force vector in the global frame.
    pub force: DVec2,
    /// Moment of the force about the global origin.
    pub moment: f64,
    /// Component along the contact normal.
    pub normal: f64,
    /// Signed component perpendicular to the normal (counter-clockwise positive).
    pub tangential: f64,
}

impl ContactForce {
    /// Returns true if `|tangential| ≤ mu·normal` within `tolerance`.
    pub fn within_friction_cone(&self, mu: f64, tolerance: f64) -> bool {
        self.normal >= -tolerance && self.tangential.abs() <= mu * self.normal + tolerance
    }
}

/// Combine each contact's edge wrenches with its two solved coefficients.
pub fn contact_forces(
    contacts: &[Contact],
    coefficients: &[f64],
    config: &StabilityConfig,
) -> StanceResult<Vec<ContactForce>> {
    let needed = EDGES_PER_CONTACT * contacts.len();
    if coefficients.len() < needed {
        return Err(StanceError::InvalidConfig(format!(
            "Expected at least {needed} coefficients for {} contacts, got {}",
            contacts.len(),
            coefficients.len()
        )));
    }

    Ok(contacts
        .iter()
        .enumerate()
        .map(|(k, contact)| {
            let cone = wrench_cone_with(contact, config.force_decimals);
            let w = cone.combine(
                coefficients[EDGES_PER_CONTACT * k],
                coefficients[EDGES_PER_CONTACT * k + 1],
            );
            let force = w.force();
            let n = contact.normal();
            ContactForce {
                contact: k,
                force,
                moment: w.moment,
                normal: n.dot(force),
                tangential: n.perp_dot(force),
            }
        })
        .collect())
}

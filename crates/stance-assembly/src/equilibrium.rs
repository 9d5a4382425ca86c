//! Equilibrium matrix assembly.
//!
//! The system has one 3-row block per body (moment, force-x, force-y, in the
//! order the bodies are listed) and one column per unknown:
//!
//! ```text
//! columns: [ c0.e1  c0.e2 | c1.e1  c1.e2 | … | g(body 0) | g(body 1) | … ]
//!           └── two friction-cone edges per contact ──┘  └ one weight per body ┘
//! ```
//!
//! A contact column writes its edge wrench into `body_1`'s block and the
//! negated wrench into `body_2`'s block (action and reaction). The ground
//! owns no block, so grounded contacts touch a single block. A weight column
//! touches only its own body's block.

use std::collections::HashMap;
use std::ops::Range;

use stance_math::{Mat, Wrench};
use stance_types::constants::{EDGES_PER_CONTACT, ROWS_PER_BODY};
use stance_types::{BodyId, StanceError, StanceResult};

use crate::cone::wrench_cone_with;
use crate::config::StabilityConfig;
use crate::model::{Body, Contact};

/// Maps body ids to their row block, assigned by list position.
#[derive(Debug, Clone, Default)]
pub struct BodyIndex {
    blocks: HashMap<BodyId, usize>,
}

impl BodyIndex {
    /// Index the bodies, rejecting ground ids, duplicates and bad parameters.
    pub fn new(bodies: &[Body]) -> StanceResult<Self> {
        let mut blocks = HashMap::with_capacity(bodies.len());
        for (position, body) in bodies.iter().enumerate() {
            if body.id.is_ground() {
                return Err(StanceError::InvalidTopology(format!(
                    "Body at position {position} uses the reserved ground id 0"
                )));
            }
            if !(body.center_of_mass.is_finite()) {
                return Err(StanceError::InvalidParameter(format!(
                    "{} has a non-finite center of mass",
                    body.id
                )));
            }
            if !(body.mass.is_finite() && body.mass >= 0.0) {
                return Err(StanceError::InvalidParameter(format!(
                    "{} has invalid mass {}",
                    body.id, body.mass
                )));
            }
            if blocks.insert(body.id, position).is_some() {
                return Err(StanceError::InvalidTopology(format!(
                    "{} is listed more than once",
                    body.id
                )));
            }
        }
        Ok(Self { blocks })
    }

    /// Block index of `id`, `None` for the ground or an unknown id.
    pub fn block(&self, id: BodyId) -> Option<usize> {
        self.blocks.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// How a contact's edge wrenches are placed into row blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactTopology {
    /// `body_2` is the ground; the wrench acts on `body_1`.
    FirstOnGround { body: usize },
    /// `body_1` is the ground; the wrench acts on `body_2`.
    SecondOnGround { body: usize },
    /// Two movable bodies: `+wrench` on `first`, `−wrench` on `second`.
    BetweenBodies { first: usize, second: usize },
}

impl ContactTopology {
    /// Resolve the blocks touched by contact number `position`.
    pub fn classify(contact: &Contact, index: &BodyIndex, position: usize) -> StanceResult<Self> {
        let lookup = |id: BodyId| {
            index.block(id).ok_or_else(|| {
                StanceError::InvalidTopology(format!(
                    "Contact {position} references {id}, which is not in the body list"
                ))
            })
        };

        match (contact.body_1.is_ground(), contact.body_2.is_ground()) {
            (true, true) => Err(StanceError::InvalidTopology(format!(
                "Contact {position} joins the ground to itself"
            ))),
            (false, true) => Ok(Self::FirstOnGround {
                body: lookup(contact.body_1)?,
            }),
            (true, false) => Ok(Self::SecondOnGround {
                body: lookup(contact.body_2)?,
            }),
            (false, false) => {
                if contact.body_1 == contact.body_2 {
                    return Err(StanceError::InvalidTopology(format!(
                        "Contact {position} joins {} to itself",
                        contact.body_1
                    )));
                }
                Ok(Self::BetweenBodies {
                    first: lookup(contact.body_1)?,
                    second: lookup(contact.body_2)?,
                })
            }
        }
    }

    /// `(block, sign)` pairs receiving the contact wrench.
    pub fn placements(&self) -> impl Iterator<Item = (usize, f64)> {
        let table: [Option<(usize, f64)>; 2] = match *self {
            Self::FirstOnGround { body } | Self::SecondOnGround { body } => {
                [Some((body, 1.0)), None]
            }
            Self::BetweenBodies { first, second } => [Some((first, 1.0)), Some((second, -1.0))],
        };
        table.into_iter().flatten()
    }
}

/// The assembled equilibrium system `A` with `A·x = 0` at equilibrium.
#[derive(Debug, Clone)]
pub struct EquilibriumSystem {
    matrix: Mat<f64>,
    body_count: usize,
    contact_count: usize,
}

impl EquilibriumSystem {
    pub fn matrix(&self) -> &Mat<f64> {
        &self.matrix
    }

    /// `3 × bodies`.
    pub fn row_count(&self) -> usize {
        self.matrix.nrows()
    }

    /// `2 × contacts + bodies`.
    pub fn column_count(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn body_count(&self) -> usize {
        self.body_count
    }

    pub fn contact_count(&self) -> usize {
        self.contact_count
    }

    /// Number of friction-cone edge unknowns.
    pub fn friction_column_count(&self) -> usize {
        EDGES_PER_CONTACT * self.contact_count
    }

    /// The two edge columns of contact `contact`.
    pub fn contact_columns(&self, contact: usize) -> [usize; 2] {
        let first = EDGES_PER_CONTACT * contact;
        [first, first + 1]
    }

    /// Weight column of the body at list position `body`.
    pub fn gravity_column(&self, body: usize) -> usize {
        self.friction_column_count() + body
    }

    /// Returns true if column `column` is a weight column.
    pub fn is_gravity_column(&self, column: usize) -> bool {
        column >= self.friction_column_count() && column < self.column_count()
    }

    /// Rows of the body at list position `body`.
    pub fn body_rows(&self, body: usize) -> Range<usize> {
        let start = ROWS_PER_BODY * body;
        start..start + ROWS_PER_BODY
    }

    /// The 3 entries of `column` inside `body`'s block.
    pub fn block(&self, body: usize, column: usize) -> Wrench {
        let r = ROWS_PER_BODY * body;
        Wrench::new(
            self.matrix[(r, column)],
            self.matrix[(r + 1, column)],
            self.matrix[(r + 2, column)],
        )
    }

    /// `A·x`: net wrench on every body, stacked by block.
    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        (0..self.row_count())
            .map(|i| {
                (0..self.column_count())
                    .map(|j| self.matrix[(i, j)] * x[j])
                    .sum()
            })
            .collect()
    }

    /// Largest absolute entry of `A·x`.
    pub fn max_residual(&self, x: &[f64]) -> f64 {
        self.apply(x).into_iter().map(f64::abs).fold(0.0, f64::max)
    }

    /// `(matrix, row_count, column_count)`.
    pub fn into_parts(self) -> (Mat<f64>, usize, usize) {
        let rows = self.row_count();
        let cols = self.column_count();
        (self.matrix, rows, cols)
    }
}

/// Build the equilibrium system with the default configuration.
pub fn build_equilibrium(bodies: &[Body], contacts: &[Contact]) -> StanceResult<EquilibriumSystem> {
    build_equilibrium_with(bodies, contacts, &StabilityConfig::default())
}

/// Build the equilibrium system.
///
/// Validates the whole topology before writing anything: ground ids in the
/// body list, duplicate ids, ground-to-ground or self contacts, unknown body
/// references and out-of-range parameters are all rejected.
pub fn build_equilibrium_with(
    bodies: &[Body],
    contacts: &[Contact],
    config: &StabilityConfig,
) -> StanceResult<EquilibriumSystem> {
    config.validate()?;
    let index = BodyIndex::new(bodies)?;
    let topologies = contacts
        .iter()
        .enumerate()
        .map(|(position, contact)| {
            validate_contact(contact, position)?;
            ContactTopology::classify(contact, &index, position)
        })
        .collect::<StanceResult<Vec<_>>>()?;

    let rows = ROWS_PER_BODY * bodies.len();
    let friction_columns = EDGES_PER_CONTACT * contacts.len();
    let columns = friction_columns + bodies.len();
    let mut matrix = Mat::<f64>::zeros(rows, columns);

    for (k, (contact, topology)) in contacts.iter().zip(&topologies).enumerate() {
        let cone = wrench_cone_with(contact, config.force_decimals);
        for (e, edge) in cone.edges().into_iter().enumerate() {
            let column = EDGES_PER_CONTACT * k + e;
            for (block, sign) in topology.placements() {
                write_block(&mut matrix, block, column, edge * sign);
            }
        }
    }

    for (i, body) in bodies.iter().enumerate() {
        let weight = Wrench::from_point_force(body.center_of_mass, body.weight(config.gravity));
        write_block(&mut matrix, i, friction_columns + i, weight);
    }

    tracing::debug!(
        bodies = bodies.len(),
        contacts = contacts.len(),
        rows,
        columns,
        "equilibrium matrix assembled"
    );

    Ok(EquilibriumSystem {
        matrix,
        body_count: bodies.len(),
        contact_count: contacts.len(),
    })
}

fn validate_contact(contact: &Contact, position: usize) -> StanceResult<()> {
    if !(contact.point.is_finite() && contact.normal_angle.is_finite()) {
        return Err(StanceError::InvalidParameter(format!(
            "Contact {position} has a non-finite point or normal"
        )));
    }
    if !(contact.mu.is_finite() && contact.mu >= 0.0) {
        return Err(StanceError::InvalidParameter(format!(
            "Contact {position} has invalid friction coefficient {}",
            contact.mu
        )));
    }
    Ok(())
}

fn write_block(matrix: &mut Mat<f64>, block: usize, column: usize, wrench: Wrench) {
    let r = ROWS_PER_BODY * block;
    for (offset, value) in wrench.to_array().into_iter().enumerate() {
        matrix[(r + offset, column)] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_follow_list_position() {
        let bodies = [Body::new(7, 0.0, 0.0, 1.0), Body::new(2, 0.0, 0.0, 1.0)];
        let index = BodyIndex::new(&bodies).unwrap();
        assert_eq!(index.block(BodyId(7)), Some(0));
        assert_eq!(index.block(BodyId(2)), Some(1));
        assert_eq!(index.block(BodyId::GROUND), None);
    }

    #[test]
    fn placement_table() {
        let two = ContactTopology::BetweenBodies { first: 1, second: 0 };
        assert_eq!(two.placements().collect::<Vec<_>>(), vec![(1, 1.0), (0, -1.0)]);

        let grounded = ContactTopology::SecondOnGround { body: 2 };
        assert_eq!(grounded.placements().collect::<Vec<_>>(), vec![(2, 1.0)]);
    }
}

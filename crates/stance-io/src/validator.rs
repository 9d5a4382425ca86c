//! Input validation.
//!
//! Validates analysis inputs before the solver receives them, catching
//! data-level errors early with clear diagnostics. Topology checks are the
//! matrix builder's, so validating an input means building its system.

use stance_assembly::{build_equilibrium_with, EquilibriumSystem};
use stance_types::{StanceError, StanceResult};

use crate::contract::AssemblyInput;

/// Validates an input and returns its equilibrium system, ready to solve.
///
/// Checks:
/// - Configuration values are usable
/// - At least one body is present
/// - Every body and contact passes the matrix builder's topology checks
pub fn prepare_input(input: &AssemblyInput) -> StanceResult<EquilibriumSystem> {
    input.config.validate()?;

    if input.bodies.is_empty() {
        return Err(StanceError::InvalidTopology(format!(
            "Assembly '{}' has no bodies",
            input.name
        )));
    }

    build_equilibrium_with(&input.bodies, &input.contacts, &input.config)
}

/// Validates a complete analysis input without keeping the system.
pub fn validate_input(input: &AssemblyInput) -> StanceResult<()> {
    prepare_input(input).map(|_| ())
}

//! Stand/collapse verdict via a bounded linear program.
//!
//! Unknowns are the matrix columns. Friction-cone edge coefficients are
//! bounded to `[0, ∞)`, every weight coefficient is fixed to exactly `1`,
//! and `A·x = 0` demands zero net wrench on every body. The objective
//! (`minimize Σx`) only selects a witness; feasibility alone decides the
//! verdict. Infeasibility means no admissible friction distribution
//! balances gravity: the assembly collapses.

use std::fmt;

use serde::{Deserialize, Serialize};
use stance_math::{LinearProgram, LinearProgramSolver, LpStatus, SimplexSolver, VariableBounds};
use stance_types::{StanceError, StanceResult};

use crate::config::StabilityConfig;
use crate::equilibrium::{build_equilibrium_with, EquilibriumSystem};
use crate::model::{Body, Contact};

/// Outcome of the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Some non-negative friction distribution balances gravity on every body.
    Stands,
    /// No such distribution exists.
    Collapses,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Stands => write!(f, "stands"),
            Verdict::Collapses => write!(f, "collapses"),
        }
    }
}

/// Result of [`solve_stability`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityReport {
    pub verdict: Verdict,
    /// Solved column coefficients when the assembly stands.
    pub coefficients: Option<Vec<f64>>,
    /// Simplex pivots used.
    pub iterations: u32,
    /// `max |A·x|` of the returned coefficients.
    pub max_residual: Option<f64>,
    /// Objective value `Σx` of the returned coefficients.
    pub objective: Option<f64>,
}

impl StabilityReport {
    /// True iff the program had a feasible point.
    pub fn feasible(&self) -> bool {
        self.verdict == Verdict::Stands
    }

    /// Friction-edge part of the coefficients (weights excluded).
    pub fn friction_coefficients(&self, system: &EquilibriumSystem) -> Option<&[f64]> {
        self.coefficients
            .as_deref()
            .map(|x| &x[..system.friction_column_count()])
    }

    fn collapsed(iterations: u32) -> Self {
        Self {
            verdict: Verdict::Collapses,
            coefficients: None,
            iterations,
            max_residual: None,
            objective: None,
        }
    }
}

/// The feasibility program for `system`.
pub fn stability_program(system: &EquilibriumSystem) -> StanceResult<LinearProgram> {
    let columns = system.column_count();
    let bounds = (0..columns)
        .map(|j| {
            if system.is_gravity_column(j) {
                VariableBounds::fixed(1.0)
            } else {
                VariableBounds::non_negative()
            }
        })
        .collect();

    LinearProgram::new(
        vec![1.0; columns],
        system.matrix().clone(),
        vec![0.0; system.row_count()],
        bounds,
    )
}

/// Decide whether the assembly described by `system` stands, using the
/// dense simplex solver.
pub fn solve_stability(
    system: &EquilibriumSystem,
    bodies: &[Body],
    config: &StabilityConfig,
) -> StanceResult<StabilityReport> {
    let solver = SimplexSolver::with_options(config.simplex_options());
    solve_stability_with(&solver, system, bodies, config)
}

/// Like [`solve_stability`], with a caller-chosen LP backend.
pub fn solve_stability_with(
    solver: &dyn LinearProgramSolver,
    system: &EquilibriumSystem,
    bodies: &[Body],
    config: &StabilityConfig,
) -> StanceResult<StabilityReport> {
    config.validate()?;
    if bodies.len() != system.body_count() {
        return Err(StanceError::InvalidConfig(format!(
            "System was built for {} bodies, got {}",
            system.body_count(),
            bodies.len()
        )));
    }

    let lp = stability_program(system)?;
    let solution = solver.solve(&lp)?;

    match solution.status {
        LpStatus::Infeasible => {
            tracing::debug!(
                solver = solver.name(),
                infeasibility = solution.infeasibility,
                "assembly collapses"
            );
            Ok(StabilityReport::collapsed(solution.iterations))
        }
        // Σx ≥ 0 over a non-negative box cannot decrease without limit.
        LpStatus::Unbounded => Err(StanceError::SolverDivergence {
            iterations: solution.iterations,
            residual: f64::INFINITY,
        }),
        LpStatus::Optimal => {
            let residual = system.max_residual(&solution.x);
            if residual > config.tolerance {
                tracing::warn!(
                    solver = solver.name(),
                    residual,
                    tolerance = config.tolerance,
                    "solver returned a point outside equilibrium"
                );
                return Err(StanceError::SolverDivergence {
                    iterations: solution.iterations,
                    residual,
                });
            }
            tracing::debug!(
                solver = solver.name(),
                iterations = solution.iterations,
                residual,
                "assembly stands"
            );
            Ok(StabilityReport {
                verdict: Verdict::Stands,
                iterations: solution.iterations,
                max_residual: Some(residual),
                objective: Some(solution.objective),
                coefficients: Some(solution.x),
            })
        }
    }
}

/// Build the equilibrium system and solve it in one call.
pub fn analyze(
    bodies: &[Body],
    contacts: &[Contact],
    config: &StabilityConfig,
) -> StanceResult<StabilityReport> {
    let system = build_equilibrium_with(bodies, contacts, config)?;
    solve_stability(&system, bodies, config)
}

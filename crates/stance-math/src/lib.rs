//! # stance-math
//!
//! Numerical primitives for the Stance analyzer.
//!
//! Provides:
//! - Re-exports of `glam` (`DVec2`) for planar points and `faer` (`Mat`) for dense matrices
//! - [`Wrench`] — planar force plus moment about the global origin
//! - [`simplex`] — bounded linear programs and a two-phase simplex solver

pub mod simplex;
pub mod wrench;

pub use faer::Mat;
pub use glam::DVec2;

pub use simplex::{
    LinearProgram, LinearProgramSolver, LpSolution, LpStatus, SimplexOptions, SimplexSolver,
    VariableBounds,
};
pub use wrench::{round_to_decimals, wrench_from_force, wrench_from_force_rounded, Wrench};

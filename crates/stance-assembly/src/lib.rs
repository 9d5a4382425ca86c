//! # stance-assembly
//!
//! Quasi-static stability analysis of planar rigid-body assemblies
//! resting on each other and on the ground under gravity and Coulomb friction.
//!
//! ## Pipeline
//!
//! ```text
//! (bodies, contacts) ─► build_equilibrium ─► EquilibriumSystem ─► solve_stability ─► StabilityReport
//! ```
//!
//! ## Key Types
//!
//! - [`Body`], [`Contact`] — immutable scenario records
//! - [`WrenchCone`] — the two edge wrenches of a linearized friction cone
//! - [`EquilibriumSystem`] — per-body wrench balance, one column per cone edge and per body weight
//! - [`StabilityReport`] — stand/collapse [`Verdict`] plus the balancing coefficients
//! - [`StabilityConfig`] — tolerances, gravity and force rounding

pub mod cone;
pub mod config;
pub mod equilibrium;
pub mod forces;
pub mod model;
pub mod stability;

pub use cone::{wrench_cone, wrench_cone_with, WrenchCone};
pub use config::StabilityConfig;
pub use equilibrium::{
    build_equilibrium, build_equilibrium_with, BodyIndex, ContactTopology, EquilibriumSystem,
};
pub use forces::{contact_forces, ContactForce};
pub use model::{Body, Contact};
pub use stability::{
    analyze, solve_stability, solve_stability_with, stability_program, StabilityReport, Verdict,
};

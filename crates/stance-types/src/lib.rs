//! # stance-types
//!
//! Shared identifiers, error types, and physical constants
//! for the Stance assembly stability analyzer.
//!
//! This crate has zero domain logic — it defines the vocabulary
//! that all other Stance crates share.

pub mod constants;
pub mod error;
pub mod ids;

pub use error::{StanceError, StanceResult};
pub use ids::BodyId;

//! Error types for the Stance analyzer.
//!
//! All crates return `StanceResult<T>` from fallible operations.
//! A collapsing assembly is a verdict, not an error.

use thiserror::Error;

/// Unified error type for the Stance analyzer.
#[derive(Debug, Error)]
pub enum StanceError {
    /// Body/contact graph is malformed (ground-to-ground contact, unknown body id, ...).
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// A physical parameter is out of its valid range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Linear program is malformed (dimension mismatch, inverted bounds).
    #[error("Invalid linear program: {0}")]
    InvalidProgram(String),

    /// Solver hit its iteration limit or produced a point that violates the constraints.
    #[error("Solver did not converge after {iterations} iterations (residual: {residual:.2e})")]
    SolverDivergence {
        iterations: u32,
        residual: f64,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for `Result<T, StanceError>`.
pub type StanceResult<T> = Result<T, StanceError>;

//! Analysis event types.
//!
//! Structured events emitted while an assembly is analyzed. Events are
//! lightweight value types tagged with the scenario they belong to.

use serde::{Deserialize, Serialize};

/// An event emitted during an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisEvent {
    /// Scenario (or input file) name.
    pub scenario: String,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Equilibrium matrix assembled.
    MatrixAssembled {
        /// `3 × bodies`.
        rows: usize,
        /// `2 × contacts + bodies`.
        columns: usize,
    },

    /// Feasibility program solved.
    LinearProgramSolved {
        /// Simplex pivots used.
        iterations: u32,
        /// Whether a feasible point exists.
        feasible: bool,
    },

    /// Final stand/collapse verdict.
    Verdict {
        stands: bool,
        /// `max |A·x|`, when the assembly stands.
        max_residual: Option<f64>,
        /// Wall-clock time of the whole analysis (seconds).
        wall_time: f64,
    },

    /// Analysis aborted with an error.
    Failed {
        message: String,
    },

    /// Custom event for extensibility.
    Custom {
        /// Arbitrary label.
        label: String,
        /// JSON-encoded payload.
        payload: String,
    },
}

impl AnalysisEvent {
    /// Creates a new event for the given scenario.
    pub fn new(scenario: impl Into<String>, kind: EventKind) -> Self {
        Self {
            scenario: scenario.into(),
            kind,
        }
    }
}

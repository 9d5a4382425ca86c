//! # stance-bench
//!
//! Reference scenario library for the Stance analyzer.
//!
//! Provides 4 hand-built assemblies with known verdicts, a runner that
//! analyzes them while emitting telemetry, and CSV export of the results.

pub mod metrics;
pub mod runner;
pub mod scenarios;

pub use metrics::AnalysisMetrics;
pub use runner::AnalysisRunner;
pub use scenarios::{Scenario, ScenarioKind};

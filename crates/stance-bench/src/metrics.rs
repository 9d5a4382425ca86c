//! Analysis metrics — data collected while a scenario is analyzed.

use serde::{Deserialize, Serialize};
use stance_assembly::Verdict;

/// Metrics collected from one scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetrics {
    /// Scenario name.
    pub scenario: String,
    /// Movable body count.
    pub body_count: usize,
    /// Contact count.
    pub contact_count: usize,
    /// Equilibrium matrix rows (`3 × bodies`).
    pub rows: usize,
    /// Equilibrium matrix columns (`2 × contacts + bodies`).
    pub columns: usize,
    /// Verdict reached.
    pub verdict: Verdict,
    /// Verdict the scenario declares, if any.
    pub expected: Option<Verdict>,
    /// Simplex pivots used.
    pub iterations: u32,
    /// `max |A·x|` when the assembly stands.
    pub max_residual: Option<f64>,
    /// Wall-clock time for assembly plus solve (seconds).
    pub wall_time: f64,
}

impl AnalysisMetrics {
    /// True unless an expected verdict was declared and missed.
    pub fn matches_expected(&self) -> bool {
        self.expected.map_or(true, |v| v == self.verdict)
    }

    /// CSV header row.
    pub fn to_csv_header() -> String {
        "scenario,bodies,contacts,rows,columns,verdict,expected,iterations,max_residual,wall_time_ms"
            .to_string()
    }

    /// Format this metrics instance as a CSV data row.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{:.4}",
            self.scenario,
            self.body_count,
            self.contact_count,
            self.rows,
            self.columns,
            self.verdict,
            self.expected.map(|v| v.to_string()).unwrap_or_default(),
            self.iterations,
            self.max_residual
                .map(|r| format!("{r:.3e}"))
                .unwrap_or_default(),
            self.wall_time * 1000.0,
        )
    }

    /// Format multiple metrics as a complete CSV string.
    pub fn to_csv(metrics: &[AnalysisMetrics]) -> String {
        let mut csv = Self::to_csv_header();
        for m in metrics {
            csv.push('\n');
            csv.push_str(&m.to_csv_row());
        }
        csv
    }
}

//! Analysis runner — analyzes inputs and scenarios and collects metrics.

use std::time::Instant;

use stance_assembly::{solve_stability, StabilityReport, Verdict};
use stance_io::{prepare_input, AssemblyInput};
use stance_telemetry::{EventBus, EventKind};
use stance_types::StanceResult;

use crate::metrics::AnalysisMetrics;
use crate::scenarios::{Scenario, ScenarioKind};

/// Runs analyses and collects metrics.
pub struct AnalysisRunner;

impl AnalysisRunner {
    /// Analyze a single input, emitting telemetry to `bus` when given.
    ///
    /// Failures are reported on the bus as [`EventKind::Failed`] before
    /// being returned.
    pub fn analyze(
        input: &AssemblyInput,
        bus: Option<&EventBus>,
    ) -> StanceResult<(StabilityReport, AnalysisMetrics)> {
        let emit = |kind: EventKind| {
            if let Some(bus) = bus {
                bus.record(&input.name, kind);
            }
        };

        let result = Self::analyze_inner(input, &emit);
        if let Err(e) = &result {
            tracing::warn!(scenario = %input.name, error = %e, "analysis failed");
            emit(EventKind::Failed {
                message: e.to_string(),
            });
        }
        result
    }

    fn analyze_inner(
        input: &AssemblyInput,
        emit: &dyn Fn(EventKind),
    ) -> StanceResult<(StabilityReport, AnalysisMetrics)> {
        let start = Instant::now();
        let system = prepare_input(input)?;
        emit(EventKind::MatrixAssembled {
            rows: system.row_count(),
            columns: system.column_count(),
        });

        let report = solve_stability(&system, &input.bodies, &input.config)?;
        let wall_time = start.elapsed().as_secs_f64();
        emit(EventKind::LinearProgramSolved {
            iterations: report.iterations,
            feasible: report.feasible(),
        });
        emit(EventKind::Verdict {
            stands: report.verdict == Verdict::Stands,
            max_residual: report.max_residual,
            wall_time,
        });

        let metrics = AnalysisMetrics {
            scenario: input.name.clone(),
            body_count: system.body_count(),
            contact_count: system.contact_count(),
            rows: system.row_count(),
            columns: system.column_count(),
            verdict: report.verdict,
            expected: None,
            iterations: report.iterations,
            max_residual: report.max_residual,
            wall_time,
        };
        Ok((report, metrics))
    }

    /// Run a single reference scenario.
    pub fn run(scenario: &Scenario, bus: Option<&EventBus>) -> StanceResult<AnalysisMetrics> {
        let (_, mut metrics) = Self::analyze(&scenario.to_input(), bus)?;
        metrics.expected = Some(scenario.expected);
        if !metrics.matches_expected() {
            tracing::warn!(
                scenario = scenario.kind.name(),
                verdict = %metrics.verdict,
                expected = %scenario.expected,
                "scenario verdict differs from its declared outcome"
            );
        }
        Ok(metrics)
    }

    /// Run all scenarios and return metrics for each.
    pub fn run_all(bus: Option<&EventBus>) -> StanceResult<Vec<AnalysisMetrics>> {
        let mut results = Vec::new();
        for &kind in ScenarioKind::all() {
            let scenario = Scenario::from_kind(kind);
            let metrics = Self::run(&scenario, bus)?;
            results.push(metrics);
        }
        Ok(results)
    }
}

//! CLI command implementations.

use stance_assembly::{build_equilibrium_with, Body, Contact, StabilityReport, Verdict};
use stance_bench::metrics::AnalysisMetrics;
use stance_bench::runner::AnalysisRunner;
use stance_bench::scenarios::{Scenario, ScenarioKind};
use stance_io::contract::{load_config, AssemblyInput, AssemblyOutput, InputFile};
use stance_io::validator::validate_input;
use stance_telemetry::{EventBus, SharedVecSink, TracingSink};

/// Analyze an assembly file.
pub fn analyze(
    path: &str,
    json: bool,
    show_events: bool,
    config_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = AssemblyInput::load(path)?;
    if let Some(config_path) = config_path {
        input.config = load_config(config_path)?;
    }

    let sink = SharedVecSink::new();
    let mut bus = EventBus::new().with_sink(TracingSink::default());
    if show_events {
        bus.add_sink(Box::new(sink.clone()));
    }

    // Deliver the events, including a failure, before reporting errors.
    let result = AnalysisRunner::analyze(&input, Some(&bus));
    let delivery = bus.finish();
    let (report, _) = result?;

    if json {
        let output = AssemblyOutput::from_report(&input, report)?;
        println!("{}", output.to_json()?);
    } else {
        println!("Stance Analysis: {}", input.name);
        println!("═════════════════{}", "═".repeat(input.name.chars().count()));
        println!();
        print_report(&input.bodies, &input.contacts, &report);
    }

    if show_events {
        println!();
        println!("Events ({}):", delivery.count(&input.name));
        for event in sink.events() {
            println!("  {}", serde_json::to_string(&event)?);
        }
    }

    Ok(())
}

/// Run the reference scenarios.
pub fn scenarios(scenario_name: &str, output_path: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    println!("Stance Reference Scenarios");
    println!("══════════════════════════");
    println!();

    let kinds: Vec<ScenarioKind> = if scenario_name == "all" {
        ScenarioKind::all().to_vec()
    } else {
        match ScenarioKind::from_name(scenario_name) {
            Some(kind) => vec![kind],
            None => {
                let available: Vec<&str> = ScenarioKind::all().iter().map(|k| k.name()).collect();
                eprintln!("Unknown scenario: {scenario_name}");
                eprintln!("Available: {}, all", available.join(", "));
                return Err("Unknown scenario".into());
            }
        }
    };

    let mut bus = EventBus::new().with_sink(TracingSink::default());

    let mut all_metrics = Vec::new();
    for &kind in &kinds {
        let scenario = Scenario::from_kind(kind);
        println!("Running: {}", kind.name());
        println!();

        let result = AnalysisRunner::analyze(&scenario.to_input(), Some(&bus));
        let delivery = bus.flush();
        let (report, mut metrics) =
            result.map_err(|e| format!("Scenario {} failed: {e}", kind.name()))?;
        metrics.expected = Some(scenario.expected);

        print_report(&scenario.bodies, &scenario.contacts, &report);
        if !metrics.matches_expected() {
            println!("  ⚠ expected: {}", scenario.expected);
        }
        println!("  Events: {}", delivery.count(kind.name()));
        println!();

        all_metrics.push(metrics);
    }
    bus.finish();

    if let Some(path) = output_path {
        let csv = AnalysisMetrics::to_csv(&all_metrics);
        std::fs::write(path, &csv)?;
        println!("Results written to: {path}");
    } else {
        println!("CSV Output:");
        println!("{}", AnalysisMetrics::to_csv(&all_metrics));
    }

    Ok(())
}

/// Validate an assembly file.
pub fn validate(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("Stance Validator");
    println!("────────────────");
    println!();

    let input = match InputFile::load(path)? {
        InputFile::Config(config) => {
            println!("Validating config: {path}");
            println!("✅ Config is valid.");
            println!("  Tolerance:      {:e}", config.tolerance);
            println!("  Max iterations: {}", config.max_iterations);
            return Ok(());
        }
        InputFile::Assembly(input) => input,
    };

    println!("Validating: {path}");
    match validate_input(&input) {
        Ok(()) => {
            println!("✅ Assembly is valid.");
            println!("  Bodies:   {}", input.bodies.len());
            println!("  Contacts: {}", input.contacts.len());
            Ok(())
        }
        Err(e) => {
            println!("❌ Invalid: {e}");
            Err(e.into())
        }
    }
}

/// Print the equilibrium matrix of an assembly file.
pub fn matrix(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let input = AssemblyInput::load(path)?;
    let system = build_equilibrium_with(&input.bodies, &input.contacts, &input.config)?;

    println!("Equilibrium Matrix: {}", input.name);
    println!("────────────────────");
    println!("Rows:    {} (3 per body)", system.row_count());
    println!("Columns: {} (2 per contact + 1 per body)", system.column_count());
    println!();

    let header: Vec<String> = (0..system.column_count())
        .map(|j| {
            if system.is_gravity_column(j) {
                format!("g{}", j - system.friction_column_count())
            } else {
                format!("c{}.{}", j / 2, j % 2 + 1)
            }
        })
        .collect();
    println!("{:>10} {}", "", header.iter().map(|h| format!("{h:>10}")).collect::<String>());

    for (i, body) in input.bodies.iter().enumerate() {
        for (offset, row) in system.body_rows(i).enumerate() {
            let label = format!("{}:{}", body.id.raw(), ["m", "fx", "fy"][offset]);
            let values: String = (0..system.column_count())
                .map(|j| format!("{:>10.3}", system.matrix()[(row, j)]))
                .collect();
            println!("{label:>10} {values}");
        }
    }

    Ok(())
}

fn print_report(bodies: &[Body], contacts: &[Contact], report: &StabilityReport) {
    println!("Bodies:");
    println!("  {:>4} {:>10} {:>10} {:>8}", "id", "cm_x", "cm_y", "mass");
    for b in bodies {
        println!(
            "  {:>4} {:>10} {:>10} {:>8}",
            b.id.raw(),
            b.center_of_mass.x,
            b.center_of_mass.y,
            b.mass
        );
    }
    println!("Contacts:");
    println!(
        "  {:>4} {:>4} {:>8} {:>8} {:>8} {:>6}",
        "b1", "b2", "x", "y", "normal", "mu"
    );
    for c in contacts {
        println!(
            "  {:>4} {:>4} {:>8} {:>8} {:>8.4} {:>6}",
            c.body_1.raw(),
            c.body_2.raw(),
            c.point.x,
            c.point.y,
            c.normal_angle,
            c.mu
        );
    }

    match report.verdict {
        Verdict::Stands => {
            println!("The assembly stands");
            if let Some(x) = &report.coefficients {
                let rounded: Vec<String> = x.iter().map(|v| format!("{v:.3}")).collect();
                println!("Coefficients: [{}]", rounded.join(", "));
            }
        }
        Verdict::Collapses => println!("The assembly collapsed"),
    }
}

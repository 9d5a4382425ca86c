//! Integration tests for stance-bench.

use stance_assembly::{StabilityConfig, Verdict};
use stance_bench::metrics::AnalysisMetrics;
use stance_bench::runner::AnalysisRunner;
use stance_bench::scenarios::{Scenario, ScenarioKind};
use stance_io::AssemblyInput;
use stance_telemetry::{EventBus, EventKind, SharedVecSink};
use stance_types::BodyId;

// ─── Scenario Tests ───────────────────────────────────────────

#[test]
fn all_scenarios() {
    assert_eq!(ScenarioKind::all().len(), 4);
}

#[test]
fn names_round_trip() {
    for &kind in ScenarioKind::all() {
        assert_eq!(ScenarioKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(ScenarioKind::from_name("hanging_sheet"), None);
}

#[test]
fn two_body_setup() {
    let s = Scenario::two_body_collapse();
    assert_eq!(s.kind, ScenarioKind::TwoBodyCollapse);
    assert_eq!(s.bodies.len(), 2);
    assert_eq!(s.contacts.len(), 4);
    assert_eq!(s.contacts[0].body_2, BodyId::GROUND);
    assert_eq!(s.contacts[0].mu, 0.1);
    assert_eq!(s.expected, Verdict::Collapses);
}

#[test]
fn three_body_setup() {
    let s = Scenario::three_body_stands();
    assert_eq!(s.bodies.len(), 3);
    assert_eq!(s.contacts.len(), 6);
    // Block 3 sits on block 2 through two contacts.
    let on_top = s
        .contacts
        .iter()
        .filter(|c| c.involves(BodyId(3)))
        .count();
    assert_eq!(on_top, 2);
}

#[test]
fn scenario_files_match_library() {
    let files = [
        (ScenarioKind::TwoBodyCollapse, include_str!("../../../scenarios/two_body_collapse.json")),
        (ScenarioKind::TwoBodyStands, include_str!("../../../scenarios/two_body_stands.json")),
        (ScenarioKind::ThreeBodyCollapse, include_str!("../../../scenarios/three_body_collapse.json")),
        (ScenarioKind::ThreeBodyStands, include_str!("../../../scenarios/three_body_stands.json")),
    ];
    for (kind, text) in files {
        let from_file = AssemblyInput::from_json(text).unwrap();
        let from_library = Scenario::from_kind(kind).to_input();
        assert_eq!(from_file.name, from_library.name);
        assert_eq!(from_file.bodies, from_library.bodies, "{}", kind.name());
        assert_eq!(from_file.contacts, from_library.contacts, "{}", kind.name());
    }
}

// ─── Runner Tests ─────────────────────────────────────────────

#[test]
fn every_scenario_reaches_its_verdict() {
    let metrics = AnalysisRunner::run_all(None).unwrap();
    assert_eq!(metrics.len(), 4);
    for m in &metrics {
        assert!(m.matches_expected(), "{} gave {}", m.scenario, m.verdict);
    }
}

#[test]
fn run_two_body_stands() {
    let metrics = AnalysisRunner::run(&Scenario::two_body_stands(), None).unwrap();
    assert_eq!(metrics.scenario, "two_body_stands");
    assert_eq!(metrics.rows, 6);
    assert_eq!(metrics.columns, 10);
    assert_eq!(metrics.verdict, Verdict::Stands);
    assert!(metrics.max_residual.unwrap() < 1e-6);
    assert!(metrics.wall_time >= 0.0);
}

#[test]
fn strict_config_keeps_verdicts() {
    for &kind in ScenarioKind::all() {
        let scenario = Scenario::from_kind(kind).with_config(StabilityConfig::strict());
        let metrics = AnalysisRunner::run(&scenario, None).unwrap();
        assert!(metrics.matches_expected(), "{}", kind.name());
    }
}

#[test]
fn runner_emits_events_in_order() {
    let sink = SharedVecSink::new();
    let bus = EventBus::new().with_sink(sink.clone());

    AnalysisRunner::run(&Scenario::three_body_collapse(), Some(&bus)).unwrap();
    let delivery = bus.finish();
    assert_eq!(delivery.count("three_body_collapse"), 3);
    assert!(!delivery.failed("three_body_collapse"));

    let events = sink.events();
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e.scenario == "three_body_collapse"));
    assert_eq!(
        events[0].kind,
        EventKind::MatrixAssembled {
            rows: 9,
            columns: 15
        }
    );
    assert!(matches!(
        events[1].kind,
        EventKind::LinearProgramSolved {
            feasible: false,
            ..
        }
    ));
    assert!(matches!(
        events[2].kind,
        EventKind::Verdict {
            stands: false,
            max_residual: None,
            ..
        }
    ));
}

#[test]
fn failures_are_reported_on_the_bus() {
    let sink = SharedVecSink::new();
    let mut bus = EventBus::new().with_sink(sink.clone());

    let mut input = Scenario::two_body_stands().to_input();
    input.contacts[0].mu = -1.0;
    assert!(AnalysisRunner::analyze(&input, Some(&bus)).is_err());
    assert!(bus.flush().failed("two_body_stands"));

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0].kind, EventKind::Failed { .. }));
}

// ─── Metrics Tests ────────────────────────────────────────────

#[test]
fn csv_output() {
    let metrics = AnalysisRunner::run_all(None).unwrap();
    let csv = AnalysisMetrics::to_csv(&metrics);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("scenario,"));
    assert!(lines[1].starts_with("two_body_collapse,2,4,6,10,collapses,collapses,"));
    assert!(lines[2].contains(",stands,stands,"));
}

#[test]
fn metrics_serialize() {
    let metrics = AnalysisRunner::run(&Scenario::two_body_collapse(), None).unwrap();
    let json = serde_json::to_string(&metrics).unwrap();
    assert!(json.contains("\"verdict\":\"Collapses\""));
}

#[test]
fn run_all_reports_every_scenario_on_one_bus() {
    let mut bus = EventBus::new();
    AnalysisRunner::run_all(Some(&bus)).unwrap();
    let delivery = bus.flush();
    for &kind in ScenarioKind::all() {
        assert_eq!(delivery.count(kind.name()), 3, "{}", kind.name());
    }
    assert_eq!(delivery.total(), 12);
}

#[test]
fn invalid_input_builds_no_matrix_event() {
    let sink = SharedVecSink::new();
    let bus = EventBus::new().with_sink(sink.clone());

    let mut input = Scenario::two_body_stands().to_input();
    input.bodies.clear();
    input.contacts.clear();
    assert!(AnalysisRunner::analyze(&input, Some(&bus)).is_err());
    bus.finish();

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert!(!events
        .iter()
        .any(|e| matches!(e.kind, EventKind::MatrixAssembled { .. })));
}

//! Integration tests for stance-assembly.

use std::f64::consts::{FRAC_PI_2, PI};

use approx::assert_relative_eq;
use stance_assembly::{
    analyze, build_equilibrium, build_equilibrium_with, contact_forces, solve_stability,
    solve_stability_with, wrench_cone, Body, Contact, StabilityConfig, Verdict,
};
use stance_math::{LinearProgram, LinearProgramSolver, LpSolution, LpStatus};
use stance_types::{StanceError, StanceResult};

// ─── Fixtures ─────────────────────────────────────────────────

fn two_bodies() -> Vec<Body> {
    vec![Body::new(1, 25.0, 35.0, 2.0), Body::new(2, 66.0, 42.0, 5.0)]
}

/// Two blocks leaning on each other, `mu` at the left ground contact.
fn two_body_contacts(mu: f64) -> Vec<Contact> {
    vec![
        Contact::new(1, 0, 0.0, 0.0, FRAC_PI_2, mu),
        Contact::new(1, 2, 60.0, 60.0, PI, 0.5),
        Contact::new(2, 0, 60.0, 0.0, FRAC_PI_2, 0.5),
        Contact::new(2, 0, 72.0, 0.0, FRAC_PI_2, 0.5),
    ]
}

/// A block resting on two frictionless supports at x = ±1.
fn block_on_supports(cm_x: f64) -> (Vec<Body>, Vec<Contact>) {
    (
        vec![Body::new(1, cm_x, 5.0, 1.0)],
        vec![
            Contact::new(1, 0, -1.0, 0.0, FRAC_PI_2, 0.0),
            Contact::new(1, 0, 1.0, 0.0, FRAC_PI_2, 0.0),
        ],
    )
}

// ─── Matrix Shape Tests ───────────────────────────────────────

#[test]
fn matrix_dimensions() {
    let system = build_equilibrium(&two_bodies(), &two_body_contacts(0.1)).unwrap();
    assert_eq!(system.row_count(), 6);
    assert_eq!(system.column_count(), 10);
    assert_eq!(system.friction_column_count(), 8);

    let (matrix, rows, cols) = system.into_parts();
    assert_eq!((matrix.nrows(), matrix.ncols()), (rows, cols));
}

#[test]
fn two_body_contact_is_antisymmetric() {
    let system = build_equilibrium(&two_bodies(), &two_body_contacts(0.1)).unwrap();
    for column in system.contact_columns(1) {
        let on_first = system.block(0, column);
        let on_second = system.block(1, column);
        assert_ne!(on_first, stance_math::Wrench::ZERO);
        assert_eq!(on_first, -on_second);
    }
}

#[test]
fn grounded_contact_touches_one_block() {
    let system = build_equilibrium(&two_bodies(), &two_body_contacts(0.1)).unwrap();
    for column in system.contact_columns(2) {
        assert_eq!(system.block(0, column), stance_math::Wrench::ZERO);
        assert_ne!(system.block(1, column), stance_math::Wrench::ZERO);
    }
}

#[test]
fn gravity_column_is_confined_to_its_body() {
    let bodies = two_bodies();
    let system = build_equilibrium(&bodies, &two_body_contacts(0.1)).unwrap();

    let column = system.gravity_column(0);
    assert!(system.is_gravity_column(column));
    let w = system.block(0, column);
    let weight = -2.0 * 9.81;
    assert_relative_eq!(w.moment, 25.0 * weight, epsilon = 1e-9);
    assert_eq!(w.fx, 0.0);
    assert_relative_eq!(w.fy, weight, epsilon = 1e-12);
    assert_eq!(system.block(1, column), stance_math::Wrench::ZERO);
}

#[test]
fn ground_side_does_not_matter_for_placement() {
    let bodies = vec![Body::new(1, 0.0, 1.0, 1.0)];
    let a = build_equilibrium(&bodies, &[Contact::new(1, 0, 0.5, 0.0, FRAC_PI_2, 0.3)]).unwrap();
    let b = build_equilibrium(&bodies, &[Contact::new(0, 1, 0.5, 0.0, FRAC_PI_2, 0.3)]).unwrap();
    for column in 0..a.column_count() {
        assert_eq!(a.block(0, column), b.block(0, column));
    }
}

#[test]
fn blocks_follow_list_order_not_id() {
    let bodies = vec![Body::new(9, 1.0, 1.0, 1.0), Body::new(4, 2.0, 1.0, 1.0)];
    let contacts = vec![Contact::new(4, 0, 2.0, 0.0, FRAC_PI_2, 0.5)];
    let system = build_equilibrium(&bodies, &contacts).unwrap();
    // Body 4 is listed second → block 1
    assert_eq!(system.block(0, 0), stance_math::Wrench::ZERO);
    assert_ne!(system.block(1, 0), stance_math::Wrench::ZERO);
}

#[test]
fn more_than_five_bodies_supported() {
    let bodies: Vec<Body> = (1..=8).map(|i| Body::new(i, i as f64, 1.0, 1.0)).collect();
    let contacts: Vec<Contact> = (1..=8)
        .map(|i| Contact::new(i, 0, i as f64, 0.0, FRAC_PI_2, 0.5))
        .collect();
    let system = build_equilibrium(&bodies, &contacts).unwrap();
    assert_eq!(system.row_count(), 24);
    assert_eq!(system.column_count(), 24);
}

// ─── Cone Tests ───────────────────────────────────────────────

#[test]
fn frictionless_cone_collapses_to_a_line() {
    let cone = wrench_cone(&Contact::new(1, 0, 3.0, 4.0, 1.1, 0.0));
    assert_eq!(cone.first, cone.second);
    assert_eq!(cone.opening(), 0.0);
}

#[test]
fn cone_opens_with_friction() {
    let mut previous = -1.0;
    for mu in [0.0, 0.1, 0.5, 1.0, 2.0] {
        let cone = wrench_cone(&Contact::new(1, 0, 0.0, 0.0, FRAC_PI_2, mu));
        assert_relative_eq!(cone.opening(), 2.0 * mu.atan(), epsilon = 1e-15);
        let (lo, hi) = (cone.first.force(), cone.second.force());
        let separation = lo.perp_dot(hi).atan2(lo.dot(hi));
        assert_relative_eq!(separation, cone.opening(), epsilon = 1e-12);
        assert!(separation > previous);
        previous = separation;
    }
}

// ─── Verdict Tests ────────────────────────────────────────────

#[test]
fn low_friction_assembly_collapses() {
    let bodies = two_bodies();
    let system = build_equilibrium(&bodies, &two_body_contacts(0.1)).unwrap();
    let report = solve_stability(&system, &bodies, &StabilityConfig::default()).unwrap();
    assert_eq!(report.verdict, Verdict::Collapses);
    assert!(!report.feasible());
    assert!(report.coefficients.is_none());
}

#[test]
fn higher_friction_assembly_stands() {
    let bodies = two_bodies();
    let system = build_equilibrium(&bodies, &two_body_contacts(0.5)).unwrap();
    let report = solve_stability(&system, &bodies, &StabilityConfig::default()).unwrap();
    assert!(report.feasible());

    let x = report.coefficients.as_ref().unwrap();
    assert_eq!(x.len(), system.column_count());
    assert!(system.max_residual(x) < 1e-6);
    assert!(x[..8].iter().all(|&c| c >= 0.0));
    assert_eq!(&x[8..], &[1.0, 1.0]);
    assert_eq!(report.friction_coefficients(&system).unwrap().len(), 8);
}

#[test]
fn verdict_is_idempotent() {
    let bodies = two_bodies();
    let config = StabilityConfig::default();
    for mu in [0.1, 0.5] {
        let system = build_equilibrium(&bodies, &two_body_contacts(mu)).unwrap();
        let first = solve_stability(&system, &bodies, &config).unwrap();
        let second = solve_stability(&system, &bodies, &config).unwrap();
        assert_eq!(first.verdict, second.verdict);
        assert_eq!(first.coefficients, second.coefficients);
    }
}

#[test]
fn more_friction_never_breaks_a_standing_assembly() {
    let bodies = two_bodies();
    let config = StabilityConfig::default();
    let base = two_body_contacts(0.0);
    let verdicts: Vec<Verdict> = (0..=20)
        .map(|k| {
            let mut contacts = base.clone();
            contacts[0] = base[0].with_mu(k as f64 * 0.05);
            analyze(&bodies, &contacts, &config).unwrap().verdict
        })
        .collect();

    let first_standing = verdicts
        .iter()
        .position(|v| *v == Verdict::Stands)
        .expect("high friction should stand");
    assert!(first_standing > 0, "mu = 0 must collapse");
    assert!(verdicts[first_standing..].iter().all(|v| *v == Verdict::Stands));
}

/// The corner contact of the two-body layout holds iff `mu ≥ 10/31`.
const CORNER_THRESHOLD: f64 = 10.0 / 31.0;

#[test]
fn just_below_friction_threshold_collapses() {
    let bodies = two_bodies();
    for config in [StabilityConfig::default(), StabilityConfig::strict()] {
        for gap in [1e-5, 6.4e-7] {
            let report =
                analyze(&bodies, &two_body_contacts(CORNER_THRESHOLD - gap), &config).unwrap();
            assert_eq!(report.verdict, Verdict::Collapses, "gap {gap}");
        }
    }
}

#[test]
fn just_above_friction_threshold_stands_within_tolerance() {
    let bodies = two_bodies();
    for config in [StabilityConfig::default(), StabilityConfig::strict()] {
        let report =
            analyze(&bodies, &two_body_contacts(CORNER_THRESHOLD + 1e-5), &config).unwrap();
        assert_eq!(report.verdict, Verdict::Stands);
        assert!(report.max_residual.unwrap() <= config.tolerance);
    }
}

#[test]
fn reference_rounding_keeps_verdicts() {
    let bodies = two_bodies();
    let config = StabilityConfig::reference();
    assert_eq!(
        analyze(&bodies, &two_body_contacts(0.1), &config).unwrap().verdict,
        Verdict::Collapses
    );
    assert_eq!(
        analyze(&bodies, &two_body_contacts(0.5), &config).unwrap().verdict,
        Verdict::Stands
    );
}

#[test]
fn frictionless_supports_share_the_load() {
    let (bodies, contacts) = block_on_supports(0.0);
    let report = analyze(&bodies, &contacts, &StabilityConfig::default()).unwrap();
    let x = report.coefficients.unwrap();
    assert_relative_eq!(x[0] + x[1], 4.905, epsilon = 1e-9);
    assert_relative_eq!(x[2] + x[3], 4.905, epsilon = 1e-9);
}

#[test]
fn center_of_mass_outside_supports_collapses() {
    let (bodies, contacts) = block_on_supports(3.0);
    let report = analyze(&bodies, &contacts, &StabilityConfig::default()).unwrap();
    assert_eq!(report.verdict, Verdict::Collapses);
}

#[test]
fn unsupported_body_collapses() {
    let bodies = vec![Body::new(1, 0.0, 1.0, 1.0)];
    let report = analyze(&bodies, &[], &StabilityConfig::default()).unwrap();
    assert_eq!(report.verdict, Verdict::Collapses);
}

#[test]
fn massless_body_is_a_valid_case() {
    let bodies = vec![Body::new(1, 0.0, 1.0, 0.0)];
    let contacts = vec![Contact::new(1, 0, 0.0, 0.0, FRAC_PI_2, 0.0)];
    let report = analyze(&bodies, &contacts, &StabilityConfig::default()).unwrap();
    assert_eq!(report.verdict, Verdict::Stands);
}

#[test]
fn empty_assembly_stands() {
    let report = analyze(&[], &[], &StabilityConfig::default()).unwrap();
    assert!(report.feasible());
    assert_eq!(report.coefficients, Some(Vec::new()));
}

// ─── Contact Force Tests ──────────────────────────────────────

#[test]
fn recovered_forces_respect_friction() {
    let bodies = two_bodies();
    let contacts = two_body_contacts(0.5);
    let config = StabilityConfig::default();
    let report = analyze(&bodies, &contacts, &config).unwrap();
    let forces = contact_forces(&contacts, report.coefficients.as_ref().unwrap(), &config).unwrap();

    assert_eq!(forces.len(), contacts.len());
    for (force, contact) in forces.iter().zip(&contacts) {
        assert!(force.within_friction_cone(contact.mu, 1e-9));
    }

    // Ground reactions carry the total weight
    let total_weight = (2.0 + 5.0) * 9.81;
    let vertical: f64 = [0, 2, 3].iter().map(|&k| forces[k].force.y).sum();
    assert_relative_eq!(vertical, total_weight, epsilon = 1e-6);
}

#[test]
fn too_few_coefficients_rejected() {
    let contacts = two_body_contacts(0.5);
    let err = contact_forces(&contacts, &[1.0; 3], &StabilityConfig::default()).unwrap_err();
    assert!(matches!(err, StanceError::InvalidConfig(_)));
}

// ─── Validation Tests ─────────────────────────────────────────

#[test]
fn ground_to_ground_contact_rejected() {
    let contacts = vec![Contact::new(0, 0, 0.0, 0.0, FRAC_PI_2, 0.5)];
    let err = build_equilibrium(&two_bodies(), &contacts).unwrap_err();
    assert!(matches!(err, StanceError::InvalidTopology(_)));
}

#[test]
fn unknown_body_rejected() {
    let contacts = vec![Contact::new(3, 0, 0.0, 0.0, FRAC_PI_2, 0.5)];
    let err = build_equilibrium(&two_bodies(), &contacts).unwrap_err();
    assert!(matches!(err, StanceError::InvalidTopology(_)));
    assert!(err.to_string().contains("body 3"));
}

#[test]
fn self_contact_rejected() {
    let contacts = vec![Contact::new(2, 2, 0.0, 0.0, FRAC_PI_2, 0.5)];
    let err = build_equilibrium(&two_bodies(), &contacts).unwrap_err();
    assert!(matches!(err, StanceError::InvalidTopology(_)));
}

#[test]
fn ground_id_in_body_list_rejected() {
    let bodies = vec![Body::new(0, 0.0, 0.0, 1.0)];
    let err = build_equilibrium(&bodies, &[]).unwrap_err();
    assert!(matches!(err, StanceError::InvalidTopology(_)));
}

#[test]
fn duplicate_body_ids_rejected() {
    let bodies = vec![Body::new(1, 0.0, 0.0, 1.0), Body::new(1, 2.0, 0.0, 1.0)];
    let err = build_equilibrium(&bodies, &[]).unwrap_err();
    assert!(matches!(err, StanceError::InvalidTopology(_)));
}

#[test]
fn negative_friction_rejected() {
    let contacts = vec![Contact::new(1, 0, 0.0, 0.0, FRAC_PI_2, -0.1)];
    let err = build_equilibrium(&two_bodies(), &contacts).unwrap_err();
    assert!(matches!(err, StanceError::InvalidParameter(_)));
}

#[test]
fn negative_mass_rejected() {
    let bodies = vec![Body::new(1, 0.0, 0.0, -1.0)];
    let err = build_equilibrium(&bodies, &[]).unwrap_err();
    assert!(matches!(err, StanceError::InvalidParameter(_)));
}

#[test]
fn invalid_config_rejected() {
    let config = StabilityConfig {
        tolerance: 0.0,
        ..StabilityConfig::default()
    };
    let err = build_equilibrium_with(&two_bodies(), &two_body_contacts(0.5), &config).unwrap_err();
    assert!(matches!(err, StanceError::InvalidConfig(_)));
}

#[test]
fn body_list_must_match_system() {
    let bodies = two_bodies();
    let system = build_equilibrium(&bodies, &two_body_contacts(0.5)).unwrap();
    let err = solve_stability(&system, &bodies[..1], &StabilityConfig::default()).unwrap_err();
    assert!(matches!(err, StanceError::InvalidConfig(_)));
}

#[test]
fn config_round_trip() {
    let config = StabilityConfig::reference();
    let json = serde_json::to_string(&config).unwrap();
    let recovered: StabilityConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered, config);

    // Missing fields fall back to defaults
    let partial: StabilityConfig = serde_json::from_str(r#"{"tolerance": 1e-8}"#).unwrap();
    assert_eq!(partial.gravity, 9.81);
    assert_eq!(partial.tolerance, 1e-8);
}

#[test]
fn config_toml_round_trip() {
    let config = StabilityConfig::strict();
    let toml_str = toml::to_string(&config).unwrap();
    let recovered: StabilityConfig = toml::from_str(&toml_str).unwrap();
    assert_eq!(recovered, config);

    let reference = StabilityConfig::reference();
    let toml_str = toml::to_string(&reference).unwrap();
    assert!(toml_str.contains("force_decimals = 4"));
}

// ─── Solver Failure Tests ─────────────────────────────────────

/// Backend that claims optimality for a point that balances nothing.
struct ZeroFrictionSolver;

impl LinearProgramSolver for ZeroFrictionSolver {
    fn solve(&self, lp: &LinearProgram) -> StanceResult<LpSolution> {
        let x = lp
            .bounds
            .iter()
            .map(|b| if b.is_fixed() { b.lower } else { 0.0 })
            .collect::<Vec<_>>();
        Ok(LpSolution {
            status: LpStatus::Optimal,
            objective: lp.objective_value(&x),
            x,
            iterations: 1,
            infeasibility: 0.0,
        })
    }

    fn name(&self) -> &str {
        "zero_friction"
    }
}

#[test]
fn iteration_cap_is_divergence_not_collapse() {
    let config = StabilityConfig {
        max_iterations: 1,
        ..StabilityConfig::default()
    };
    let err = analyze(&two_bodies(), &two_body_contacts(0.5), &config).unwrap_err();
    assert!(matches!(err, StanceError::SolverDivergence { .. }));
}

#[test]
fn off_equilibrium_optimum_is_divergence_not_collapse() {
    let bodies = two_bodies();
    let config = StabilityConfig::default();
    let system = build_equilibrium(&bodies, &two_body_contacts(0.5)).unwrap();

    let err = solve_stability_with(&ZeroFrictionSolver, &system, &bodies, &config).unwrap_err();
    match err {
        StanceError::SolverDivergence { iterations, residual } => {
            assert_eq!(iterations, 1);
            assert!(residual > config.tolerance);
        }
        other => panic!("expected divergence, got {other:?}"),
    }
}

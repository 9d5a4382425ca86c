//! Reference scenarios: small block assemblies with known verdicts.
//!
//! All scenarios share the same layout. Block 1 leans against the ground
//! at the origin and against block 2 along the vertical line `x = 60`;
//! block 2 rests on two ground contacts at `x = 60` and `x = 72`. The
//! three-body variants add block 3 on top of block 2. Only the friction
//! at the ground/block 1 corner and the masses change between variants.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};
use stance_assembly::{Body, Contact, StabilityConfig, Verdict};
use stance_io::AssemblyInput;

/// Reference scenario to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// Two blocks, slippery ground corner.
    TwoBodyCollapse,
    /// Two blocks, heavy right block, enough friction everywhere.
    TwoBodyStands,
    /// Three blocks, slippery ground corner.
    ThreeBodyCollapse,
    /// Three blocks, enough friction everywhere.
    ThreeBodyStands,
}

impl ScenarioKind {
    /// Returns all scenario kinds.
    pub fn all() -> &'static [ScenarioKind] {
        &[
            ScenarioKind::TwoBodyCollapse,
            ScenarioKind::TwoBodyStands,
            ScenarioKind::ThreeBodyCollapse,
            ScenarioKind::ThreeBodyStands,
        ]
    }

    /// Returns a human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::TwoBodyCollapse => "two_body_collapse",
            ScenarioKind::TwoBodyStands => "two_body_stands",
            ScenarioKind::ThreeBodyCollapse => "three_body_collapse",
            ScenarioKind::ThreeBodyStands => "three_body_stands",
        }
    }

    /// Look up a kind by its [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.name() == name)
    }
}

/// A fully specified reference scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Scenario type.
    pub kind: ScenarioKind,
    pub bodies: Vec<Body>,
    pub contacts: Vec<Contact>,
    /// Analysis configuration.
    pub config: StabilityConfig,
    /// Verdict the analysis must reach.
    pub expected: Verdict,
}

impl Scenario {
    /// Two blocks with `mu = 0.1` at the ground corner of block 1.
    ///
    /// Block 1 needs roughly `mu ≥ 0.32` there to stay put.
    pub fn two_body_collapse() -> Self {
        Self {
            kind: ScenarioKind::TwoBodyCollapse,
            bodies: two_bodies(5.0),
            contacts: two_body_contacts(0.1),
            config: StabilityConfig::default(),
            expected: Verdict::Collapses,
        }
    }

    /// Two blocks with `mu = 0.5` everywhere and a 10 kg right block.
    pub fn two_body_stands() -> Self {
        Self {
            kind: ScenarioKind::TwoBodyStands,
            bodies: two_bodies(10.0),
            contacts: two_body_contacts(0.5),
            config: StabilityConfig::default(),
            expected: Verdict::Stands,
        }
    }

    /// Block 3 on top of block 2; `mu = 0.2` at the ground corner.
    pub fn three_body_collapse() -> Self {
        Self {
            kind: ScenarioKind::ThreeBodyCollapse,
            bodies: three_bodies(),
            contacts: three_body_contacts(0.2),
            config: StabilityConfig::default(),
            expected: Verdict::Collapses,
        }
    }

    /// Block 3 on top of block 2; `mu = 0.5` everywhere.
    pub fn three_body_stands() -> Self {
        Self {
            kind: ScenarioKind::ThreeBodyStands,
            bodies: three_bodies(),
            contacts: three_body_contacts(0.5),
            config: StabilityConfig::default(),
            expected: Verdict::Stands,
        }
    }

    /// Create a scenario by kind.
    pub fn from_kind(kind: ScenarioKind) -> Self {
        match kind {
            ScenarioKind::TwoBodyCollapse => Self::two_body_collapse(),
            ScenarioKind::TwoBodyStands => Self::two_body_stands(),
            ScenarioKind::ThreeBodyCollapse => Self::three_body_collapse(),
            ScenarioKind::ThreeBodyStands => Self::three_body_stands(),
        }
    }

    /// Replace the analysis configuration.
    pub fn with_config(mut self, config: StabilityConfig) -> Self {
        self.config = config;
        self
    }

    /// The scenario as an analyzer input.
    pub fn to_input(&self) -> AssemblyInput {
        AssemblyInput {
            name: self.kind.name().to_string(),
            bodies: self.bodies.clone(),
            contacts: self.contacts.clone(),
            config: self.config.clone(),
        }
    }
}

fn two_bodies(right_mass: f64) -> Vec<Body> {
    vec![
        Body::new(1, 25.0, 35.0, 2.0),
        Body::new(2, 66.0, 42.0, right_mass),
    ]
}

fn two_body_contacts(corner_mu: f64) -> Vec<Contact> {
    vec![
        Contact::new(1, 0, 0.0, 0.0, FRAC_PI_2, corner_mu),
        Contact::new(1, 2, 60.0, 60.0, PI, 0.5),
        Contact::new(2, 0, 60.0, 0.0, FRAC_PI_2, 0.5),
        Contact::new(2, 0, 72.0, 0.0, FRAC_PI_2, 0.5),
    ]
}

fn three_bodies() -> Vec<Body> {
    let mut bodies = two_bodies(5.0);
    bodies.push(Body::new(3, 66.0, 90.0, 5.0));
    bodies
}

fn three_body_contacts(corner_mu: f64) -> Vec<Contact> {
    let mut contacts = two_body_contacts(corner_mu);
    contacts.push(Contact::new(2, 3, 60.0, 84.0, -FRAC_PI_2, 0.5));
    contacts.push(Contact::new(2, 3, 72.0, 84.0, -FRAC_PI_2, 0.5));
    contacts
}

//! Analysis input/output contract types.
//!
//! These types define the I/O boundary of the analyzer. They are
//! serializable as JSON for scenario files and machine-readable reports;
//! assembly files and standalone configurations may also be written in TOML.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stance_assembly::{
    contact_forces, Body, Contact, ContactForce, StabilityConfig, StabilityReport, Verdict,
};
use stance_types::{StanceError, StanceResult};

/// Complete input specification for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyInput {
    /// Human-readable scenario name.
    #[serde(default)]
    pub name: String,

    /// Movable bodies. Ids must be non-zero and unique.
    pub bodies: Vec<Body>,

    /// Contacts, in column order.
    pub contacts: Vec<Contact>,

    /// Analysis parameters. Omitted fields take their defaults.
    #[serde(default)]
    pub config: StabilityConfig,
}

impl AssemblyInput {
    pub fn new(name: impl Into<String>, bodies: Vec<Body>, contacts: Vec<Contact>) -> Self {
        Self {
            name: name.into(),
            bodies,
            contacts,
            config: StabilityConfig::default(),
        }
    }

    /// Parse an input from JSON text.
    pub fn from_json(text: &str) -> StanceResult<Self> {
        serde_json::from_str(text).map_err(|e| StanceError::Serialization(e.to_string()))
    }

    /// Parse an input from TOML text.
    pub fn from_toml(text: &str) -> StanceResult<Self> {
        toml::from_str(text).map_err(|e| StanceError::Serialization(e.to_string()))
    }

    /// Read an input file, TOML if the extension is `.toml` and JSON
    /// otherwise. An empty `name` is replaced by the file stem.
    pub fn load(path: impl AsRef<Path>) -> StanceResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut input = if is_toml(path) {
            Self::from_toml(&text)?
        } else {
            Self::from_json(&text)?
        };
        if input.name.is_empty() {
            input.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(input)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> StanceResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| StanceError::Serialization(e.to_string()))
    }
}

/// Read a standalone [`StabilityConfig`] from a TOML file.
pub fn load_config(path: impl AsRef<Path>) -> StanceResult<StabilityConfig> {
    let text = fs::read_to_string(path)?;
    let config: StabilityConfig =
        toml::from_str(&text).map_err(|e| StanceError::Serialization(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// A file holding either a full assembly or a bare configuration.
#[derive(Debug, Clone)]
pub enum InputFile {
    Assembly(AssemblyInput),
    Config(StabilityConfig),
}

impl InputFile {
    /// Read `path` as an assembly, falling back to a standalone TOML
    /// configuration. When neither parses, the assembly error is returned.
    pub fn load(path: impl AsRef<Path>) -> StanceResult<Self> {
        let path = path.as_ref();
        let assembly_err = match AssemblyInput::load(path) {
            Ok(input) => return Ok(Self::Assembly(input)),
            Err(e) => e,
        };
        if !is_toml(path) {
            return Err(assembly_err);
        }

        let text = fs::read_to_string(path)?;
        match toml::from_str::<StabilityConfig>(&text) {
            Ok(config) => {
                config.validate()?;
                Ok(Self::Config(config))
            }
            Err(_) => Err(assembly_err),
        }
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

/// Output from a completed analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyOutput {
    pub name: String,
    pub verdict: Verdict,
    /// Column coefficients (friction edges, then weights) when standing.
    pub coefficients: Option<Vec<f64>>,
    /// Per-contact resultant forces when standing.
    pub contact_forces: Vec<ContactForce>,
    /// Simplex pivots used.
    pub iterations: u32,
    /// `max |A·x|` when standing.
    pub max_residual: Option<f64>,
}

impl AssemblyOutput {
    /// Package a report for `input`.
    pub fn from_report(input: &AssemblyInput, report: StabilityReport) -> StanceResult<Self> {
        let forces = match &report.coefficients {
            Some(x) => contact_forces(&input.contacts, x, &input.config)?,
            None => Vec::new(),
        };
        Ok(Self {
            name: input.name.clone(),
            verdict: report.verdict,
            contact_forces: forces,
            iterations: report.iterations,
            max_residual: report.max_residual,
            coefficients: report.coefficients,
        })
    }

    pub fn stands(&self) -> bool {
        self.verdict == Verdict::Stands
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> StanceResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| StanceError::Serialization(e.to_string()))
    }
}

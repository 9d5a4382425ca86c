//! # stance-io
//!
//! Analysis input/output contract and input validation.
//!
//! Defines the boundary types that external systems (CLI, scripts, scenario
//! files) use to communicate with the Stance analysis core.

pub mod contract;
pub mod validator;

pub use contract::{load_config, AssemblyInput, AssemblyOutput, InputFile};
pub use validator::{prepare_input, validate_input};

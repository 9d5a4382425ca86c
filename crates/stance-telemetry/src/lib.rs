//! # stance-telemetry
//!
//! Event bus for analysis telemetry. Emits structured events
//! (matrix assembly, solver outcome, verdict) that can be consumed
//! by pluggable sinks (in-memory buffers, `tracing`, ...).

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::{Delivery, EventBus};
pub use events::{AnalysisEvent, EventKind};
pub use sinks::{EventSink, SharedVecSink, TracingSink, VecSink};

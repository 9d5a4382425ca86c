//! Pluggable event sinks.
//!
//! Sinks consume events from the bus and process them
//! (buffer in memory, forward to `tracing`, ...).

use std::sync::{Arc, Mutex};

use crate::events::{AnalysisEvent, EventKind};

/// Trait for event consumers.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &AnalysisEvent);

    /// Called when the run ends.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Collects events into a `Vec`.
#[derive(Default)]
pub struct VecSink {
    pub events: Vec<AnalysisEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &AnalysisEvent) {
        self.events.push(event.clone());
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// Like [`VecSink`], but the buffer stays readable after the sink is boxed
/// into a bus.
#[derive(Clone, Default)]
pub struct SharedVecSink {
    events: Arc<Mutex<Vec<AnalysisEvent>>>,
}

impl SharedVecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything received so far.
    pub fn events(&self) -> Vec<AnalysisEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl EventSink for SharedVecSink {
    fn handle(&mut self, event: &AnalysisEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }

    fn name(&self) -> &str {
        "shared_vec_sink"
    }
}

/// Forwards events to the `tracing` crate.
pub struct TracingSink {
    level: tracing::Level,
}

impl TracingSink {
    pub fn new(level: tracing::Level) -> Self {
        Self { level }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(tracing::Level::INFO)
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &AnalysisEvent) {
        if let EventKind::Failed { message } = &event.kind {
            tracing::warn!(scenario = %event.scenario, %message, "analysis_failed");
            return;
        }
        if self.level >= tracing::Level::DEBUG {
            tracing::debug!(scenario = %event.scenario, event = ?event.kind, "analysis_event");
        } else {
            tracing::info!(scenario = %event.scenario, event = ?event.kind, "analysis_event");
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}

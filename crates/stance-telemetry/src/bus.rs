//! Event bus: queue analysis events, hand them to sinks in batches.
//!
//! Producers only need `&EventBus`, so a runner can report while the
//! caller keeps ownership. Events wait in an mpsc queue until
//! [`EventBus::flush`], which delivers them in emission order and returns
//! a per-scenario [`Delivery`] tally.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::mpsc::{self, Receiver, Sender};

use crate::events::{AnalysisEvent, EventKind};
use crate::sinks::EventSink;

/// What one flush delivered, grouped by scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    counts: BTreeMap<String, usize>,
    failed: BTreeSet<String>,
}

impl Delivery {
    fn record(&mut self, event: &AnalysisEvent) {
        *self.counts.entry(event.scenario.clone()).or_default() += 1;
        if matches!(event.kind, EventKind::Failed { .. }) {
            self.failed.insert(event.scenario.clone());
        }
    }

    /// Events delivered across all scenarios.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Events delivered for `scenario`.
    pub fn count(&self, scenario: &str) -> usize {
        self.counts.get(scenario).copied().unwrap_or(0)
    }

    /// Scenarios in name order with their event counts.
    pub fn scenarios(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(name, &n)| (name.as_str(), n))
    }

    /// Returns true if `scenario` reported a failure in this batch.
    pub fn failed(&self, scenario: &str) -> bool {
        self.failed.contains(scenario)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Queue of analysis events feeding a set of sinks.
pub struct EventBus {
    queue: Sender<AnalysisEvent>,
    inbox: Receiver<AnalysisEvent>,
    sinks: Vec<Box<dyn EventSink>>,
}

impl EventBus {
    pub fn new() -> Self {
        let (queue, inbox) = mpsc::channel();
        Self {
            queue,
            inbox,
            sinks: Vec::new(),
        }
    }

    /// Builder form of [`add_sink`](Self::add_sink).
    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Queue an event.
    pub fn emit(&self, event: AnalysisEvent) {
        // Both ends live in `self`, so the send cannot fail.
        let _ = self.queue.send(event);
    }

    /// Queue `kind` for `scenario`.
    pub fn record(&self, scenario: &str, kind: EventKind) {
        self.emit(AnalysisEvent::new(scenario, kind));
    }

    /// Deliver every queued event to every sink.
    pub fn flush(&mut self) -> Delivery {
        let mut delivery = Delivery::default();
        for event in self.inbox.try_iter() {
            for sink in &mut self.sinks {
                sink.handle(&event);
            }
            delivery.record(&event);
        }
        delivery
    }

    /// Flush the remaining events and finalize every sink.
    pub fn finish(mut self) -> Delivery {
        let delivery = self.flush();
        for sink in &mut self.sinks {
            sink.finalize();
        }
        delivery
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

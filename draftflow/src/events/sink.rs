//! Event sink trait and implementations.

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info, Level};

use super::DraftEvent;

/// Receives run events.
///
/// `emit` is called inline by the pipeline, so implementations must be cheap
/// and must never fail; anything that can go wrong is logged and dropped.
pub trait EventSink: Send + Sync {
    /// Records one event.
    fn emit(&self, event: DraftEvent, data: Value);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

impl EventSink for NoOpEventSink {
    fn emit(&self, _event: DraftEvent, _data: Value) {}
}

/// Writes events to `tracing`.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a sink logging at `level` (DEBUG or INFO; anything else logs
    /// at INFO).
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Debug-level sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }
}

impl EventSink for LoggingEventSink {
    fn emit(&self, event: DraftEvent, data: Value) {
        if self.level == Level::DEBUG {
            debug!(event = %event, data = %data, "Event: {event}");
        } else {
            info!(event = %event, data = %data, "Event: {event}");
        }
    }
}

/// Keeps every event in memory, for tests and inspection.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: RwLock<Vec<(DraftEvent, Value)>>,
}

impl CollectingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far.
    #[must_use]
    pub fn events(&self) -> Vec<(DraftEvent, Value)> {
        self.events.read().clone()
    }

    /// Payloads of events of one kind.
    #[must_use]
    pub fn payloads(&self, event: DraftEvent) -> Vec<Value> {
        self.events
            .read()
            .iter()
            .filter(|(e, _)| *e == event)
            .map(|(_, data)| data.clone())
            .collect()
    }

    /// Number of events so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if nothing was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Forgets every event.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl EventSink for CollectingEventSink {
    fn emit(&self, event: DraftEvent, data: Value) {
        self.events.write().push((event, data));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_noop_and_logging_sinks_accept_events() {
        NoOpEventSink.emit(DraftEvent::RunCompleted, json!({}));
        LoggingEventSink::default().emit(DraftEvent::StepCompleted, json!({"step": "text"}));
        LoggingEventSink::debug().emit(DraftEvent::StateChanged, Value::Null);
    }

    #[test]
    fn test_collecting_sink() {
        let sink = CollectingEventSink::new();
        assert!(sink.is_empty());

        sink.emit(DraftEvent::StepCompleted, json!({"step": "text"}));
        sink.emit(DraftEvent::StateChanged, json!({"to": "generating"}));
        sink.emit(DraftEvent::StepCompleted, json!({"step": "seo"}));

        assert_eq!(sink.len(), 3);
        let steps = sink.payloads(DraftEvent::StepCompleted);
        assert_eq!(steps, vec![json!({"step": "text"}), json!({"step": "seo"})]);

        sink.clear();
        assert!(sink.is_empty());
    }
}

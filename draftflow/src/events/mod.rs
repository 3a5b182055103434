//! Run events for observability.
//!
//! A pipeline reports what it does through an injected [`EventSink`]. There
//! is no process-wide sink: every pipeline owns the sink it was built with,
//! and the default discards everything.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Events a pipeline run emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DraftEvent {
    /// A step finished (successfully or not).
    #[serde(rename = "draft.step.completed")]
    StepCompleted,
    /// The state machine moved.
    #[serde(rename = "draft.state.changed")]
    StateChanged,
    /// A draft was produced.
    #[serde(rename = "draft.run.completed")]
    RunCompleted,
    /// The run ended with an error.
    #[serde(rename = "draft.run.failed")]
    RunFailed,
}

impl DraftEvent {
    /// Dotted event name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StepCompleted => "draft.step.completed",
            Self::StateChanged => "draft.state.changed",
            Self::RunCompleted => "draft.run.completed",
            Self::RunFailed => "draft.run.failed",
        }
    }
}

impl fmt::Display for DraftEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(DraftEvent::StepCompleted.to_string(), "draft.step.completed");
        assert_eq!(
            serde_json::to_string(&DraftEvent::RunFailed).unwrap(),
            "\"draft.run.failed\""
        );
    }
}

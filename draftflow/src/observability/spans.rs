//! Run spans and step timing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use uuid::Uuid;

use crate::core::{ContentOrigin, ContentRequest, ContentType, StepName};

/// Attributes attached to the span of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSpanAttributes {
    /// Run identifier.
    pub run_id: Uuid,
    /// Production mode.
    pub content_type: ContentType,
    /// Category code.
    pub category: String,
    /// Language code.
    pub language: String,
    /// Content origin, which selects strict or advisory mode.
    pub origin: ContentOrigin,
}

impl RunSpanAttributes {
    /// Collects the attributes of a run for `request`.
    #[must_use]
    pub fn for_request(run_id: Uuid, request: &ContentRequest, origin: ContentOrigin) -> Self {
        Self {
            run_id,
            content_type: request.content_type(),
            category: request.category().to_string(),
            language: request.language().to_string(),
            origin,
        }
    }

    /// Converts to OpenTelemetry-style attribute names.
    #[must_use]
    pub fn to_otel_attributes(&self) -> HashMap<String, String> {
        HashMap::from([
            ("draft.run_id".to_string(), self.run_id.to_string()),
            ("draft.content_type".to_string(), self.content_type.to_string()),
            ("draft.category".to_string(), self.category.clone()),
            ("draft.language".to_string(), self.language.clone()),
            ("draft.origin".to_string(), self.origin.to_string()),
        ])
    }

    /// Opens the `draft_run` span.
    #[must_use]
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "draft_run",
            run_id = %self.run_id,
            content_type = %self.content_type,
            category = %self.category,
            language = %self.language,
            origin = %self.origin,
        )
    }
}

/// Measures one pipeline step.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
    step: StepName,
}

impl SpanTimer {
    /// Starts timing `step`.
    #[must_use]
    pub fn start(step: StepName) -> Self {
        Self {
            start: Instant::now(),
            step,
        }
    }

    /// Elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// The step being timed.
    #[must_use]
    pub fn step(&self) -> StepName {
        self.step
    }

    /// Stops the timer, logging and returning the duration.
    #[must_use]
    pub fn finish(self) -> f64 {
        let duration_ms = self.elapsed_ms();
        tracing::debug!(step = %self.step, duration_ms, "Step finished");
        duration_ms
    }
}

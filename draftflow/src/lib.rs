//! # Draftflow
//!
//! A guardrail pipeline that turns unreliable, model-generated article drafts
//! into content that is structurally, tonally and SEO-wise safe to publish.
//!
//! Draftflow provides:
//!
//! - **Error classification**: every failure maps to a kind and a retry verdict
//! - **Normalization**: deterministic tone and punctuation cleanup
//! - **Validation**: ordered rule tables with an optional outline check
//! - **SEO optimization**: read-only for generated content, rewriting for human content
//! - **Lifecycle tracking**: a per-run state machine with a fixed transition table
//! - **Bounded retries**: classification-driven, with an immutable request
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use draftflow::prelude::*;
//!
//! let ports = GeneratorPorts::new(Arc::new(MyTextClient::new()))
//!     .with_images(Arc::new(MyImageClient::new()));
//! let pipeline = DraftPipeline::new(ports, PipelineConfig::from_env()?)
//!     .with_event_sink(Arc::new(LoggingEventSink::default()));
//!
//! let request = ContentRequest::new(ContentType::Pillar, "kebun")
//!     .with_outline("## Media Tanam\n## Penyiraman");
//! let draft = pipeline.run(&request).await?;
//! assert!(draft.is_draft_ready());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod classifier;
pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod normalizer;
pub mod observability;
pub mod pipeline;
pub mod ports;
pub mod rules;
pub mod seo;
pub mod state;
pub mod testing;
pub mod text;
pub mod validator;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::classifier::{classify, is_retryable, ClassifiedError, ErrorKind};
    pub use crate::config::PipelineConfig;
    pub use crate::core::{
        ContentOrigin, ContentRequest, ContentResult, ContentStatus, ContentType, DraftResult,
        ImageAsset, StepName, StepOutcome,
    };
    pub use crate::errors::{ContractViolation, DraftflowError, InvalidTransitionError};
    pub use crate::events::{DraftEvent, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::normalizer::Normalizer;
    pub use crate::observability::{init_tracing, LogFormat};
    pub use crate::pipeline::{DraftPipeline, RetryPolicy};
    pub use crate::ports::{GeneratorPorts, ImageGenerator, TextGenerator};
    pub use crate::seo::{SeoOptimizer, SeoOutcome};
    pub use crate::state::{PipelinePhase, PipelineState};
    pub use crate::validator::{RuleTag, ValidationError, Validator};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_exposes_pipeline_types() {
        let config = PipelineConfig::default();
        assert_eq!(config.origin, ContentOrigin::Generated);
        assert_eq!(PipelineState::default().phase(), PipelinePhase::Init);
    }
}

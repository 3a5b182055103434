//! Core domain model types for draftflow.
//!
//! This module contains the data that flows through a pipeline run:
//! - Content requests and results
//! - Status and origin enums
//! - Step outcomes, image assets and the final draft bundle

mod content;
mod outcome;
mod status;

pub use content::{ContentRequest, ContentResult, ContentType};
pub use outcome::{DraftResult, ImageAsset, StepName, StepOutcome};
pub use status::{ContentOrigin, ContentStatus};

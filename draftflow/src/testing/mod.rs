//! Testing utilities for draftflow pipelines.
//!
//! This module provides:
//! - Scripted text and image generators
//! - Article fixtures with a chosen word count and heading layout
//! - Assertions for drafts and errors

pub mod assertions;
pub mod fixtures;
pub mod mocks;

pub use assertions::{
    assert_draft_ready, assert_error_kind, assert_quarantined, assert_rule, assert_step_labels,
};
pub use crate::events::CollectingEventSink;
pub use fixtures::ArticleFixture;
pub use mocks::{FailingImageGenerator, ScriptedTextGenerator, StaticImageGenerator, TextReply};

//! Pipeline execution.
//!
//! This module provides:
//! - The draft orchestrator and its per-run ledger
//! - The bounded retry wrapper and inter-attempt backoff
//! - The canonical body holder
//! - Image path normalization and injection

mod canonical;
mod images;
mod orchestrator;
mod retry;


pub use canonical::CanonicalBody;
pub use images::{inject_images, normalize_image_path, ImageConfig};
pub use orchestrator::DraftPipeline;
pub use retry::{clamp_retries, BackoffStrategy, JitterStrategy, RetryPolicy, MAX_RETRIES};

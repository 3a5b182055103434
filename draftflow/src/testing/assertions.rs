//! Assertions for pipeline results.

use crate::classifier::ErrorKind;
use crate::core::DraftResult;
use crate::errors::DraftflowError;
use crate::state::PipelinePhase;
use crate::validator::{RuleTag, ValidationError};

/// Asserts the step labels, e.g. `["text: ok", "seo: ok", ...]`.
pub fn assert_step_labels(draft: &DraftResult, expected: &[&str]) {
    let labels = draft.step_labels();
    assert_eq!(
        labels, expected,
        "Expected steps {expected:?}, got {labels:?}"
    );
}

/// Asserts that the draft is ready to store.
pub fn assert_draft_ready(draft: &DraftResult) {
    assert!(
        draft.is_draft_ready(),
        "Expected draft-ready, got status {}",
        draft.status
    );
}

/// Asserts the classified kind behind an error.
pub fn assert_error_kind(err: &DraftflowError, expected: ErrorKind) {
    assert_eq!(
        err.error_kind(),
        Some(expected),
        "Expected {expected} behind error: {err}"
    );
}

/// Asserts that a run ended in quarantine during `stage`.
pub fn assert_quarantined(err: &DraftflowError, stage: PipelinePhase) {
    match err {
        DraftflowError::Quarantined { stage: actual, .. } => assert_eq!(
            *actual, stage,
            "Expected quarantine during {stage}, got {actual}"
        ),
        DraftflowError::ContentFailed { source, .. } => assert_quarantined(source, stage),
        other => panic!("Expected quarantine during {stage}, got: {other}"),
    }
}

/// Asserts that validation failed with `rule`.
pub fn assert_rule(result: &Result<(), ValidationError>, rule: RuleTag) {
    match result {
        Err(err) => assert_eq!(err.rule, rule, "Expected rule {rule}, got: {err}"),
        Ok(()) => panic!("Expected rule {rule}, but validation passed"),
    }
}

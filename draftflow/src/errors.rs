//! Error types for draftflow.
//!
//! Collaborators report failures as `anyhow::Error`; everything the crate
//! itself raises is a [`DraftflowError`]. Two kinds are deliberately kept
//! apart from ordinary content failures:
//!
//! - [`ContractViolation`]: an internal wiring bug (lost content, a path that
//!   cannot be stored). Never classified, never retried.
//! - [`InvalidTransitionError`]: an impossible state-machine move.

use thiserror::Error;

use crate::classifier::{ClassifiedError, ErrorKind};
use crate::state::PipelinePhase;

/// The main error type for draftflow operations.
#[derive(Debug, Error)]
pub enum DraftflowError {
    /// A retryable generation failure handed back to the retry wrapper.
    #[error("generation failed: {0}")]
    Generation(ClassifiedError),

    /// The run ended in quarantine.
    #[error("quarantined during {stage}: {cause}")]
    Quarantined {
        /// Phase the run was in when it was rejected.
        stage: PipelinePhase,
        /// Why it was rejected.
        cause: ClassifiedError,
    },

    /// An impossible state transition was attempted.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransitionError),

    /// An internal invariant was broken.
    #[error(transparent)]
    ContractViolation(#[from] ContractViolation),

    /// A non-retryable failure stopped the retry loop.
    #[error("content_failed after {attempts} attempts: {source}")]
    ContentFailed {
        /// Attempts performed, including the failing one.
        attempts: u32,
        /// Terminal cause.
        source: Box<DraftflowError>,
    },

    /// Every attempt failed with a retryable error.
    #[error("pipeline failed after {attempts} attempts: {source}")]
    PipelineFailed {
        /// Attempts performed.
        attempts: u32,
        /// Last retryable cause.
        source: Box<DraftflowError>,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DraftflowError {
    /// Returns the classified kind behind this error, if it has one.
    ///
    /// Terminal retry errors report the kind of their wrapped cause.
    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Generation(cause) | Self::Quarantined { cause, .. } => Some(cause.kind),
            Self::ContentFailed { source, .. } | Self::PipelineFailed { source, .. } => {
                source.error_kind()
            }
            _ => None,
        }
    }

    /// Returns true for internal bugs as opposed to bad content.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        match self {
            Self::ContractViolation(_) | Self::InvalidTransition(_) => true,
            Self::ContentFailed { source, .. } | Self::PipelineFailed { source, .. } => {
                source.is_contract_violation()
            }
            _ => false,
        }
    }

    /// Returns true if a later attempt could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Generation(cause) if cause.is_retryable())
    }
}

/// An internal invariant was broken: a pipeline bug, not bad content.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("internal contract violation in {component}: {detail}")]
pub struct ContractViolation {
    /// Component that detected the violation.
    pub component: &'static str,
    /// What went wrong.
    pub detail: String,
}

impl ContractViolation {
    /// Creates a new contract violation.
    #[must_use]
    pub fn new(component: &'static str, detail: impl Into<String>) -> Self {
        Self {
            component,
            detail: detail.into(),
        }
    }
}

/// A transition that is not in the transition table.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("invalid state transition: {from} -> {to}")]
pub struct InvalidTransitionError {
    /// Phase the machine was in.
    pub from: PipelinePhase,
    /// Phase that was requested.
    pub to: PipelinePhase,
}

/// Result alias for draftflow operations.
pub type Result<T> = std::result::Result<T, DraftflowError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify_message;

    #[test]
    fn test_contract_violation_display() {
        let err = ContractViolation::new("validator", "body has 12 words");
        assert_eq!(
            err.to_string(),
            "internal contract violation in validator: body has 12 words"
        );
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = InvalidTransitionError {
            from: PipelinePhase::Store,
            to: PipelinePhase::Retry,
        };
        assert_eq!(err.to_string(), "invalid state transition: stored -> retrying");
    }

    #[test]
    fn test_terminal_errors_report_wrapped_kind() {
        let cause = classify_message("missing field `title`");
        let err = DraftflowError::ContentFailed {
            attempts: 1,
            source: Box::new(DraftflowError::Generation(cause)),
        };
        assert!(err.to_string().starts_with("content_failed after 1 attempts"));
        assert_eq!(err.error_kind(), Some(ErrorKind::Structure));
        assert!(!err.is_contract_violation());
    }

    #[test]
    fn test_contract_violation_is_not_retryable() {
        let err: DraftflowError = ContractViolation::new("images", "bad path").into();
        assert!(err.is_contract_violation());
        assert!(!err.is_retryable());
        assert_eq!(err.error_kind(), None);
    }

    #[test]
    fn test_generation_retryability_follows_kind() {
        let infra = DraftflowError::Generation(classify_message("connection refused"));
        let quality = DraftflowError::Generation(classify_message("validation failed"));
        assert!(infra.is_retryable());
        assert!(!quality.is_retryable());
    }
}

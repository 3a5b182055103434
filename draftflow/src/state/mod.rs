//! Lifecycle state machine for one generation attempt.
//!
//! ```text
//! INIT -> GENERATE_RAW -> NORMALIZE -> VALIDATE -> STORE
//!              |              |           |
//!              v              v           v
//!          QUARANTINE     QUARANTINE   QUARANTINE | RETRY -> GENERATE_RAW
//! ```
//!
//! STORE and QUARANTINE are terminal. A state is owned by a single run.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::InvalidTransitionError;

/// Default number of retries a state allows.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Coarse lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelinePhase {
    /// Nothing has happened yet.
    #[default]
    Init,
    /// Waiting on the text generator.
    GenerateRaw,
    /// Normalizing and optimizing the body.
    Normalize,
    /// Running the validator.
    Validate,
    /// Accepted.
    Store,
    /// Rejected.
    Quarantine,
    /// Scheduled for another attempt.
    Retry,
}

impl PipelinePhase {
    /// Every phase, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Init,
        Self::GenerateRaw,
        Self::Normalize,
        Self::Validate,
        Self::Store,
        Self::Quarantine,
        Self::Retry,
    ];

    /// Derived status code.
    #[must_use]
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::Init => "pending",
            Self::GenerateRaw => "generating",
            Self::Normalize => "normalizing",
            Self::Validate => "validating",
            Self::Store => "stored",
            Self::Quarantine => "quarantined",
            Self::Retry => "retrying",
        }
    }

    /// Phases reachable in one step.
    #[must_use]
    pub fn allowed_transitions(&self) -> &'static [PipelinePhase] {
        match self {
            Self::Init => &[Self::GenerateRaw],
            Self::GenerateRaw => &[Self::Normalize, Self::Quarantine],
            Self::Normalize => &[Self::Validate, Self::Quarantine],
            Self::Validate => &[Self::Store, Self::Quarantine, Self::Retry],
            Self::Retry => &[Self::GenerateRaw, Self::Quarantine],
            Self::Store | Self::Quarantine => &[],
        }
    }

    /// Returns true if `next` is reachable in one step.
    #[must_use]
    pub fn can_transition_to(&self, next: PipelinePhase) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Returns true for phases without outgoing transitions.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status_code())
    }
}

/// State of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineState {
    phase: PipelinePhase,
    retry_count: u32,
    max_retries: u32,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

impl PipelineState {
    /// Creates a state in `Init`.
    #[must_use]
    pub fn new(max_retries: u32) -> Self {
        Self {
            phase: PipelinePhase::Init,
            retry_count: 0,
            max_retries,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> PipelinePhase {
        self.phase
    }

    /// Status code of the current phase.
    #[must_use]
    pub fn status_code(&self) -> &'static str {
        self.phase.status_code()
    }

    /// Times `Retry` has been entered.
    #[must_use]
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Retry limit.
    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Moves to `next`, or leaves the state untouched and errors.
    pub fn transition(&mut self, next: PipelinePhase) -> Result<(), InvalidTransitionError> {
        if !self.phase.can_transition_to(next) {
            return Err(InvalidTransitionError {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!(from = %self.phase, to = %next, "State transition");
        if next == PipelinePhase::Retry {
            self.retry_count += 1;
        }
        self.phase = next;
        Ok(())
    }

    /// Returns true while retries remain.
    #[must_use]
    pub fn can_retry(&self) -> bool {
        self.retry_count < self.max_retries
    }

    /// Returns true in `Store` or `Quarantine`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Shortest path from `Init` to `phase` through the table.
    fn state_in(phase: PipelinePhase) -> PipelineState {
        use PipelinePhase::{GenerateRaw, Init, Normalize, Quarantine, Retry, Store, Validate};
        let path: &[PipelinePhase] = match phase {
            Init => &[],
            GenerateRaw => &[GenerateRaw],
            Normalize => &[GenerateRaw, Normalize],
            Validate => &[GenerateRaw, Normalize, Validate],
            Store => &[GenerateRaw, Normalize, Validate, Store],
            Quarantine => &[GenerateRaw, Quarantine],
            Retry => &[GenerateRaw, Normalize, Validate, Retry],
        };
        let mut state = PipelineState::default();
        for step in path {
            state.transition(*step).unwrap();
        }
        assert_eq!(state.phase(), phase);
        state
    }

    const TABLE: &[(PipelinePhase, PipelinePhase)] = &[
        (PipelinePhase::Init, PipelinePhase::GenerateRaw),
        (PipelinePhase::GenerateRaw, PipelinePhase::Normalize),
        (PipelinePhase::GenerateRaw, PipelinePhase::Quarantine),
        (PipelinePhase::Normalize, PipelinePhase::Validate),
        (PipelinePhase::Normalize, PipelinePhase::Quarantine),
        (PipelinePhase::Validate, PipelinePhase::Store),
        (PipelinePhase::Validate, PipelinePhase::Quarantine),
        (PipelinePhase::Validate, PipelinePhase::Retry),
        (PipelinePhase::Retry, PipelinePhase::GenerateRaw),
        (PipelinePhase::Retry, PipelinePhase::Quarantine),
    ];

    #[test]
    fn test_every_pair_against_table() {
        for from in PipelinePhase::ALL {
            for to in PipelinePhase::ALL {
                let mut state = state_in(from);
                let before = state.clone();
                let result = state.transition(to);

                if TABLE.contains(&(from, to)) {
                    assert!(result.is_ok(), "{from} -> {to} should be allowed");
                    assert_eq!(state.phase(), to);
                    assert_eq!(state.status_code(), to.status_code());
                } else {
                    assert_eq!(result, Err(InvalidTransitionError { from, to }));
                    assert_eq!(state, before, "{from} -> {to} changed state");
                }
            }
        }
    }

    #[test]
    fn test_status_codes() {
        let codes: Vec<&str> = PipelinePhase::ALL.iter().map(PipelinePhase::status_code).collect();
        assert_eq!(
            codes,
            vec!["pending", "generating", "normalizing", "validating", "stored", "quarantined", "retrying"]
        );
    }

    #[test]
    fn test_retry_counting() {
        let mut state = state_in(PipelinePhase::Validate);
        assert!(state.can_retry());

        state.transition(PipelinePhase::Retry).unwrap();
        assert_eq!(state.retry_count(), 1);
        assert!(state.can_retry());

        for phase in [
            PipelinePhase::GenerateRaw,
            PipelinePhase::Normalize,
            PipelinePhase::Validate,
            PipelinePhase::Retry,
        ] {
            state.transition(phase).unwrap();
        }
        assert_eq!(state.retry_count(), 2);
        assert!(!state.can_retry());
    }

    #[test]
    fn test_terminal_phases() {
        assert!(state_in(PipelinePhase::Store).is_terminal());
        assert!(state_in(PipelinePhase::Quarantine).is_terminal());
        assert!(!state_in(PipelinePhase::Retry).is_terminal());
    }

    #[test]
    fn test_failed_transition_keeps_retry_count() {
        let mut state = state_in(PipelinePhase::Retry);
        assert!(state.transition(PipelinePhase::Retry).is_err());
        assert_eq!(state.retry_count(), 1);
        assert_eq!(state.phase(), PipelinePhase::Retry);
    }
}

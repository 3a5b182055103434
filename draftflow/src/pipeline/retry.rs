//! Bounded, classification-driven retry around [`DraftPipeline::execute`].
//!
//! Every attempt gets a fresh clone of the original request, so the outline
//! cannot drift between attempts. Structure and quality failures (and
//! anything else that is not retryable) stop the loop at once; contract
//! violations are returned unchanged.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::DraftPipeline;
use crate::core::{ContentRequest, DraftResult};
use crate::errors::{ContractViolation, DraftflowError, Result};

/// Hard upper bound on retries, whatever the caller asks for.
pub const MAX_RETRIES: u32 = 2;

/// Clamps a requested retry count to [`MAX_RETRIES`].
#[must_use]
pub fn clamp_retries(requested: u32) -> u32 {
    requested.min(MAX_RETRIES)
}

/// How the delay grows between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffStrategy {
    /// delay = base * 2^retry
    #[default]
    Exponential,
    /// delay = base * (retry + 1)
    Linear,
    /// delay = base
    Constant,
}

/// Randomisation applied to the delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JitterStrategy {
    /// Exact delay.
    None,
    /// Random from 0 to delay.
    #[default]
    Full,
    /// Half fixed, half random.
    Equal,
}

/// Delay between attempts. The default never sleeps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Base delay in milliseconds; 0 disables sleeping.
    pub base_delay_ms: u64,
    /// Delay cap in milliseconds.
    pub max_delay_ms: u64,
    /// Growth strategy.
    pub backoff: BackoffStrategy,
    /// Jitter strategy.
    pub jitter: JitterStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay_ms: 0,
            max_delay_ms: 30_000,
            backoff: BackoffStrategy::Exponential,
            jitter: JitterStrategy::Full,
        }
    }
}

impl RetryPolicy {
    /// Creates the default (no delay) policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base delay.
    #[must_use]
    pub fn with_base_delay_ms(mut self, delay: u64) -> Self {
        self.base_delay_ms = delay;
        self
    }

    /// Sets the delay cap.
    #[must_use]
    pub fn with_max_delay_ms(mut self, delay: u64) -> Self {
        self.max_delay_ms = delay;
        self
    }

    /// Sets the backoff strategy.
    #[must_use]
    pub fn with_backoff(mut self, strategy: BackoffStrategy) -> Self {
        self.backoff = strategy;
        self
    }

    /// Sets the jitter strategy.
    #[must_use]
    pub fn with_jitter(mut self, strategy: JitterStrategy) -> Self {
        self.jitter = strategy;
        self
    }

    /// Delay before retry number `retry` (0 for the first retry).
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let base = self.base_delay_ms;
        let max = self.max_delay_ms;
        let delay = match self.backoff {
            BackoffStrategy::Exponential => base.saturating_mul(2u64.saturating_pow(retry)),
            BackoffStrategy::Linear => base.saturating_mul(u64::from(retry) + 1),
            BackoffStrategy::Constant => base,
        }
        .min(max);

        let jittered = match self.jitter {
            JitterStrategy::None => delay,
            JitterStrategy::Full if delay > 0 => rand::thread_rng().gen_range(0..=delay),
            JitterStrategy::Equal if delay / 2 > 0 => {
                let half = delay / 2;
                half + rand::thread_rng().gen_range(0..=half)
            }
            JitterStrategy::Full | JitterStrategy::Equal => delay,
        };
        Duration::from_millis(jittered)
    }
}

impl DraftPipeline {
    /// Runs the pipeline with up to `requested_max_retries` retries (clamped
    /// to [`MAX_RETRIES`]).
    ///
    /// # Errors
    ///
    /// - `ContentFailed` when an attempt fails with a non-retryable error.
    /// - `PipelineFailed` when every attempt fails with a retryable error.
    /// - `ContractViolation` / `InvalidTransition` as soon as one occurs.
    pub async fn execute_with_retry(
        &self,
        request: &ContentRequest,
        requested_max_retries: u32,
    ) -> Result<DraftResult> {
        let max_retries = clamp_retries(requested_max_retries);
        if max_retries < requested_max_retries {
            tracing::debug!(
                requested = requested_max_retries,
                allowed = max_retries,
                "Clamped retry count"
            );
        }
        let outline_fingerprint = request.outline_fingerprint();

        let mut attempts = 0;
        let mut last_error: Option<DraftflowError> = None;
        let mut terminal = false;

        for attempt in 0..=max_retries {
            if attempt > 0 {
                let delay = self.config().retry.delay_for(attempt - 1);
                if !delay.is_zero() {
                    tracing::debug!(
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Waiting before retry"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
            attempts = attempt + 1;
            tracing::info!(attempt = attempts, outline_fingerprint = %outline_fingerprint, "Starting attempt");

            let attempt_request = request.clone();
            match self.execute(&attempt_request).await {
                Ok(draft) => return Ok(draft),
                Err(err) if err.is_contract_violation() => return Err(err),
                Err(err) => {
                    let retryable = err.is_retryable();
                    tracing::warn!(
                        attempt = attempts,
                        kind = ?err.error_kind(),
                        retryable,
                        error = %err,
                        "Attempt failed"
                    );
                    last_error = Some(err);
                    if !retryable {
                        terminal = true;
                        break;
                    }
                }
            }
        }

        match last_error {
            Some(source) if terminal => Err(DraftflowError::ContentFailed {
                attempts,
                source: Box::new(source),
            }),
            Some(source) => Err(DraftflowError::PipelineFailed {
                attempts,
                source: Box::new(source),
            }),
            None => Err(ContractViolation::new("retry", "retry loop ended without an attempt").into()),
        }
    }

    /// Runs with the configured `max_retries`.
    pub async fn run(&self, request: &ContentRequest) -> Result<DraftResult> {
        self.execute_with_retry(request, self.config().max_retries).await
    }
}

//! The draft pipeline: generate, normalize, optimize, illustrate, validate.

use serde_json::json;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use super::canonical::CanonicalBody;
use super::images::inject_images;
use crate::classifier::classify;
use crate::config::PipelineConfig;
use crate::core::{
    ContentRequest, ContentResult, ContentStatus, DraftResult, ImageAsset, StepName, StepOutcome,
};
use crate::errors::{ContractViolation, DraftflowError, InvalidTransitionError, Result};
use crate::events::{DraftEvent, EventSink, NoOpEventSink};
use crate::normalizer::Normalizer;
use crate::observability::{RunSpanAttributes, SpanTimer};
use crate::ports::GeneratorPorts;
use crate::seo::SeoOptimizer;
use crate::state::{PipelinePhase, PipelineState};
use crate::text::slugify;
use crate::validator::{ValidationError, Validator, ValidatorError};

/// Runs one request through the guardrails and returns a ready draft.
///
/// The pipeline itself is stateless between runs: every call to
/// [`execute`](Self::execute) owns its own [`PipelineState`] and step list, so
/// one instance can serve concurrent runs.
pub struct DraftPipeline {
    ports: GeneratorPorts,
    config: PipelineConfig,
    normalizer: Normalizer,
    seo: SeoOptimizer,
    validator: Validator,
    events: Arc<dyn EventSink>,
}

impl std::fmt::Debug for DraftPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftPipeline")
            .field("ports", &self.ports)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DraftPipeline {
    /// Builds a pipeline from collaborators and settings.
    #[must_use]
    pub fn new(ports: GeneratorPorts, config: PipelineConfig) -> Self {
        Self {
            normalizer: Normalizer::new(config.normalizer.clone()),
            seo: SeoOptimizer::new(config.seo.clone()),
            validator: Validator::new(config.validator.clone()),
            ports,
            config,
            events: Arc::new(NoOpEventSink),
        }
    }

    /// Sets the sink that receives run events.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Returns the settings.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Returns the collaborators.
    #[must_use]
    pub fn ports(&self) -> &GeneratorPorts {
        &self.ports
    }

    /// Runs a single attempt.
    ///
    /// # Errors
    ///
    /// - `Generation` for a retryable text-generation failure.
    /// - `Quarantined` for a non-retryable generation failure, and in strict
    ///   mode for blocking SEO issues or a validation failure.
    /// - `ContractViolation` when the canonical body is implausibly short or
    ///   an image path cannot be stored.
    /// - `InvalidTransition` if the state machine is driven out of order.
    pub async fn execute(&self, request: &ContentRequest) -> Result<DraftResult> {
        let run_id = Uuid::now_v7();
        let span = RunSpanAttributes::for_request(run_id, request, self.config.origin).span();
        let result = self.execute_run(run_id, request).instrument(span).await;

        match &result {
            Ok(draft) => {
                tracing::info!(%run_id, steps = ?draft.step_labels(), "Draft ready");
                self.events.emit(
                    DraftEvent::RunCompleted,
                    json!({
                        "run_id": run_id,
                        "status": draft.status,
                        "steps": draft.step_labels(),
                        "images": draft.images.len(),
                    }),
                );
            }
            Err(err) => {
                tracing::warn!(%run_id, error = %err, "Run failed");
                let status = matches!(err, DraftflowError::Quarantined { .. })
                    .then_some(ContentStatus::Rejected);
                self.events.emit(
                    DraftEvent::RunFailed,
                    json!({
                        "run_id": run_id,
                        "status": status,
                        "error": err.to_string(),
                        "kind": err.error_kind().map(|k| k.to_string()),
                        "contract_violation": err.is_contract_violation(),
                    }),
                );
            }
        }
        result
    }

    async fn execute_run(&self, run_id: Uuid, request: &ContentRequest) -> Result<DraftResult> {
        let origin = self.config.origin;
        let mut run = RunLedger::new(run_id, self.config.max_retries, self.events.as_ref());

        run.advance(PipelinePhase::GenerateRaw)?;
        let timer = SpanTimer::start(StepName::Text);
        let raw = match self.ports.text.generate(request).await {
            Ok(raw) => raw,
            Err(err) => {
                let cause = classify(err);
                tracing::warn!(kind = %cause.kind, error = %cause, "Text generation failed");
                if cause.is_retryable() {
                    return Err(DraftflowError::Generation(cause));
                }
                run.advance(PipelinePhase::Quarantine)?;
                return Err(DraftflowError::Quarantined {
                    stage: PipelinePhase::GenerateRaw,
                    cause,
                });
            }
        };
        run.record(StepOutcome::ok(StepName::Text).with_duration_ms(timer.finish()));

        run.advance(PipelinePhase::Normalize)?;
        let mut canonical = CanonicalBody::new(self.normalizer.normalize(raw), "normalize");

        let timer = SpanTimer::start(StepName::Seo);
        let seo = self.seo.optimize(canonical.content().clone(), origin);
        let blocking = seo.is_blocking();
        let seo_step = match seo.error {
            Some(error) if blocking => {
                run.advance(PipelinePhase::Quarantine)?;
                return Err(DraftflowError::Quarantined {
                    stage: PipelinePhase::Normalize,
                    cause: classify(anyhow::Error::new(error)),
                });
            }
            Some(advisory) => StepOutcome::ok(StepName::Seo).with_diagnostic(advisory.to_string()),
            None => StepOutcome::ok(StepName::Seo),
        };
        canonical.replace("seo", seo.content);
        run.record(seo_step.with_duration_ms(timer.finish()));

        let timer = SpanTimer::start(StepName::Image);
        let (images, image_step) = self.illustrate(&mut canonical).await?;
        run.record(image_step.with_duration_ms(timer.finish()));

        run.advance(PipelinePhase::Validate)?;
        let timer = SpanTimer::start(StepName::Validate);
        let failures = self.judge(request, canonical.content())?;
        let validate_step = match failures.first() {
            None => StepOutcome::ok(StepName::Validate),
            Some(first) if origin.is_strict() => {
                run.advance(PipelinePhase::Quarantine)?;
                return Err(DraftflowError::Quarantined {
                    stage: PipelinePhase::Validate,
                    cause: classify(anyhow::Error::new(first.clone())),
                });
            }
            Some(_) => {
                let diagnostic = failures
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                StepOutcome::ok(StepName::Validate).with_diagnostic(diagnostic)
            }
        };
        canonical.set_status(ContentStatus::Validated);
        run.record(validate_step.with_duration_ms(timer.finish()));

        run.advance(PipelinePhase::Store)?;
        canonical.set_status(ContentStatus::DraftReady);
        tracing::debug!(
            revision = canonical.revision(),
            writer = canonical.writer(),
            fingerprint = %canonical.fingerprint(),
            "Storing canonical body"
        );
        Ok(DraftResult::ready(
            run_id,
            canonical.into_content(),
            images,
            run.into_steps(),
        ))
    }

    /// Generates images and injects them into the canonical body.
    ///
    /// Collaborator failures are recorded as a failed step; a path that
    /// cannot be stored is a contract violation.
    async fn illustrate(
        &self,
        canonical: &mut CanonicalBody,
    ) -> std::result::Result<(Vec<ImageAsset>, StepOutcome), ContractViolation> {
        let slug = slugify(&canonical.content().title);
        match self.ports.images.generate_images(canonical.body(), &slug).await {
            Ok(images) => {
                let body = inject_images(
                    canonical.body(),
                    &images,
                    &self.config.images.storage_prefix,
                )?;
                if body != canonical.body() {
                    canonical.replace_body("image", body);
                }
                Ok((images, StepOutcome::ok(StepName::Image)))
            }
            Err(err) => {
                tracing::warn!(
                    slug = %slug,
                    error = %format!("{err:#}"),
                    "Image generation failed, continuing without images"
                );
                Ok((Vec::new(), StepOutcome::failed(StepName::Image, format!("{err:#}"))))
            }
        }
    }

    /// Every rule failure for `content`, canonical check first.
    fn judge(
        &self,
        request: &ContentRequest,
        content: &ContentResult,
    ) -> std::result::Result<Vec<ValidationError>, ContractViolation> {
        let mut failures = Vec::new();
        match self.validator.validate_canonical(content) {
            Ok(()) => {}
            Err(ValidatorError::Rule(failure)) => failures.push(failure),
            Err(ValidatorError::Contract(violation)) => return Err(violation),
        }
        if request.has_outline() {
            if let Err(failure) = self.validator.validate_outline(request.outline(), &content.body) {
                failures.push(failure);
            }
        }
        for failure in &failures {
            tracing::warn!(
                rule = %failure.rule,
                snippet = %failure.snippet,
                strict = self.config.origin.is_strict(),
                "{}",
                failure.message
            );
        }
        Ok(failures)
    }
}

/// Per-run state machine and step list.
struct RunLedger<'a> {
    run_id: Uuid,
    state: PipelineState,
    steps: Vec<StepOutcome>,
    events: &'a dyn EventSink,
}

impl<'a> RunLedger<'a> {
    fn new(run_id: Uuid, max_retries: u32, events: &'a dyn EventSink) -> Self {
        Self {
            run_id,
            state: PipelineState::new(max_retries),
            steps: Vec::with_capacity(4),
            events,
        }
    }

    fn advance(&mut self, next: PipelinePhase) -> std::result::Result<(), InvalidTransitionError> {
        let from = self.state.phase();
        self.state.transition(next)?;
        tracing::debug!(from = %from, to = %next, "State transition");
        self.events.emit(
            DraftEvent::StateChanged,
            json!({
                "run_id": self.run_id,
                "from": from,
                "to": next,
                "status": next.status_code(),
            }),
        );
        Ok(())
    }

    fn record(&mut self, outcome: StepOutcome) {
        self.events.emit(
            DraftEvent::StepCompleted,
            json!({
                "run_id": self.run_id,
                "step": outcome.step,
                "success": outcome.success,
                "duration_ms": outcome.duration_ms,
                "error": outcome.error,
            }),
        );
        self.steps.push(outcome);
    }

    fn into_steps(self) -> Vec<StepOutcome> {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingEventSink;

    #[test]
    fn test_ledger_emits_state_changes() {
        let sink = CollectingEventSink::new();
        let mut ledger = RunLedger::new(Uuid::nil(), 2, &sink);
        ledger.advance(PipelinePhase::GenerateRaw).unwrap();
        assert!(ledger.advance(PipelinePhase::Store).is_err());

        let changes = sink.payloads(DraftEvent::StateChanged);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0]["from"], "INIT");
        assert_eq!(changes[0]["to"], "GENERATE_RAW");
        assert_eq!(changes[0]["status"], "generating");
    }

    #[test]
    fn test_ledger_keeps_step_order() {
        let sink = CollectingEventSink::new();
        let mut ledger = RunLedger::new(Uuid::nil(), 2, &sink);
        ledger.record(StepOutcome::ok(StepName::Text));
        ledger.record(StepOutcome::failed(StepName::Image, "down"));

        let steps = ledger.into_steps();
        assert_eq!(steps[0].step, StepName::Text);
        let completed = sink.payloads(DraftEvent::StepCompleted);
        assert_eq!(completed[1]["step"], "image");
        assert_eq!(completed[1]["success"], false);
    }
}

//! Step bookkeeping and the final draft bundle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{ContentResult, ContentStatus};

/// A pipeline step that is recorded in the run's outcome list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    /// Text generation.
    Text,
    /// SEO optimization.
    Seo,
    /// Image generation and injection.
    Image,
    /// Structural and tonal validation.
    Validate,
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Seo => write!(f, "seo"),
            Self::Image => write!(f, "image"),
            Self::Validate => write!(f, "validate"),
        }
    }
}

/// What happened in one step of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Which step.
    pub step: StepName,
    /// False only for non-fatal failures (e.g. image generation).
    pub success: bool,
    /// Error text, or advisory diagnostics for a successful step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock duration of the step.
    #[serde(default)]
    pub duration_ms: f64,
}

impl StepOutcome {
    /// A successful step.
    #[must_use]
    pub fn ok(step: StepName) -> Self {
        Self {
            step,
            success: true,
            error: None,
            duration_ms: 0.0,
        }
    }

    /// A failed but non-fatal step.
    #[must_use]
    pub fn failed(step: StepName, error: impl Into<String>) -> Self {
        Self {
            step,
            success: false,
            error: Some(error.into()),
            duration_ms: 0.0,
        }
    }

    /// Attaches diagnostic text without changing the success flag.
    #[must_use]
    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.error = Some(diagnostic.into());
        self
    }

    /// Sets the duration.
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Short label such as `"text: ok"` or `"image: warn"`.
    #[must_use]
    pub fn label(&self) -> String {
        let verdict = if self.success { "ok" } else { "warn" };
        format!("{}: {verdict}", self.step)
    }
}

/// An image produced by the image collaborator.
///
/// The core only reads these fields; it never fetches or stores images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Level-2 heading the image belongs under.
    pub heading: String,
    /// Alt text.
    pub alt_text: String,
    /// Local storage path; empty if saving failed.
    #[serde(default)]
    pub local_path: String,
    /// Hero images are shown above the article, never injected in the body.
    #[serde(default)]
    pub is_hero: bool,
}

impl ImageAsset {
    /// Creates a section image.
    #[must_use]
    pub fn new(
        heading: impl Into<String>,
        alt_text: impl Into<String>,
        local_path: impl Into<String>,
    ) -> Self {
        Self {
            heading: heading.into(),
            alt_text: alt_text.into(),
            local_path: local_path.into(),
            is_hero: false,
        }
    }

    /// Creates a hero image.
    #[must_use]
    pub fn hero(alt_text: impl Into<String>, local_path: impl Into<String>) -> Self {
        Self {
            heading: String::new(),
            alt_text: alt_text.into(),
            local_path: local_path.into(),
            is_hero: true,
        }
    }

    /// Returns true if the image was saved somewhere.
    #[must_use]
    pub fn has_path(&self) -> bool {
        !self.local_path.trim().is_empty()
    }
}

/// The bundle returned by a successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftResult {
    /// Identifier of the run that produced this draft.
    pub run_id: Uuid,
    /// Final content.
    pub content: ContentResult,
    /// Images produced for the article.
    pub images: Vec<ImageAsset>,
    /// Final status; `DraftReady` for every returned draft.
    pub status: ContentStatus,
    /// Step bookkeeping in execution order, always starting with `text`.
    pub steps: Vec<StepOutcome>,
    /// When the draft was assembled.
    pub created_at: DateTime<Utc>,
}

impl DraftResult {
    /// Assembles a ready draft.
    #[must_use]
    pub fn ready(
        run_id: Uuid,
        content: ContentResult,
        images: Vec<ImageAsset>,
        steps: Vec<StepOutcome>,
    ) -> Self {
        Self {
            run_id,
            content,
            images,
            status: ContentStatus::DraftReady,
            steps,
            created_at: Utc::now(),
        }
    }

    /// Returns true if the draft is ready to store.
    #[must_use]
    pub fn is_draft_ready(&self) -> bool {
        self.status == ContentStatus::DraftReady
    }

    /// Step labels in order, e.g. `["text: ok", "seo: ok", ...]`.
    #[must_use]
    pub fn step_labels(&self) -> Vec<String> {
        self.steps.iter().map(StepOutcome::label).collect()
    }

    /// Returns the outcome recorded for `step`, if any.
    #[must_use]
    pub fn step(&self, step: StepName) -> Option<&StepOutcome> {
        self.steps.iter().find(|s| s.step == step)
    }

    /// All diagnostics and non-fatal errors recorded during the run.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<String> {
        self.steps
            .iter()
            .filter_map(|s| s.error.as_ref().map(|e| format!("{}: {e}", s.step)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_labels() {
        assert_eq!(StepOutcome::ok(StepName::Text).label(), "text: ok");
        assert_eq!(StepOutcome::failed(StepName::Image, "down").label(), "image: warn");
        assert_eq!(
            StepOutcome::ok(StepName::Validate)
                .with_diagnostic("advisory")
                .label(),
            "validate: ok"
        );
    }

    #[test]
    fn test_step_outcome_serialize_skips_empty_error() {
        let json = serde_json::to_value(StepOutcome::ok(StepName::Seo)).unwrap();
        assert_eq!(json["step"], "seo");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_image_asset_constructors() {
        let hero = ImageAsset::hero("sampul", "/images/hero.png");
        assert!(hero.is_hero);
        assert!(hero.has_path());
        assert!(!ImageAsset::new("Bagian", "alt", "  ").has_path());
    }

    #[test]
    fn test_draft_result_accessors() {
        let draft = DraftResult::ready(
            Uuid::new_v4(),
            ContentResult::raw("t", "b"),
            Vec::new(),
            vec![
                StepOutcome::ok(StepName::Text),
                StepOutcome::failed(StepName::Image, "timeout"),
            ],
        );
        assert!(draft.is_draft_ready());
        assert_eq!(draft.step_labels(), vec!["text: ok", "image: warn"]);
        assert_eq!(draft.diagnostics(), vec!["image: timeout".to_string()]);
        assert!(draft.step(StepName::Seo).is_none());
    }
}

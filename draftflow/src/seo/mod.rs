//! Context-aware SEO optimizer and validator.
//!
//! Behaviour depends on where the content came from:
//!
//! - [`ContentOrigin::Generated`]: the body is read-only. Only the meta
//!   title and description are synthesized or trimmed, and every finding is
//!   advisory.
//! - [`ContentOrigin::Human`]: canned openers are stripped, headings are
//!   rewritten to exactly one H1 with no level jumps, and findings are hard
//!   errors that block publication.

mod meta;
mod structure;
mod stuffing;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::core::{ContentOrigin, ContentResult, ContentStatus};
use crate::text::truncate_chars;

pub use meta::{
    build_meta_description, build_meta_title, natural_sentence, strip_title_suffix,
    truncate_at_word,
};
pub use structure::{heading_issues, normalize_headings, strip_canned_openers};
pub use stuffing::is_keyword_stuffed;

/// SEO settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoConfig {
    /// Appended to meta titles as `" | site"` when it fits.
    pub site_name: Option<String>,
    /// Shortest existing meta title worth keeping.
    pub meta_title_min: usize,
    /// Longest meta title.
    pub meta_title_max: usize,
    /// Longest meta description.
    pub meta_description_max: usize,
    /// Shortest paragraph usable as a meta description.
    pub min_paragraph_chars: usize,
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self {
            site_name: None,
            meta_title_min: 20,
            meta_title_max: 60,
            meta_description_max: 300,
            min_paragraph_chars: 50,
        }
    }
}

/// What an SEO finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeoIssueKind {
    /// No level-1 heading.
    MissingH1,
    /// More than one level-1 heading.
    MultipleH1,
    /// A heading skips a level.
    HeadingHierarchy,
    /// Meta title is empty.
    MissingMetaTitle,
    /// Meta title is over the limit.
    MetaTitleTooLong,
    /// Meta description is empty.
    MissingMetaDescription,
    /// Meta description is over the limit.
    MetaDescriptionTooLong,
    /// A meta field is keyword-stuffed.
    KeywordStuffing,
}

impl fmt::Display for SeoIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MissingH1 => "missing_h1",
            Self::MultipleH1 => "multiple_h1",
            Self::HeadingHierarchy => "heading_hierarchy",
            Self::MissingMetaTitle => "missing_meta_title",
            Self::MetaTitleTooLong => "meta_title_too_long",
            Self::MissingMetaDescription => "missing_meta_description",
            Self::MetaDescriptionTooLong => "meta_description_too_long",
            Self::KeywordStuffing => "keyword_stuffing",
        };
        f.write_str(name)
    }
}

/// One SEO finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoIssue {
    /// What kind of finding.
    pub kind: SeoIssueKind,
    /// Details.
    pub detail: String,
}

impl SeoIssue {
    /// Creates a finding.
    #[must_use]
    pub fn new(kind: SeoIssueKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for SeoIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

/// Whether findings block publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeoSeverity {
    /// Logged only.
    Advisory,
    /// Blocks publication.
    Hard,
}

impl fmt::Display for SeoSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Advisory => write!(f, "advisory"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

/// SEO findings for one piece of content.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("seo validation failed ({severity}): {}", join_issues(.issues))]
pub struct SeoError {
    /// Advisory or hard.
    pub severity: SeoSeverity,
    /// Every finding, in check order.
    pub issues: Vec<SeoIssue>,
}

fn join_issues(issues: &[SeoIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result of [`SeoOptimizer::optimize`].
#[derive(Debug, Clone)]
pub struct SeoOutcome {
    /// The optimized content.
    pub content: ContentResult,
    /// Findings, if any.
    pub error: Option<SeoError>,
}

impl SeoOutcome {
    /// Returns true if the findings block publication.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.error
            .as_ref()
            .is_some_and(|e| e.severity == SeoSeverity::Hard)
    }
}

/// SEO optimizer.
#[derive(Debug, Clone, Default)]
pub struct SeoOptimizer {
    config: SeoConfig,
}

impl SeoOptimizer {
    /// Creates an optimizer.
    #[must_use]
    pub fn new(config: SeoConfig) -> Self {
        Self { config }
    }

    /// Returns the settings.
    #[must_use]
    pub fn config(&self) -> &SeoConfig {
        &self.config
    }

    /// Optimizes `content` for its origin and reports what is still wrong.
    #[must_use]
    pub fn optimize(&self, mut content: ContentResult, origin: ContentOrigin) -> SeoOutcome {
        if origin.is_strict() {
            let body = strip_canned_openers(&content.body);
            content.body = normalize_headings(&body, &content.title);
        }

        content.meta_title = build_meta_title(&content.title, &content.meta_title, &self.config);
        content.meta_description =
            build_meta_description(&content.body, &content.meta_description, &self.config);
        self.fix_stuffed_meta(&mut content);
        content.status = ContentStatus::SeoOptimized;

        let issues = self.audit(&content, origin);
        let error = if issues.is_empty() {
            None
        } else {
            let severity = if origin.is_strict() {
                SeoSeverity::Hard
            } else {
                SeoSeverity::Advisory
            };
            for issue in &issues {
                tracing::warn!(severity = %severity, kind = %issue.kind, "{}", issue.detail);
            }
            Some(SeoError { severity, issues })
        };
        SeoOutcome { content, error }
    }

    /// Checks headings and meta fields without changing anything.
    #[must_use]
    pub fn audit(&self, content: &ContentResult, origin: ContentOrigin) -> Vec<SeoIssue> {
        let title_is_h1 = !origin.is_strict() && !content.title.trim().is_empty();
        let mut issues = heading_issues(&content.body, title_is_h1);

        let title_len = content.meta_title.chars().count();
        if title_len == 0 {
            issues.push(SeoIssue::new(SeoIssueKind::MissingMetaTitle, "meta title is empty"));
        } else if title_len > self.config.meta_title_max {
            issues.push(SeoIssue::new(
                SeoIssueKind::MetaTitleTooLong,
                format!("meta title has {title_len} characters, limit {}", self.config.meta_title_max),
            ));
        }

        let description_len = content.meta_description.chars().count();
        if description_len == 0 {
            issues.push(SeoIssue::new(
                SeoIssueKind::MissingMetaDescription,
                "meta description is empty",
            ));
        } else if description_len > self.config.meta_description_max {
            issues.push(SeoIssue::new(
                SeoIssueKind::MetaDescriptionTooLong,
                format!(
                    "meta description has {description_len} characters, limit {}",
                    self.config.meta_description_max
                ),
            ));
        }

        for (field, value) in [
            ("meta title", &content.meta_title),
            ("meta description", &content.meta_description),
        ] {
            if is_keyword_stuffed(value) {
                issues.push(SeoIssue::new(
                    SeoIssueKind::KeywordStuffing,
                    format!("{field} looks keyword-stuffed"),
                ));
            }
        }
        issues
    }

    // Second pass: replace stuffed meta fields with a sentence from the body.
    fn fix_stuffed_meta(&self, content: &mut ContentResult) {
        if !is_keyword_stuffed(&content.meta_description) && !is_keyword_stuffed(&content.meta_title) {
            return;
        }
        let Some(sentence) = natural_sentence(&content.body) else {
            tracing::debug!("No natural sentence available to replace stuffed meta fields");
            return;
        };
        if is_keyword_stuffed(&content.meta_description) {
            tracing::info!("Replacing keyword-stuffed meta description");
            content.meta_description = truncate_chars(&sentence, self.config.meta_description_max);
        }
        if is_keyword_stuffed(&content.meta_title) {
            tracing::info!("Replacing keyword-stuffed meta title");
            content.meta_title = truncate_at_word(&sentence, self.config.meta_title_max);
        }
    }
}

//! Error taxonomy: maps any failure to a kind and a retry verdict.
//!
//! Classification matches the lower-cased error chain against one ordered
//! table. Structure rows come first, then quality, then infrastructure;
//! anything unmatched is an AI error. The order decides retry eligibility,
//! so tests pin it down.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::rules::{compile_table, first_match, PatternRule};

/// The four failure families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The model failed to answer usefully.
    #[serde(rename = "AI_ERROR")]
    Ai,
    /// The request or the response was malformed.
    #[serde(rename = "STRUCTURE_ERROR")]
    Structure,
    /// The content broke a quality rule.
    #[serde(rename = "QUALITY_ERROR")]
    Quality,
    /// Network, quota or upstream outage.
    #[serde(rename = "INFRA_ERROR")]
    Infra,
}

impl ErrorKind {
    /// Returns true if another attempt could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Ai | Self::Infra)
    }

    /// Short explanation for operators.
    #[must_use]
    pub fn human_message(&self) -> &'static str {
        match self {
            Self::Ai => "the model failed to produce a usable answer",
            Self::Structure => "the request or response structure is invalid",
            Self::Quality => "the content violates a quality rule",
            Self::Infra => "an infrastructure dependency is unavailable",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ai => write!(f, "AI_ERROR"),
            Self::Structure => write!(f, "STRUCTURE_ERROR"),
            Self::Quality => write!(f, "QUALITY_ERROR"),
            Self::Infra => write!(f, "INFRA_ERROR"),
        }
    }
}

/// A failure together with its classification.
///
/// Only [`classify`] and [`classify_message`] build these.
#[derive(Debug)]
pub struct ClassifiedError {
    /// Failure family.
    pub kind: ErrorKind,
    /// Operator-facing explanation, including the matched rule.
    pub message: String,
    /// The original error.
    pub cause: anyhow::Error,
}

impl ClassifiedError {
    /// Returns true if the kind is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:#}", self.kind, self.cause)
    }
}

impl std::error::Error for ClassifiedError {}

static ERROR_TAXONOMY: LazyLock<Vec<PatternRule<ErrorKind>>> = LazyLock::new(|| {
    compile_table(&[
        // structure
        (ErrorKind::Structure, r"invalid request", "invalid request"),
        (ErrorKind::Structure, r"missing field", "missing field"),
        (ErrorKind::Structure, r"heading", "heading problem"),
        (ErrorKind::Structure, r"outline", "outline problem"),
        (ErrorKind::Structure, r"\bjson\b", "json failure"),
        (
            ErrorKind::Structure,
            r"\b(?:parse|parsing|unmarshal|deserialize)",
            "parse failure",
        ),
        // quality
        (ErrorKind::Quality, r"validation failed", "validation failure"),
        (ErrorKind::Quality, r"word[_ ]count", "word count"),
        (ErrorKind::Quality, r"\bcta\b|sales_cta", "call to action"),
        (
            ErrorKind::Quality,
            r"kata_terlarang|forbidden word|prohibited",
            "forbidden word",
        ),
        (ErrorKind::Quality, r"quality", "quality problem"),
        // infrastructure
        (
            ErrorKind::Infra,
            r"timeout|timed out|deadline exceeded",
            "timeout",
        ),
        (
            ErrorKind::Infra,
            r"connection (?:refused|reset|closed|aborted)|broken pipe",
            "connection failure",
        ),
        (ErrorKind::Infra, r"\b(?:5\d{2}|401|403|429)\b", "http status"),
        (
            ErrorKind::Infra,
            r"rate limit|too many requests",
            "rate limited",
        ),
        (
            ErrorKind::Infra,
            r"service unavailable|bad gateway|unauthorized|forbidden",
            "upstream rejected the call",
        ),
    ])
});

/// Classifies an error by its rendered cause chain.
#[must_use]
pub fn classify(err: anyhow::Error) -> ClassifiedError {
    let text = format!("{err:#}").to_lowercase();
    let (kind, rule) = match first_match(&ERROR_TAXONOMY, &text) {
        Some(hit) => (hit.tag(), hit.rule.message),
        None => (ErrorKind::Ai, "no pattern matched"),
    };
    tracing::debug!(kind = %kind, rule, "Classified error");
    ClassifiedError {
        kind,
        message: format!("{} ({rule})", kind.human_message()),
        cause: err,
    }
}

/// Classifies a bare message.
#[must_use]
pub fn classify_message(message: &str) -> ClassifiedError {
    classify(anyhow::anyhow!("{message}"))
}

/// Returns true if `err` would be classified as AI or INFRA.
#[must_use]
pub fn is_retryable(err: &anyhow::Error) -> bool {
    let text = format!("{err:#}").to_lowercase();
    first_match(&ERROR_TAXONOMY, &text).map_or(ErrorKind::Ai, |hit| hit.tag()).is_retryable()
}

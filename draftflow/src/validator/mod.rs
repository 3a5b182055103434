//! Rule-based structural and tonal validator.
//!
//! The validator is a pure judge: same input, same verdict, no I/O. Rules run
//! in a fixed order and the first failure wins:
//!
//! 1. word count (advisory unless `enforce_word_count`)
//! 2. sales call to action
//! 3. prohibited words
//! 4. brand mentions
//! 5. promotional tone and the exclamation cap
//! 6. placeholders, model self-references, level-2 heading count
//!
//! Heading alignment against an outline is a separate check,
//! [`Validator::validate_outline`].

mod outline;
mod rules;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::core::ContentResult;
use crate::errors::ContractViolation;
use crate::normalizer::count_exclamations;
use crate::rules::{first_match, PatternRule};
use crate::text::{count_headings, snippet_around, truncate_chars};

pub use outline::{heading_similarity, HEADING_MATCH_THRESHOLD, ORDER_MATCH_THRESHOLD};

/// Identifies the rule a piece of content broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleTag {
    /// Too few words to be worth grading.
    WordCount,
    /// Direct purchase or contact prompt.
    SalesCta,
    /// Denylisted certainty word.
    KataTerlarang,
    /// The owning brand is named.
    BrandMention,
    /// Superlatives, urgency, or too many exclamation marks.
    PromotionalTone,
    /// Placeholder or unfinished marker.
    StructuralPlaceholder,
    /// The model refers to itself.
    StructuralAiReference,
    /// Not enough level-2 headings.
    StructuralHeading,
    /// Body headings do not follow the outline.
    HeadingAlignment,
}

impl RuleTag {
    /// The tag as it appears in messages and logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WordCount => "WORD_COUNT",
            Self::SalesCta => "SALES_CTA",
            Self::KataTerlarang => "KATA_TERLARANG",
            Self::BrandMention => "BRAND_MENTION",
            Self::PromotionalTone => "PROMOTIONAL_TONE",
            Self::StructuralPlaceholder => "STRUCTURAL_PLACEHOLDER",
            Self::StructuralAiReference => "STRUCTURAL_AI_REFERENCE",
            Self::StructuralHeading => "STRUCTURAL_HEADING",
            Self::HeadingAlignment => "HEADING_ALIGNMENT",
        }
    }
}

impl fmt::Display for RuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A broken rule.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("validation failed [{rule}]: {message}")]
pub struct ValidationError {
    /// Which rule.
    pub rule: RuleTag,
    /// What was wrong.
    pub message: String,
    /// Surrounding text, about fifty characters.
    pub snippet: String,
}

impl ValidationError {
    /// Creates a validation error.
    #[must_use]
    pub fn new(rule: RuleTag, message: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
            snippet: snippet.into(),
        }
    }
}

/// Failure of [`Validator::validate_canonical`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidatorError {
    /// The content broke a rule.
    #[error(transparent)]
    Rule(#[from] ValidationError),
    /// The body was implausibly short on entry.
    #[error(transparent)]
    Contract(#[from] ContractViolation),
}

/// Validator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Title plus body words needed to be gradeable.
    pub min_word_count: usize,
    /// Fail on a low word count instead of logging a warning.
    pub enforce_word_count: bool,
    /// Body words below which the input is treated as lost content.
    pub min_body_words: usize,
    /// Exclamation marks allowed in the body.
    pub max_exclamations: usize,
    /// Level-2 headings required.
    pub min_h2: usize,
    /// Brand names and abbreviations that must not appear.
    pub brand_terms: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_word_count: 720,
            enforce_word_count: false,
            min_body_words: 200,
            max_exclamations: 3,
            min_h2: 2,
            brand_terms: Vec::new(),
        }
    }
}

/// Structural and tonal validator.
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidatorConfig,
    brand_patterns: Vec<Regex>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

impl Validator {
    /// Creates a validator, compiling the brand terms.
    #[must_use]
    pub fn new(config: ValidatorConfig) -> Self {
        let brand_patterns = config
            .brand_terms
            .iter()
            .map(|term| term.trim())
            .filter(|term| !term.is_empty())
            .filter_map(|term| {
                RegexBuilder::new(&format!(r"\b{}\b", regex::escape(term)))
                    .case_insensitive(true)
                    .build()
                    .map_err(|err| tracing::warn!(term, error = %err, "Ignoring brand term"))
                    .ok()
            })
            .collect();
        Self {
            config,
            brand_patterns,
        }
    }

    /// Returns the settings.
    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Runs every rule in order and returns the first failure.
    pub fn validate(&self, content: &ContentResult) -> Result<(), ValidationError> {
        if let Err(err) = self.check_word_count(content) {
            if self.config.enforce_word_count {
                return Err(err);
            }
            tracing::warn!(rule = %err.rule, "{}", err.message);
        }

        let text = format!("{}\n\n{}", content.title, content.body);
        check_table(&rules::SALES_CTA, &text)?;
        check_table(&rules::PROHIBITED, &text)?;
        self.check_brand(&text)?;
        check_table(&rules::PROMOTIONAL, &text)?;

        let exclamations = count_exclamations(&content.body);
        if exclamations > self.config.max_exclamations {
            let at = content.body.rfind('!').unwrap_or(0);
            return Err(ValidationError::new(
                RuleTag::PromotionalTone,
                format!(
                    "body has {exclamations} exclamation marks, at most {} allowed",
                    self.config.max_exclamations
                ),
                snippet_around(&content.body, at, at + 1),
            ));
        }

        check_table(&rules::STRUCTURAL, &text)?;

        let h2 = count_headings(&content.body, 2);
        if h2 < self.config.min_h2 {
            return Err(ValidationError::new(
                RuleTag::StructuralHeading,
                format!(
                    "body has {h2} level-2 headings, at least {} required",
                    self.config.min_h2
                ),
                truncate_chars(content.body.trim(), 50),
            ));
        }
        Ok(())
    }

    /// Checks the entry invariant, then runs [`validate`](Self::validate).
    ///
    /// A body under `min_body_words` means an earlier stage lost content, so
    /// it is reported as a [`ContractViolation`], not as bad content.
    pub fn validate_canonical(&self, content: &ContentResult) -> Result<(), ValidatorError> {
        let words = content.body_word_count();
        if words < self.config.min_body_words {
            tracing::error!(
                words,
                minimum = self.config.min_body_words,
                "Validator received an implausibly short body"
            );
            return Err(ContractViolation::new(
                "validator",
                format!(
                    "body has {words} words on entry, expected at least {}",
                    self.config.min_body_words
                ),
            )
            .into());
        }
        self.validate(content)?;
        Ok(())
    }

    /// The word-count rule on its own, regardless of enforcement.
    pub fn check_word_count(&self, content: &ContentResult) -> Result<(), ValidationError> {
        let words = content.total_word_count();
        if words < self.config.min_word_count {
            return Err(ValidationError::new(
                RuleTag::WordCount,
                format!(
                    "content has {words} words, at least {} required",
                    self.config.min_word_count
                ),
                truncate_chars(content.body.trim(), 50),
            ));
        }
        Ok(())
    }

    /// Checks the body's headings against an outline.
    ///
    /// An outline without level-2/level-3 headings always passes.
    pub fn validate_outline(&self, outline: &str, body: &str) -> Result<(), ValidationError> {
        outline::check_alignment(outline, body).map_err(|misalignment| {
            let snippet = misalignment
                .subject()
                .map_or_else(|| truncate_chars(outline.trim(), 50), str::to_string);
            ValidationError::new(RuleTag::HeadingAlignment, misalignment.describe(), snippet)
        })
    }

    fn check_brand(&self, text: &str) -> Result<(), ValidationError> {
        match self.brand_patterns.iter().find_map(|p| p.find(text)) {
            Some(found) => Err(ValidationError::new(
                RuleTag::BrandMention,
                format!("brand name '{}' must not appear", found.as_str()),
                snippet_around(text, found.start(), found.end()),
            )),
            None => Ok(()),
        }
    }
}

fn check_table(table: &[PatternRule<RuleTag>], text: &str) -> Result<(), ValidationError> {
    match first_match(table, text) {
        Some(hit) => Err(ValidationError::new(
            hit.tag(),
            format!("{}: '{}'", hit.rule.message, hit.found.as_str()),
            snippet_around(text, hit.found.start(), hit.found.end()),
        )),
        None => Ok(()),
    }
}

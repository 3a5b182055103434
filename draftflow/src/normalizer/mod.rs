//! Deterministic tone and punctuation normalizer.
//!
//! `normalize` is pure and total: it never fails and never calls out. The
//! body gets the full treatment, the title and meta fields a lighter one
//! (exclamation cap, word replacements, whitespace).

mod lexicon;

use regex::Captures;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::core::{ContentResult, ContentStatus};
use crate::rules::{compile_table, PatternRule};
use crate::text::{capitalize_first, collapse_whitespace};

use lexicon::{CLAIM_SOFTENERS, INTENSIFIERS, PHRASE_DELETIONS, WORD_REPLACEMENTS};

static SPACE_BEFORE_PUNCTUATION: LazyLock<Vec<PatternRule<&'static str>>> =
    LazyLock::new(|| compile_table(&[("$1", r"[ \t]+([,.;:?!])", "space before punctuation")]));

/// Normalizer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Exclamation marks kept; later ones become periods.
    pub max_exclamations: usize,
    /// Shrinkage (in characters) above which a warning is logged.
    pub shrink_warn_chars: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_exclamations: 3,
            shrink_warn_chars: 100,
        }
    }
}

/// Tone and punctuation normalizer.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    /// Creates a normalizer with the given settings.
    #[must_use]
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Returns the settings.
    #[must_use]
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalizes every text field and tags the result `Normalized`.
    #[must_use]
    pub fn normalize(&self, content: ContentResult) -> ContentResult {
        let before = content.body.chars().count();
        let body = self.normalize_body(&content.body);
        let after = body.chars().count();
        if before.saturating_sub(after) > self.config.shrink_warn_chars {
            tracing::warn!(
                before,
                after,
                "Normalization shrank the body more than expected"
            );
        }

        ContentResult {
            title: self.normalize_line(&content.title),
            body,
            meta_title: self.normalize_line(&content.meta_title),
            meta_description: self.normalize_line(&content.meta_description),
            status: ContentStatus::Normalized,
        }
    }

    /// Full body treatment.
    #[must_use]
    pub fn normalize_body(&self, body: &str) -> String {
        let text = apply_case_preserving(body, &WORD_REPLACEMENTS);
        let text = apply_table(&text, &PHRASE_DELETIONS);
        let text = apply_table(&text, &CLAIM_SOFTENERS);
        let text = apply_table(&text, &INTENSIFIERS);
        // Last rewrite, so deletions cannot drop a kept `!`.
        let text = cap_exclamations(&text, self.config.max_exclamations);
        tidy_whitespace(&text)
    }

    /// Light treatment for single-line fields.
    #[must_use]
    pub fn normalize_line(&self, line: &str) -> String {
        let text = cap_exclamations(line, self.config.max_exclamations);
        let text = apply_case_preserving(&text, &WORD_REPLACEMENTS);
        collapse_whitespace(&text)
    }
}

/// Rewrites every `!` after the first `max` into a period.
///
/// Image markup (`![`) is neither counted nor rewritten. The output has the
/// same length as the input.
#[must_use]
pub fn cap_exclamations(text: &str, max: usize) -> String {
    let mut seen = 0;
    let mut chars = text.chars().peekable();
    let mut out = String::with_capacity(text.len());
    while let Some(c) = chars.next() {
        if c == '!' && chars.peek() != Some(&'[') {
            seen += 1;
            out.push(if seen > max { '.' } else { '!' });
        } else {
            out.push(c);
        }
    }
    out
}

/// Counts `!` outside image markup.
#[must_use]
pub fn count_exclamations(text: &str) -> usize {
    let mut chars = text.chars().peekable();
    let mut count = 0;
    while let Some(c) = chars.next() {
        if c == '!' && chars.peek() != Some(&'[') {
            count += 1;
        }
    }
    count
}

/// Collapses whitespace and punctuation runs, line by line.
///
/// Spaces before `, . ; : ? !` are dropped, runs of three or more identical
/// `. , ; : ?` become one, and blank lines are squeezed to at most one. `!` is
/// left alone so the exclamation cap stays exact.
#[must_use]
pub fn tidy_whitespace(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.lines() {
        let indent_len = raw.len() - raw.trim_start().len();
        let (indent, rest) = raw.split_at(indent_len);
        let rest = rest.split([' ', '\t']).filter(|w| !w.is_empty()).collect::<Vec<_>>().join(" ");
        let rest = apply_table(&rest, &SPACE_BEFORE_PUNCTUATION);
        let rest = collapse_punctuation_runs(&rest);

        if rest.is_empty() {
            if lines.last().is_some_and(String::is_empty) || lines.is_empty() {
                continue;
            }
            lines.push(String::new());
        } else {
            lines.push(format!("{indent}{rest}"));
        }
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines.join("\n")
}

fn collapse_punctuation_runs(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }
        if run >= 3 && matches!(c, '.' | ',' | ';' | ':' | '?') {
            out.push(c);
        } else {
            out.extend(std::iter::repeat(c).take(run));
        }
        i += run;
    }
    out
}

fn apply_table(text: &str, table: &[PatternRule<&'static str>]) -> String {
    table.iter().fold(text.to_string(), |acc, rule| {
        rule.pattern.replace_all(&acc, rule.tag).into_owned()
    })
}

fn apply_case_preserving(text: &str, table: &[PatternRule<&'static str>]) -> String {
    table.iter().fold(text.to_string(), |acc, rule| {
        rule.pattern
            .replace_all(&acc, |caps: &Captures<'_>| {
                if caps[0].chars().next().is_some_and(char::is_uppercase) {
                    capitalize_first(rule.tag)
                } else {
                    rule.tag.to_string()
                }
            })
            .into_owned()
    })
}

//! Meta title and meta description synthesis.

use std::sync::LazyLock;

use super::stuffing::is_keyword_stuffed;
use super::SeoConfig;
use crate::rules::{compile_table, PatternRule};
use crate::text::{collapse_whitespace, is_structural_block, paragraphs, strip_markdown, truncate_chars};

const ELLIPSIS: &str = "...";
/// Shortest sentence accepted as a replacement for a stuffed meta field.
const NATURAL_SENTENCE_MIN_CHARS: usize = 40;

// "Cara Merawat Monstera: Tips untuk Pemula" -> "Cara Merawat Monstera"
static TITLE_SUFFIXES: LazyLock<Vec<PatternRule<&'static str>>> = LazyLock::new(|| {
    compile_table(&[
        (
            "",
            r"(?i)\s*[:|\-–—]\s*(?:cara|tips|guide|panduan|tutorial)\b.*$",
            "trailing how-to suffix",
        ),
        (
            "",
            r"(?i)\s*\((?:cara|tips|guide|panduan|tutorial)[^)]*\)\s*$",
            "parenthesised suffix",
        ),
        ("", r"(?i)\s+(?:tips|guide)\s*$", "bare suffix"),
    ])
});

/// Builds a meta title of at most `config.meta_title_max` characters.
///
/// A usable existing meta title (within bounds, not stuffed) is kept.
/// Otherwise the title is stripped of how-to suffixes, given the site-name
/// suffix when it fits, and truncated at a word boundary with an ellipsis.
#[must_use]
pub fn build_meta_title(title: &str, existing: &str, config: &SeoConfig) -> String {
    let existing = collapse_whitespace(existing);
    let length = existing.chars().count();
    if (config.meta_title_min..=config.meta_title_max).contains(&length)
        && !is_keyword_stuffed(&existing)
    {
        return existing;
    }

    let base = strip_title_suffix(&collapse_whitespace(title));
    if base.is_empty() {
        return String::new();
    }
    if let Some(site) = config.site_name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let with_site = format!("{base} | {site}");
        if with_site.chars().count() <= config.meta_title_max {
            return with_site;
        }
    }
    truncate_at_word(&base, config.meta_title_max)
}

/// Removes trailing "cara/tips/guide"-style suffixes, unless that would
/// leave nothing.
#[must_use]
pub fn strip_title_suffix(title: &str) -> String {
    let stripped = TITLE_SUFFIXES.iter().fold(title.to_string(), |text, rule| {
        rule.pattern.replace(&text, rule.tag).into_owned()
    });
    let stripped = stripped.trim();
    if stripped.is_empty() {
        title.trim().to_string()
    } else {
        stripped.to_string()
    }
}

/// Shortens `text` to at most `max` characters without splitting a word,
/// appending `...` when something was cut.
///
/// A single word longer than the budget is cut hard.
#[must_use]
pub fn truncate_at_word(text: &str, max: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max {
        return text.to_string();
    }
    let budget = max.saturating_sub(ELLIPSIS.len());
    let mut cut = budget;
    if chars.get(budget).is_some_and(|c| !c.is_whitespace()) {
        if let Some(space) = chars[..budget].iter().rposition(|c| c.is_whitespace()) {
            cut = space;
        }
    }
    let head: String = chars[..cut].iter().collect();
    let head = head
        .trim_end()
        .trim_end_matches([',', ';', ':', '-', '|', '.'])
        .trim_end();
    format!("{head}{ELLIPSIS}")
}

/// Builds a meta description of at most `config.meta_description_max`
/// characters.
///
/// A usable existing description is kept. Otherwise the first prose
/// paragraph of at least `config.min_paragraph_chars` characters is used,
/// cut to the limit; a long paragraph is trimmed, never rejected.
#[must_use]
pub fn build_meta_description(body: &str, existing: &str, config: &SeoConfig) -> String {
    let existing = collapse_whitespace(existing);
    let length = existing.chars().count();
    if length >= config.min_paragraph_chars
        && length <= config.meta_description_max
        && !is_keyword_stuffed(&existing)
    {
        return existing;
    }

    let candidate = paragraphs(body)
        .into_iter()
        .filter(|block| !is_structural_block(block))
        .map(|block| collapse_whitespace(&strip_markdown(&block)))
        .find(|text| text.chars().count() >= config.min_paragraph_chars);

    match candidate {
        Some(text) => truncate_chars(&text, config.meta_description_max),
        None => truncate_chars(&existing, config.meta_description_max),
    }
}

/// First sentence of the body that is long enough and not stuffed.
#[must_use]
pub fn natural_sentence(body: &str) -> Option<String> {
    paragraphs(body)
        .into_iter()
        .filter(|block| !is_structural_block(block))
        .map(|block| collapse_whitespace(&strip_markdown(&block)))
        .flat_map(|text| split_sentences(&text))
        .find(|sentence| {
            sentence.chars().count() >= NATURAL_SENTENCE_MIN_CHARS && !is_keyword_stuffed(sentence)
        })
}

fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().map_or(true, |next| next.is_whitespace()) {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }
    let rest = current.trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }
    sentences
}

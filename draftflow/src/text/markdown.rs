//! Markdown inspection helpers shared by the guardrails.

use std::sync::LazyLock;

use crate::rules::{compile_table, PatternRule};

/// A heading found in a markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading level (1 for `#`, 2 for `##`, ...).
    pub level: u8,
    /// Heading text without the leading hashes.
    pub text: String,
    /// Zero-based line index in the source document.
    pub line: usize,
}

// Rewrites applied in order to turn markdown into plain prose.
static MARKDOWN_STRIP: LazyLock<Vec<PatternRule<&'static str>>> = LazyLock::new(|| {
    compile_table(&[
        ("", r"!\[[^\]]*\]\([^)]*\)", "image"),
        ("$1", r"\[([^\]]*)\]\([^)]*\)", "link"),
        ("", r"<[^>\n]+>", "html tag"),
        ("", r"(?m)^[ \t]{0,3}#{1,6}[ \t]+", "heading marker"),
        ("", r"(?m)^[ \t]*>[ \t]?", "blockquote marker"),
        ("", r"(?m)^[ \t]*(?:[-+*]|\d+[.)])[ \t]+", "list marker"),
        ("", r"(?m)^[ \t]*```.*$", "code fence"),
        ("", r"[*`~]+", "emphasis"),
    ])
});

/// Parses a single line as an ATX heading.
///
/// Returns `None` for `#hashtag`-style text and for empty headings.
#[must_use]
pub fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let trimmed = line.trim_start();
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &trimmed[hashes..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    let text = rest.trim().trim_end_matches('#').trim();
    if text.is_empty() {
        return None;
    }
    // `hashes` is at most 6 here.
    Some((u8::try_from(hashes).unwrap_or(6), text))
}

/// Extracts every heading in document order, ignoring fenced code blocks.
#[must_use]
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    let mut in_fence = false;
    markdown
        .lines()
        .enumerate()
        .filter_map(|(line, raw)| {
            if raw.trim_start().starts_with("```") {
                in_fence = !in_fence;
                return None;
            }
            if in_fence {
                return None;
            }
            parse_heading(raw).map(|(level, text)| Heading {
                level,
                text: text.to_string(),
                line,
            })
        })
        .collect()
}

/// Extracts the level-2 and level-3 headings in document order.
#[must_use]
pub fn section_headings(markdown: &str) -> Vec<Heading> {
    extract_headings(markdown)
        .into_iter()
        .filter(|h| h.level == 2 || h.level == 3)
        .collect()
}

/// Counts headings of exactly `level`.
#[must_use]
pub fn count_headings(markdown: &str, level: u8) -> usize {
    extract_headings(markdown)
        .iter()
        .filter(|h| h.level == level)
        .count()
}

/// Removes markdown syntax, keeping the readable text.
#[must_use]
pub fn strip_markdown(markdown: &str) -> String {
    MARKDOWN_STRIP
        .iter()
        .fold(markdown.to_string(), |text, rule| {
            rule.pattern.replace_all(&text, rule.tag).into_owned()
        })
}

/// Counts words after stripping markdown. A word must contain a letter.
#[must_use]
pub fn count_words(markdown: &str) -> usize {
    strip_markdown(markdown)
        .split_whitespace()
        .filter(|w| w.chars().any(char::is_alphabetic))
        .count()
}

/// Splits a document into blank-line separated blocks, trimmed.
#[must_use]
pub fn paragraphs(markdown: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in markdown.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim());
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }
    blocks
}

/// Returns true for blocks that are not running prose (headings, images,
/// tables, code, rules).
#[must_use]
pub fn is_structural_block(block: &str) -> bool {
    let first = block.lines().next().unwrap_or_default().trim_start();
    parse_heading(first).is_some()
        || first.starts_with("![")
        || first.starts_with('|')
        || first.starts_with("```")
        || first.starts_with("---")
        || first.starts_with("***")
}

/// Lower-cased alphanumeric tokens of `text`.
#[must_use]
pub fn word_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collapses every whitespace run to one space and trims the ends.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns roughly fifty characters of context around a byte range.
///
/// `start..end` must lie on char boundaries, which regex matches do.
#[must_use]
pub fn snippet_around(text: &str, start: usize, end: usize) -> String {
    const CONTEXT: usize = 20;
    let start = start.min(text.len());
    let end = end.clamp(start, text.len());
    let mut before: Vec<char> = text[..start].chars().rev().take(CONTEXT).collect();
    before.reverse();
    let matched: String = text[start..end].chars().take(CONTEXT).collect();
    let after: String = text[end..].chars().take(CONTEXT).collect();
    let raw: String = before.into_iter().collect::<String>() + &matched + &after;
    collapse_whitespace(&raw)
}

/// Truncates to at most `max` characters.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Upper-cases the first character.
#[must_use]
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_heading() {
        assert_eq!(parse_heading("## Media Tanam"), Some((2, "Media Tanam")));
        assert_eq!(parse_heading("# Judul #"), Some((1, "Judul")));
        assert_eq!(parse_heading("#hashtag"), None);
        assert_eq!(parse_heading("##"), None);
        assert_eq!(parse_heading("    ## code"), None);
        assert_eq!(parse_heading("plain"), None);
    }

    #[test]
    fn test_extract_headings_skips_code_fences() {
        let doc = "# A\n```\n## not a heading\n```\n## B\n### C";
        let headings = extract_headings(doc);
        let levels: Vec<u8> = headings.iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![1, 2, 3]);
        assert_eq!(headings[1].text, "B");
        assert_eq!(headings[1].line, 4);
    }

    #[test]
    fn test_section_headings_filters_levels() {
        let doc = "# Title\n## One\n#### Deep\n### Two";
        let texts: Vec<String> = section_headings(doc).into_iter().map(|h| h.text).collect();
        assert_eq!(texts, vec!["One".to_string(), "Two".to_string()]);
    }

    #[test]
    fn test_strip_markdown() {
        let doc = "## Judul\n**Tebal** dan [tautan](http://x.y) ![gambar](/a.png)\n- butir";
        let plain = strip_markdown(doc);
        assert!(plain.contains("Judul"));
        assert!(plain.contains("Tebal dan tautan"));
        assert!(!plain.contains("gambar"));
        assert!(!plain.contains('#'));
        assert!(plain.contains("butir"));
    }

    #[test]
    fn test_count_words_requires_letters() {
        assert_eq!(count_words("## Dua Kata\n123 456 -- abc1"), 3);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_paragraphs() {
        let doc = "satu\nbaris\n\n\n## dua\n\ntiga  ";
        assert_eq!(paragraphs(doc), vec!["satu\nbaris", "## dua", "tiga"]);
    }

    #[test]
    fn test_snippet_around_is_short() {
        let text = "a".repeat(100) + " target " + &"b".repeat(100);
        let start = text.find("target").unwrap();
        let snippet = snippet_around(&text, start, start + 6);
        assert!(snippet.contains("target"));
        assert!(snippet.chars().count() <= 60);
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("umumnya"), "Umumnya");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_structural_blocks() {
        assert!(is_structural_block("## Heading"));
        assert!(is_structural_block("![alt](/images/a.png)"));
        assert!(!is_structural_block("Paragraf biasa."));
    }
}

//! Heading structure checks and the body rewrites applied to human content.

use std::sync::LazyLock;

use super::{SeoIssue, SeoIssueKind};
use crate::rules::{compile_table, PatternRule};
use crate::text::{capitalize_first, extract_headings, parse_heading};

// Stock openers that make an article read as generated.
static CANNED_OPENERS: LazyLock<Vec<PatternRule<&'static str>>> = LazyLock::new(|| {
    compile_table(&[
        (
            "",
            r"(?i)^di era (?:digital|modern|serba cepat)(?: seperti)?(?: (?:sekarang|saat) ini)?,?\s*",
            "era opener",
        ),
        (
            "",
            r"(?i)^(?:dalam|pada) artikel ini,?\s*(?:kita|kami|saya) akan (?:membahas|mengulas)[^.\n]*\.\s*",
            "article announcement",
        ),
        ("", r"(?i)^artikel ini akan (?:membahas|mengulas)[^.\n]*\.\s*", "article announcement"),
        ("", r"(?i)^tahukah (?:anda|kamu)[^?\n]*\?\s*", "rhetorical opener"),
        ("", r"(?i)^mari kita (?:bahas|simak|mulai)[^.\n]*\.\s*", "invitation opener"),
        ("", r"(?i)^in today's (?:digital |fast-paced )?world,?\s*", "era opener"),
    ])
});

/// Removes canned openers from the start of each line, recapitalising what
/// remains. Lines that become empty are dropped.
#[must_use]
pub fn strip_canned_openers(body: &str) -> String {
    let mut lines = Vec::new();
    for line in body.lines() {
        let stripped = CANNED_OPENERS.iter().fold(line.to_string(), |text, rule| {
            rule.pattern.replace(&text, rule.tag).into_owned()
        });
        if stripped == line {
            lines.push(stripped);
        } else if !stripped.trim().is_empty() {
            lines.push(capitalize_first(stripped.trim_start()));
        }
    }
    lines.join("\n")
}

/// Rewrites headings so the body has exactly one H1 equal to `title` and no
/// level jumps.
///
/// Existing H1s are dropped if they repeat the title and demoted to H2
/// otherwise. Any heading deeper than one level below its predecessor is
/// raised. With an empty title no H1 is added.
#[must_use]
pub fn normalize_headings(body: &str, title: &str) -> String {
    let title = title.trim();
    let mut lines: Vec<String> = Vec::new();
    let mut previous = 1u8;
    let mut in_fence = false;

    for line in body.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }
        let heading = if in_fence { None } else { parse_heading(line) };
        let Some((level, text)) = heading else {
            lines.push(line.to_string());
            continue;
        };

        let level = if level == 1 {
            if text.eq_ignore_ascii_case(title) {
                continue;
            }
            2
        } else {
            level
        };
        let level = level.min(previous + 1);
        previous = level;
        lines.push(format!("{} {text}", "#".repeat(usize::from(level))));
    }

    let body = lines.join("\n");
    let body = body.trim_start_matches('\n');
    if title.is_empty() {
        body.to_string()
    } else {
        format!("# {title}\n\n{body}")
    }
}

/// H1 and hierarchy issues.
///
/// When `title_is_h1` is true the page title renders as the H1, so a body
/// without one is fine; a body with more than one is not.
#[must_use]
pub fn heading_issues(body: &str, title_is_h1: bool) -> Vec<SeoIssue> {
    let headings = extract_headings(body);
    let mut issues = Vec::new();

    let h1 = headings.iter().filter(|h| h.level == 1).count();
    if h1 > 1 {
        issues.push(SeoIssue::new(
            SeoIssueKind::MultipleH1,
            format!("{h1} level-1 headings"),
        ));
    } else if h1 == 0 && !title_is_h1 {
        issues.push(SeoIssue::new(SeoIssueKind::MissingH1, "no level-1 heading"));
    }

    let mut previous = 1u8;
    for heading in &headings {
        if heading.level > previous + 1 {
            issues.push(SeoIssue::new(
                SeoIssueKind::HeadingHierarchy,
                format!(
                    "'{}' jumps from level {previous} to level {}",
                    heading.text, heading.level
                ),
            ));
            break;
        }
        previous = heading.level;
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_openers_table_compiles() {
        assert_eq!(CANNED_OPENERS.len(), 6);
    }

    #[test]
    fn test_strip_canned_openers() {
        let body = "Di era digital saat ini, tanaman hias makin populer.\n\nDalam artikel ini, kita akan membahas monstera.\n\n## Media";
        assert_eq!(
            strip_canned_openers(body),
            "Tanaman hias makin populer.\n\n\n## Media"
        );
    }

    #[test]
    fn test_normalize_headings_inserts_single_h1() {
        let body = "# Merawat Monstera\n\nPembuka.\n\n# Media Tanam\n\n#### Campuran\n\n## Penyiraman";
        assert_eq!(
            normalize_headings(body, "Merawat Monstera"),
            "# Merawat Monstera\n\nPembuka.\n\n## Media Tanam\n\n### Campuran\n\n## Penyiraman"
        );
    }

    #[test]
    fn test_normalize_headings_ignores_code() {
        let body = "```\n# komentar\n```";
        assert_eq!(normalize_headings(body, "Judul"), "# Judul\n\n```\n# komentar\n```");
    }

    #[test]
    fn test_heading_issues() {
        assert!(heading_issues("## A\n### B\n## C", true).is_empty());

        let issues = heading_issues("## A\n#### B", true);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, SeoIssueKind::HeadingHierarchy);

        let issues = heading_issues("## A", false);
        assert_eq!(issues[0].kind, SeoIssueKind::MissingH1);

        let issues = heading_issues("# A\n# B", true);
        assert_eq!(issues[0].kind, SeoIssueKind::MultipleH1);
    }
}

//! Outline-aware heading alignment.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::rules::{compile_table, PatternRule};
use crate::text::{section_headings, word_tokens, Heading};

/// Minimum similarity for an outline heading to count as covered.
pub const HEADING_MATCH_THRESHOLD: f64 = 0.7;
/// Minimum similarity for a positional pair in the ordering check.
pub const ORDER_MATCH_THRESHOLD: f64 = 0.6;
/// Positional pairs inspected by the ordering check.
const ORDER_WINDOW: usize = 3;

static LEADING_NUMBERING: LazyLock<Vec<PatternRule<&'static str>>> = LazyLock::new(|| {
    compile_table(&[(
        "",
        r"(?i)^\s*(?:\d+(?:\.\d+)*|[ivx]+)[.):]\s*",
        "heading numbering",
    )])
});

/// Why an outline and a body do not line up.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Misalignment {
    /// The body has fewer level-2 headings than the outline.
    TooFewSections { body: usize, outline: usize },
    /// An outline heading has no similar body heading.
    Unmatched { heading: String, best: f64 },
    /// The leading sections appear in a different order.
    OrderDiffers { matched: usize, inspected: usize },
}

impl Misalignment {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::TooFewSections { body, outline } => format!(
                "body has {body} level-2 headings but the outline expects {outline}"
            ),
            Self::Unmatched { heading, best } => format!(
                "outline heading '{heading}' has no matching body heading (best similarity {best:.2})"
            ),
            Self::OrderDiffers { matched, inspected } => format!(
                "only {matched} of the first {inspected} headings follow the outline order"
            ),
        }
    }

    pub(crate) fn subject(&self) -> Option<&str> {
        match self {
            Self::Unmatched { heading, .. } => Some(heading),
            _ => None,
        }
    }
}

/// Word-overlap similarity of two headings: shared words divided by the
/// larger word count. Leading numbering ("2.", "III)") is ignored.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn heading_similarity(a: &str, b: &str) -> f64 {
    let a = heading_words(a);
    let b = heading_words(b);
    let larger = a.len().max(b.len());
    if larger == 0 {
        return 0.0;
    }
    let shared = a.intersection(&b).count();
    shared as f64 / larger as f64
}

fn heading_words(heading: &str) -> HashSet<String> {
    let stripped = LEADING_NUMBERING
        .iter()
        .fold(heading.to_string(), |text, rule| {
            rule.pattern.replace(&text, rule.tag).into_owned()
        });
    word_tokens(&stripped).into_iter().collect()
}

/// Checks `body` against the level-2/level-3 headings of `outline`.
pub(crate) fn check_alignment(outline: &str, body: &str) -> Result<(), Misalignment> {
    let expected = section_headings(outline);
    if expected.is_empty() {
        return Ok(());
    }
    let actual = section_headings(body);

    let outline_h2 = count_level(&expected, 2);
    let body_h2 = count_level(&actual, 2);
    if body_h2 < outline_h2 {
        return Err(Misalignment::TooFewSections {
            body: body_h2,
            outline: outline_h2,
        });
    }

    for heading in &expected {
        let best = actual
            .iter()
            .map(|h| heading_similarity(&heading.text, &h.text))
            .fold(0.0_f64, f64::max);
        if best < HEADING_MATCH_THRESHOLD {
            return Err(Misalignment::Unmatched {
                heading: heading.text.clone(),
                best,
            });
        }
    }

    let difference = expected.len().abs_diff(actual.len());
    if difference * 3 > expected.len() {
        tracing::debug!(
            outline = expected.len(),
            body = actual.len(),
            "Heading counts diverge; skipping order check"
        );
        return Ok(());
    }

    let inspected = ORDER_WINDOW.min(expected.len()).min(actual.len());
    let matched = expected
        .iter()
        .zip(&actual)
        .take(inspected)
        .filter(|(e, a)| heading_similarity(&e.text, &a.text) >= ORDER_MATCH_THRESHOLD)
        .count();
    if matched * 2 < inspected {
        return Err(Misalignment::OrderDiffers { matched, inspected });
    }
    Ok(())
}

fn count_level(headings: &[Heading], level: u8) -> usize {
    headings.iter().filter(|h| h.level == level).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTLINE: &str = "## Memilih Media Tanam\n## Jadwal Penyiraman\n### Penyiraman Musim Kemarau\n## Mengatasi Hama";

    #[test]
    fn test_similarity() {
        assert!((heading_similarity("Memilih Media Tanam", "memilih media tanam") - 1.0).abs() < f64::EPSILON);
        assert!((heading_similarity("1. Jadwal Penyiraman", "Jadwal Penyiraman") - 1.0).abs() < f64::EPSILON);
        let partial = heading_similarity("Jadwal Penyiraman Harian", "Jadwal Penyiraman");
        assert!((partial - 2.0 / 3.0).abs() < 1e-9);
        assert!(heading_similarity("", "") < f64::EPSILON);
    }

    #[test]
    fn test_aligned_body_passes() {
        let body = "## Memilih Media Tanam\nteks\n## Jadwal Penyiraman\n### Penyiraman Musim Kemarau\n## Mengatasi Hama\nteks";
        assert_eq!(check_alignment(OUTLINE, body), Ok(()));
    }

    #[test]
    fn test_empty_outline_passes() {
        assert_eq!(check_alignment("  ", "## Apa saja"), Ok(()));
    }

    #[test]
    fn test_too_few_sections() {
        let body = "## Memilih Media Tanam\n## Jadwal Penyiraman";
        assert_eq!(
            check_alignment(OUTLINE, body),
            Err(Misalignment::TooFewSections { body: 2, outline: 3 })
        );
    }

    #[test]
    fn test_unmatched_heading() {
        let body = "## Memilih Media Tanam\n## Jadwal Penyiraman\n### Penyiraman Musim Kemarau\n## Sejarah Tanaman Hias";
        let err = check_alignment(OUTLINE, body).unwrap_err();
        assert_eq!(err.subject(), Some("Mengatasi Hama"));
    }

    #[test]
    fn test_order_differs() {
        let outline = "## Memilih Media Tanam\n## Jadwal Penyiraman\n## Mengatasi Hama";
        let body = "## Mengatasi Hama\n## Jadwal Penyiraman\n## Memilih Media Tanam";
        let err = check_alignment(outline, body).unwrap_err();
        assert_eq!(err, Misalignment::OrderDiffers { matched: 1, inspected: 3 });
    }

    #[test]
    fn test_order_check_skipped_when_counts_diverge() {
        let outline = "## Memilih Media Tanam\n## Mengatasi Hama";
        let body = "## Pengantar\n## Sejarah\n## Mengatasi Hama\n## Memilih Media Tanam";
        assert_eq!(check_alignment(outline, body), Ok(()));
    }
}

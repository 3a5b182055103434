//! Ordered pattern tables and the single matcher that evaluates them.
//!
//! Every text rule in the crate (error taxonomy, call-to-action and
//! prohibited-word detection, template phrases, lexicon rewrites) is a row
//! in one of these tables. Tables are evaluated in declaration order and the
//! first matching row wins, so precedence is data rather than control flow.

use regex::{Match, Regex};

/// One row of a rule table.
#[derive(Debug, Clone)]
pub struct PatternRule<T> {
    /// What the row stands for (a rule tag, an error kind, a replacement).
    pub tag: T,
    /// Compiled pattern.
    pub pattern: Regex,
    /// Human readable explanation used in diagnostics.
    pub message: &'static str,
}

/// A successful match of a rule against some text.
#[derive(Debug, Clone, Copy)]
pub struct RuleHit<'r, 't, T> {
    /// The row that matched.
    pub rule: &'r PatternRule<T>,
    /// Location of the match in the inspected text.
    pub found: Match<'t>,
}

impl<T: Copy> RuleHit<'_, '_, T> {
    /// Returns the tag of the matching row.
    #[must_use]
    pub fn tag(&self) -> T {
        self.rule.tag
    }
}

/// Compiles a static table of `(tag, pattern, message)` rows.
///
/// Rows whose pattern fails to compile are logged and dropped; table tests
/// compare the compiled length against the row count to catch that.
#[must_use]
pub fn compile_table<T: Copy>(rows: &[(T, &'static str, &'static str)]) -> Vec<PatternRule<T>> {
    rows.iter()
        .filter_map(|&(tag, pattern, message)| match Regex::new(pattern) {
            Ok(pattern) => Some(PatternRule { tag, pattern, message }),
            Err(err) => {
                tracing::error!(pattern, error = %err, "Dropping rule with invalid pattern");
                None
            }
        })
        .collect()
}

/// Returns the first row (in table order) whose pattern matches `text`.
#[must_use]
pub fn first_match<'r, 't, T>(rules: &'r [PatternRule<T>], text: &'t str) -> Option<RuleHit<'r, 't, T>> {
    rules
        .iter()
        .find_map(|rule| rule.pattern.find(text).map(|found| RuleHit { rule, found }))
}

/// Counts how many distinct rows match `text` at least once.
#[must_use]
pub fn count_matching<T>(rules: &[PatternRule<T>], text: &str) -> usize {
    rules.iter().filter(|rule| rule.pattern.is_match(text)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Tag {
        First,
        Second,
    }

    #[test]
    fn test_first_match_uses_table_order_not_text_order() {
        let table = compile_table(&[
            (Tag::First, r"world", "first"),
            (Tag::Second, r"hello", "second"),
        ]);

        let hit = first_match(&table, "hello world").unwrap();
        assert_eq!(hit.tag(), Tag::First);
        assert_eq!(hit.found.as_str(), "world");
    }

    #[test]
    fn test_invalid_rows_are_dropped() {
        let table = compile_table(&[(Tag::First, r"(unclosed", "bad"), (Tag::Second, r"ok", "good")]);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].tag, Tag::Second);
    }

    #[test]
    fn test_no_match() {
        let table = compile_table(&[(Tag::First, r"absent", "x")]);
        assert!(first_match(&table, "nothing here").is_none());
    }

    #[test]
    fn test_count_matching() {
        let table = compile_table(&[
            (Tag::First, r"a", "x"),
            (Tag::Second, r"b", "y"),
            (Tag::Second, r"z", "z"),
        ]);
        assert_eq!(count_matching(&table, "aab"), 2);
    }
}

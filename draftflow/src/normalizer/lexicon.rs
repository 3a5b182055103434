//! Rewrite tables used by the normalizer.
//!
//! In every table the tag is the replacement text.

use std::sync::LazyLock;

use crate::rules::{compile_table, PatternRule};

/// Absolute and promotional words, replaced with hedged equivalents.
/// The replacement copies the capitalisation of the first letter.
pub(crate) static WORD_REPLACEMENTS: LazyLock<Vec<PatternRule<&'static str>>> =
    LazyLock::new(|| {
        compile_table(&[
            ("salah satu", r"(?i)\bsatu-satunya\b", "absolute"),
            ("jarang", r"(?i)\btidak pernah\b", "absolute"),
            ("diharapkan", r"(?i)\bdijamin\b", "guarantee"),
            ("sering digunakan", r"(?i)\bterbukti\b", "unverifiable claim"),
            ("umumnya", r"(?i)\bpasti\b", "absolute"),
            ("disarankan", r"(?i)\bwajib\b", "imperative"),
            ("sering", r"(?i)\bselalu\b", "absolute"),
            ("kiat", r"(?i)\brahasia\b", "clickbait"),
            ("efektif", r"(?i)\bampuh\b", "promotional"),
            ("tepat", r"(?i)\bterbaik\b", "superlative"),
            ("terjangkau", r"(?i)\btermurah\b", "superlative"),
        ])
    });

/// Phrases deleted outright: model self-references and template leftovers.
/// No row consumes a `!`, so the exclamation cap applied afterwards stays exact.
pub(crate) static PHRASE_DELETIONS: LazyLock<Vec<PatternRule<&'static str>>> =
    LazyLock::new(|| {
        compile_table(&[
            (
                "",
                r"(?i)\b(?:sebagai|as an?)\s+(?:sebuah\s+)?(?:model bahasa|ai language model|language model|asisten ai|kecerdasan buatan|ai)\b[^.!?\n]*[.,]?[ \t]*",
                "ai self-reference",
            ),
            (
                "",
                r"(?i)\b(?:saya|aku)\s+(?:adalah|hanyalah)\s+(?:sebuah\s+)?(?:ai|model bahasa|asisten virtual)\b[^.!?\n]*[.?]?[ \t]*",
                "ai self-reference",
            ),
            (
                "",
                r"(?i)\[(?:placeholder|insert|masukkan|isi)[^\]\n!]*\]",
                "placeholder",
            ),
            ("", r"\{\{[^}\n!]*\}\}", "template variable"),
            ("", r"(?i)lorem ipsum[^.!\n]*\.?", "filler text"),
        ])
    });

/// Claim patterns softened into hedged statements.
pub(crate) static CLAIM_SOFTENERS: LazyLock<Vec<PatternRule<&'static str>>> =
    LazyLock::new(|| {
        compile_table(&[
            ("umumnya $1", r"\badalah\s+(\S+\s+yang)\b", "definitive claim"),
            ("dapat mendukung", r"(?i)\bakan menjamin\b", "guarantee"),
            ("banyak orang", r"(?i)\bsemua orang\b", "overgeneralisation"),
        ])
    });

/// Intensifying adverbs, removed with one trailing space.
pub(crate) static INTENSIFIERS: LazyLock<Vec<PatternRule<&'static str>>> = LazyLock::new(|| {
    compile_table(&[(
        "",
        r"(?i)\b(?:benar-benar|sungguh-sungguh|sungguh|sangatlah|amatlah|banget)\b ?",
        "intensifier",
    )])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_compile() {
        assert_eq!(WORD_REPLACEMENTS.len(), 11);
        assert_eq!(PHRASE_DELETIONS.len(), 5);
        assert_eq!(CLAIM_SOFTENERS.len(), 3);
        assert_eq!(INTENSIFIERS.len(), 1);
    }

    #[test]
    fn test_word_boundaries() {
        let pasti = WORD_REPLACEMENTS.iter().find(|r| r.tag == "umumnya").unwrap();
        assert!(pasti.pattern.is_match("Hasilnya pasti bagus"));
        assert!(!pasti.pattern.is_match("tanpa kepastian"));
    }

    #[test]
    fn test_placeholder_deletion_pattern() {
        let rule = &PHRASE_DELETIONS[2];
        assert!(rule.pattern.is_match("[Masukkan nama produk]"));
        assert!(!rule.pattern.is_match("[tautan](/a)"));
    }
}

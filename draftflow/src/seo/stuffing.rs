//! Keyword-stuffing heuristic.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::rules::{compile_table, count_matching, PatternRule};

/// A keyword repeated this many times inside the window counts as stuffing.
const REPEAT_THRESHOLD: usize = 3;
/// Window, in characters, for the repeat check.
const REPEAT_WINDOW_CHARS: usize = 200;
/// Template phrases that together count as stuffing.
const TEMPLATE_THRESHOLD: usize = 2;

const STOPWORDS: &[&str] = &[
    "yang", "dan", "dari", "untuk", "dengan", "ini", "itu", "pada", "dalam", "adalah", "atau",
    "juga", "tidak", "akan", "bisa", "dapat", "agar", "karena", "sebagai", "oleh", "para",
    "serta", "lebih", "saat", "jika", "ada", "anda", "kita", "kami", "mereka", "setiap",
    "secara", "hingga", "sudah", "telah", "masih", "tanpa", "seperti", "bagi", "cara", "the",
    "and", "for", "with", "you", "your",
];

/// Canned SEO template phrases.
static TEMPLATE_PHRASES: LazyLock<Vec<PatternRule<()>>> = LazyLock::new(|| {
    compile_table(&[
        ((), r"panduan lengkap", "template phrase"),
        ((), r"solusi terbaik", "template phrase"),
        ((), r"tips (?:dan|&) trik", "template phrase"),
        ((), r"\bterlengkap\b", "template phrase"),
        ((), r"\bterpercaya\b", "template phrase"),
        ((), r"\bterbaru\b", "template phrase"),
        ((), r"nomor (?:1|satu)\b", "template phrase"),
        ((), r"paling lengkap", "template phrase"),
        ((), r"wajib tahu", "template phrase"),
        ((), r"cara mudah", "template phrase"),
        ((), r"harga terbaik", "template phrase"),
    ])
});

/// Returns true if `text` looks keyword-stuffed.
///
/// Either a non-stopword of three or more letters occurs three times within
/// 200 characters, or at least two template phrases co-occur.
#[must_use]
pub fn is_keyword_stuffed(text: &str) -> bool {
    let lower = text.to_lowercase();
    count_matching(&TEMPLATE_PHRASES, &lower) >= TEMPLATE_THRESHOLD || has_dense_repeat(&lower)
}

fn has_dense_repeat(lower: &str) -> bool {
    let mut positions: HashMap<&str, Vec<usize>> = HashMap::new();
    for (offset, word) in words_with_offsets(lower) {
        if word.chars().count() < 3 || STOPWORDS.contains(&word) {
            continue;
        }
        let seen = positions.entry(word).or_default();
        seen.push(offset);
        let n = seen.len();
        if n >= REPEAT_THRESHOLD && seen[n - 1] - seen[n - REPEAT_THRESHOLD] < REPEAT_WINDOW_CHARS {
            return true;
        }
    }
    false
}

/// Alphanumeric words with their character offsets.
fn words_with_offsets(text: &str) -> Vec<(usize, &str)> {
    let mut words = Vec::new();
    let mut start: Option<(usize, usize)> = None;
    let mut char_offset = 0;
    for (byte, c) in text.char_indices() {
        if c.is_alphanumeric() {
            if start.is_none() {
                start = Some((byte, char_offset));
            }
        } else if let Some((begin, at)) = start.take() {
            words.push((at, &text[begin..byte]));
        }
        char_offset += 1;
    }
    if let Some((begin, at)) = start {
        words.push((at, &text[begin..]));
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_table_compiles() {
        assert_eq!(TEMPLATE_PHRASES.len(), 11);
    }

    #[test]
    fn test_repeated_keyword_is_stuffed() {
        assert!(is_keyword_stuffed("Monstera murah, monstera hias, monstera besar"));
    }

    #[test]
    fn test_spread_out_repeats_are_fine() {
        let filler = " daun hijau segar tumbuh subur di teras rumah ketika pagi hari cerah sehingga batang tanaman semakin kokoh dan rimbun";
        let text = format!("monstera{filler} monstera{filler} monstera");
        assert!(!is_keyword_stuffed(&text));
    }

    #[test]
    fn test_stopwords_and_short_words_ignored() {
        assert!(!is_keyword_stuffed("yang yang yang di di di ke ke ke"));
    }

    #[test]
    fn test_two_template_phrases() {
        assert!(is_keyword_stuffed("Panduan Lengkap Monstera: Solusi Terbaik untuk Pemula"));
        assert!(!is_keyword_stuffed("Panduan lengkap merawat monstera untuk pemula"));
    }

    #[test]
    fn test_offsets_count_characters() {
        let words = words_with_offsets("é a");
        assert_eq!(words, vec![(0, "é"), (2, "a")]);
    }
}

//! Article fixtures with a predictable shape.

use crate::core::ContentResult;
use crate::text::{capitalize_first, count_words};

/// Neutral gardening vocabulary that trips none of the guardrail tables.
const VOCABULARY: [&str; 64] = [
    "daun", "akar", "batang", "tanah", "pupuk", "kompos", "cahaya", "pagi", "sore", "embun",
    "pot", "media", "sekam", "pasir", "humus", "bibit", "tunas", "ranting", "bunga", "buah",
    "biji", "kebun", "halaman", "teras", "jendela", "udara", "suhu", "lembap", "kering", "segar",
    "hijau", "lebar", "kecil", "besar", "tinggi", "rendah", "tumbuh", "subur", "rimbun",
    "perlahan", "teratur", "rutin", "merata", "cukup", "ringan", "gembur", "basah", "sejuk",
    "hangat", "teduh", "angin", "hujan", "musim", "minggu", "bulan", "hari", "siram", "pangkas",
    "rawat", "tanam", "pindah", "periksa", "catat", "amati",
];

// Coprime with 64, so a word comes back only after the whole vocabulary.
const STRIDE: usize = 7;
const SENTENCE_WORDS: usize = 12;

/// Builds a [`ContentResult`] whose body is an intro paragraph followed by
/// one `##` section per heading.
///
/// The body has exactly the requested number of words (heading words
/// included) unless the headings alone need more. Every paragraph is a
/// single line of twelve-word sentences.
#[derive(Debug, Clone)]
pub struct ArticleFixture {
    title: String,
    sections: Vec<String>,
    word_count: usize,
}

impl ArticleFixture {
    /// Two sections and 800 words.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: vec!["Persiapan Media".to_string(), "Perawatan Harian".to_string()],
            word_count: 800,
        }
    }

    /// Sets the level-2 section headings.
    #[must_use]
    pub fn with_sections(mut self, headings: &[&str]) -> Self {
        self.sections = headings.iter().map(|h| (*h).to_string()).collect();
        self
    }

    /// Sets the body word count.
    #[must_use]
    pub fn with_word_count(mut self, words: usize) -> Self {
        self.word_count = words;
        self
    }

    /// An outline listing the sections as `##` headings.
    #[must_use]
    pub fn outline(&self) -> String {
        self.sections
            .iter()
            .map(|h| format!("## {h}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The markdown body.
    #[must_use]
    pub fn body(&self) -> String {
        let heading_words: usize = self.sections.iter().map(|h| count_words(h)).sum();
        let filler = self.word_count.saturating_sub(heading_words);
        let chunks = self.sections.len() + 1;
        let size = |i: usize| filler / chunks + usize::from(i < filler % chunks);

        let mut cursor = 0;
        let mut blocks = Vec::new();
        let intro = paragraph(&mut cursor, size(0));
        if !intro.is_empty() {
            blocks.push(intro);
        }
        for (i, heading) in self.sections.iter().enumerate() {
            blocks.push(format!("## {heading}"));
            let text = paragraph(&mut cursor, size(i + 1));
            if !text.is_empty() {
                blocks.push(text);
            }
        }
        blocks.join("\n\n")
    }

    /// Builds a raw result.
    #[must_use]
    pub fn build(&self) -> ContentResult {
        ContentResult::raw(self.title.clone(), self.body())
    }
}

fn paragraph(cursor: &mut usize, words: usize) -> String {
    let mut sentences = Vec::new();
    let mut remaining = words;
    while remaining > 0 {
        let n = remaining.min(SENTENCE_WORDS);
        let sentence: Vec<&str> = (0..n)
            .map(|_| {
                let word = VOCABULARY[(*cursor * STRIDE) % VOCABULARY.len()];
                *cursor += 1;
                word
            })
            .collect();
        sentences.push(format!("{}.", capitalize_first(&sentence.join(" "))));
        remaining -= n;
    }
    sentences.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::count_headings;

    #[test]
    fn test_exact_word_count() {
        for words in [50, 201, 800, 1234] {
            let content = ArticleFixture::new("Judul").with_word_count(words).build();
            assert_eq!(content.body_word_count(), words);
        }
    }

    #[test]
    fn test_sections_become_h2() {
        let fixture = ArticleFixture::new("Judul").with_sections(&["Satu", "Dua", "Tiga"]);
        assert_eq!(count_headings(&fixture.body(), 2), 3);
        assert_eq!(fixture.outline(), "## Satu\n## Dua\n## Tiga");
        assert!(!fixture.body().starts_with('#'));
    }

    #[test]
    fn test_headings_alone_exceed_budget() {
        let content = ArticleFixture::new("Judul")
            .with_sections(&["Satu Dua Tiga"])
            .with_word_count(2)
            .build();
        assert_eq!(content.body, "## Satu Dua Tiga");
    }
}

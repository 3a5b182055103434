//! Text utilities: markdown inspection and slug derivation.

mod markdown;
mod slug;

pub use markdown::{
    capitalize_first, collapse_whitespace, count_headings, count_words, extract_headings,
    is_structural_block, paragraphs, parse_heading, section_headings, snippet_around,
    strip_markdown, truncate_chars, word_tokens, Heading,
};
pub use slug::{slugify, MAX_SLUG_LEN};

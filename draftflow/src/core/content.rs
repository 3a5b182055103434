//! Content request and result types.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use super::ContentStatus;
use crate::text::count_words;

/// Production mode of a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Long, comprehensive cornerstone article.
    #[default]
    Pillar,
    /// Supporting article linked from a pillar.
    Cluster,
    /// Timeless reference article.
    Evergreen,
    /// Time-sensitive news piece.
    News,
    /// Numbered list article.
    Listicle,
    /// Step-by-step instructions.
    HowTo,
}

impl ContentType {
    /// Stable code used in configuration and logs.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Pillar => "pillar",
            Self::Cluster => "cluster",
            Self::Evergreen => "evergreen",
            Self::News => "news",
            Self::Listicle => "listicle",
            Self::HowTo => "how_to",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pillar" => Ok(Self::Pillar),
            "cluster" => Ok(Self::Cluster),
            "evergreen" => Ok(Self::Evergreen),
            "news" => Ok(Self::News),
            "listicle" => Ok(Self::Listicle),
            "how_to" | "howto" | "how-to" => Ok(Self::HowTo),
            other => Err(format!("unknown content type '{other}'")),
        }
    }
}

/// A request to produce one article.
///
/// Fields are private: once built, a request cannot be changed, which is
/// what guarantees the outline stays identical across retry attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRequest {
    content_type: ContentType,
    category: String,
    #[serde(default)]
    outline: String,
    #[serde(default = "default_language")]
    language: String,
}

fn default_language() -> String {
    "id".to_string()
}

impl ContentRequest {
    /// Creates a request with no outline and the default language (`id`).
    #[must_use]
    pub fn new(content_type: ContentType, category: impl Into<String>) -> Self {
        Self {
            content_type,
            category: category.into(),
            outline: String::new(),
            language: default_language(),
        }
    }

    /// Sets the outline.
    #[must_use]
    pub fn with_outline(mut self, outline: impl Into<String>) -> Self {
        self.outline = outline.into();
        self
    }

    /// Sets the language code.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Returns the production mode.
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Returns the category code.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the outline text (may be empty).
    #[must_use]
    pub fn outline(&self) -> &str {
        &self.outline
    }

    /// Returns the language code.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns true if a non-blank outline was supplied.
    #[must_use]
    pub fn has_outline(&self) -> bool {
        !self.outline.trim().is_empty()
    }

    /// SHA-256 of the outline, hex encoded.
    #[must_use]
    pub fn outline_fingerprint(&self) -> String {
        hex::encode(Sha256::digest(self.outline.as_bytes()))
    }
}

/// The article as it moves through the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentResult {
    /// Article title.
    pub title: String,
    /// Markdown body.
    pub body: String,
    /// SEO title (at most 60 characters once optimized).
    #[serde(default)]
    pub meta_title: String,
    /// SEO description (at most 300 characters once optimized).
    #[serde(default)]
    pub meta_description: String,
    /// Provenance tag.
    #[serde(default)]
    pub status: ContentStatus,
}

impl ContentResult {
    /// Creates a raw result as returned by a text generator.
    #[must_use]
    pub fn raw(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Sets the meta title.
    #[must_use]
    pub fn with_meta_title(mut self, meta_title: impl Into<String>) -> Self {
        self.meta_title = meta_title.into();
        self
    }

    /// Sets the meta description.
    #[must_use]
    pub fn with_meta_description(mut self, meta_description: impl Into<String>) -> Self {
        self.meta_description = meta_description.into();
        self
    }

    /// Sets the status tag.
    #[must_use]
    pub fn with_status(mut self, status: ContentStatus) -> Self {
        self.status = status;
        self
    }

    /// Words in the body (markdown stripped).
    #[must_use]
    pub fn body_word_count(&self) -> usize {
        count_words(&self.body)
    }

    /// Words in title and body combined (markdown stripped).
    #[must_use]
    pub fn total_word_count(&self) -> usize {
        count_words(&self.title) + self.body_word_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_codes_round_trip_through_from_str() {
        for ty in [
            ContentType::Pillar,
            ContentType::Cluster,
            ContentType::Evergreen,
            ContentType::News,
            ContentType::Listicle,
            ContentType::HowTo,
        ] {
            assert_eq!(ty.code().parse::<ContentType>().unwrap(), ty);
        }
        assert_eq!("how-to".parse::<ContentType>().unwrap(), ContentType::HowTo);
        assert!("poem".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_request_defaults() {
        let request = ContentRequest::new(ContentType::Cluster, "kebun");
        assert_eq!(request.language(), "id");
        assert_eq!(request.category(), "kebun");
        assert!(!request.has_outline());
    }

    #[test]
    fn test_request_blank_outline_is_not_an_outline() {
        let request = ContentRequest::new(ContentType::Pillar, "kebun").with_outline("  \n ");
        assert!(!request.has_outline());
    }

    #[test]
    fn test_outline_fingerprint_tracks_outline() {
        let a = ContentRequest::new(ContentType::Pillar, "x").with_outline("## Satu");
        let b = a.clone();
        let c = ContentRequest::new(ContentType::Pillar, "x").with_outline("## Dua");
        assert_eq!(a.outline_fingerprint(), b.outline_fingerprint());
        assert_ne!(a.outline_fingerprint(), c.outline_fingerprint());
        assert_eq!(a.outline_fingerprint().len(), 64);
    }

    #[test]
    fn test_request_deserialize_defaults() {
        let request: ContentRequest =
            serde_json::from_str(r#"{"content_type":"news","category":"teknologi"}"#).unwrap();
        assert_eq!(request.content_type(), ContentType::News);
        assert_eq!(request.language(), "id");
        assert_eq!(request.outline(), "");
    }

    #[test]
    fn test_content_result_word_counts() {
        let content = ContentResult::raw("Judul Artikel", "## Bagian\nsatu dua tiga");
        assert_eq!(content.body_word_count(), 4);
        assert_eq!(content.total_word_count(), 6);
        assert_eq!(content.status, ContentStatus::RawFromModel);
    }
}

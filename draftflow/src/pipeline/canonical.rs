//! The single canonical article value of a run.

use sha2::{Digest, Sha256};

use crate::core::{ContentResult, ContentStatus};

/// Holds the one authoritative [`ContentResult`] after normalization.
///
/// Stages read it through [`content`](Self::content) and swap in new values
/// through [`replace`](Self::replace) or [`replace_body`](Self::replace_body).
/// Each swap bumps the revision and logs who wrote it.
#[derive(Debug)]
pub struct CanonicalBody {
    content: ContentResult,
    revision: u32,
    writer: &'static str,
}

impl CanonicalBody {
    /// Takes ownership of the first canonical value.
    #[must_use]
    pub fn new(content: ContentResult, writer: &'static str) -> Self {
        tracing::debug!(
            writer,
            chars = content.body.chars().count(),
            fingerprint = %fingerprint(&content.body),
            "Canonical body established"
        );
        Self {
            content,
            revision: 0,
            writer,
        }
    }

    /// Current canonical value.
    #[must_use]
    pub fn content(&self) -> &ContentResult {
        &self.content
    }

    /// Current body text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.content.body
    }

    /// Number of replacements since creation.
    #[must_use]
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Stage that wrote the current value.
    #[must_use]
    pub fn writer(&self) -> &'static str {
        self.writer
    }

    /// SHA-256 of the current body, hex encoded.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.content.body)
    }

    /// Replaces the whole value.
    pub fn replace(&mut self, writer: &'static str, content: ContentResult) {
        let before = self.content.body.chars().count();
        let after = content.body.chars().count();
        self.content = content;
        self.revision += 1;
        self.writer = writer;
        tracing::debug!(
            writer,
            revision = self.revision,
            char_delta = i64::try_from(after).unwrap_or(i64::MAX)
                - i64::try_from(before).unwrap_or(i64::MAX),
            fingerprint = %self.fingerprint(),
            "Canonical body replaced"
        );
    }

    /// Replaces only the body, keeping the other fields.
    pub fn replace_body(&mut self, writer: &'static str, body: String) {
        let next = ContentResult {
            body,
            ..self.content.clone()
        };
        self.replace(writer, next);
    }

    /// Updates the provenance tag. Not a replacement.
    pub fn set_status(&mut self, status: ContentStatus) {
        self.content.status = status;
    }

    /// Hands the final value back.
    #[must_use]
    pub fn into_content(self) -> ContentResult {
        self.content
    }
}

fn fingerprint(body: &str) -> String {
    hex::encode(Sha256::digest(body.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replacements_bump_revision() {
        let mut canonical = CanonicalBody::new(ContentResult::raw("Judul", "awal"), "normalize");
        assert_eq!(canonical.revision(), 0);
        let first = canonical.fingerprint();

        canonical.replace_body("image", "awal\n\n![a](/images/a.png)".to_string());
        assert_eq!(canonical.revision(), 1);
        assert_eq!(canonical.writer(), "image");
        assert_eq!(canonical.content().title, "Judul");
        assert_ne!(canonical.fingerprint(), first);
    }

    #[test]
    fn test_set_status_is_not_a_replacement() {
        let mut canonical = CanonicalBody::new(ContentResult::raw("t", "b"), "normalize");
        canonical.set_status(ContentStatus::Validated);
        assert_eq!(canonical.revision(), 0);
        assert_eq!(canonical.into_content().status, ContentStatus::Validated);
    }
}

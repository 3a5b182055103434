//! Collaborator doubles for pipeline tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{ContentRequest, ContentResult, ImageAsset};
use crate::ports::{ImageGenerator, TextGenerator};

/// One scripted reply of a [`ScriptedTextGenerator`].
#[derive(Debug, Clone)]
pub enum TextReply {
    /// Return this content.
    Content(ContentResult),
    /// Fail with this message.
    Failure(String),
}

/// Text generator that plays back a script of replies.
///
/// Call `n` gets reply `n`; once the script runs out the last reply repeats.
/// Every request is recorded.
#[derive(Debug, Default)]
pub struct ScriptedTextGenerator {
    script: Vec<TextReply>,
    requests: Mutex<Vec<ContentRequest>>,
}

impl ScriptedTextGenerator {
    /// Creates an empty script; calls fail until replies are added.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Always returns `content`.
    #[must_use]
    pub fn always(content: ContentResult) -> Self {
        Self::new().then_content(content)
    }

    /// Always fails with `message`.
    #[must_use]
    pub fn always_failing(message: impl Into<String>) -> Self {
        Self::new().then_failure(message)
    }

    /// Appends a successful reply.
    #[must_use]
    pub fn then_content(mut self, content: ContentResult) -> Self {
        self.script.push(TextReply::Content(content));
        self
    }

    /// Appends a failing reply.
    #[must_use]
    pub fn then_failure(mut self, message: impl Into<String>) -> Self {
        self.script.push(TextReply::Failure(message.into()));
        self
    }

    /// Number of calls so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Requests received, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<ContentRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedTextGenerator {
    async fn generate(&self, request: &ContentRequest) -> anyhow::Result<ContentResult> {
        let call = {
            let mut requests = self.requests.lock();
            requests.push(request.clone());
            requests.len() - 1
        };
        let reply = self
            .script
            .get(call)
            .or_else(|| self.script.last())
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("text generator script is empty"))?;
        match reply {
            TextReply::Content(content) => Ok(content),
            TextReply::Failure(message) => Err(anyhow::anyhow!(message)),
        }
    }
}

/// Image generator that returns a fixed set and records the slugs it saw.
#[derive(Debug, Default)]
pub struct StaticImageGenerator {
    images: Vec<ImageAsset>,
    slugs: Mutex<Vec<String>>,
}

impl StaticImageGenerator {
    /// Returns `images` on every call.
    #[must_use]
    pub fn new(images: Vec<ImageAsset>) -> Self {
        Self {
            images,
            slugs: Mutex::new(Vec::new()),
        }
    }

    /// Slugs received, in call order.
    #[must_use]
    pub fn slugs(&self) -> Vec<String> {
        self.slugs.lock().clone()
    }
}

#[async_trait]
impl ImageGenerator for StaticImageGenerator {
    async fn generate_images(&self, _body: &str, slug: &str) -> anyhow::Result<Vec<ImageAsset>> {
        self.slugs.lock().push(slug.to_string());
        Ok(self.images.clone())
    }
}

/// Image generator that always fails.
#[derive(Debug)]
pub struct FailingImageGenerator {
    message: String,
}

impl FailingImageGenerator {
    /// Fails with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ImageGenerator for FailingImageGenerator {
    async fn generate_images(&self, _body: &str, _slug: &str) -> anyhow::Result<Vec<ImageAsset>> {
        Err(anyhow::anyhow!(self.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ContentType;

    #[tokio::test]
    async fn test_script_repeats_last_reply() {
        let generator = ScriptedTextGenerator::new()
            .then_failure("timeout")
            .then_content(ContentResult::raw("t", "b"));
        let request = ContentRequest::new(ContentType::News, "kebun");

        assert!(generator.generate(&request).await.is_err());
        assert_eq!(generator.generate(&request).await.unwrap().title, "t");
        assert_eq!(generator.generate(&request).await.unwrap().title, "t");
        assert_eq!(generator.call_count(), 3);
    }

    #[tokio::test]
    async fn test_empty_script_fails() {
        let generator = ScriptedTextGenerator::new();
        let request = ContentRequest::new(ContentType::News, "kebun");
        let err = generator.generate(&request).await.unwrap_err();
        assert!(err.to_string().contains("script is empty"));
    }

    #[tokio::test]
    async fn test_image_doubles() {
        let images = StaticImageGenerator::new(vec![ImageAsset::new("A", "a", "a.png")]);
        assert_eq!(images.generate_images("body", "slug-a").await.unwrap().len(), 1);
        assert_eq!(images.slugs(), vec!["slug-a".to_string()]);

        let failing = FailingImageGenerator::new("storage offline");
        let err = failing.generate_images("body", "slug").await.unwrap_err();
        assert_eq!(err.to_string(), "storage offline");
    }
}

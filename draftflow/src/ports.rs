//! Collaborator ports: the text and image generators the pipeline calls.
//!
//! Both are external, I/O-bound services. Implementations must be safe to
//! share between concurrent runs; the pipeline only ever holds them behind
//! an `Arc`.

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::{ContentRequest, ContentResult, ImageAsset};

/// Produces the raw article for a request.
///
/// The returned body is markdown with level-2/level-3 section headings. Any
/// error is passed through the classifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a draft.
    async fn generate(&self, request: &ContentRequest) -> anyhow::Result<ContentResult>;
}

/// Produces images for an article body.
///
/// Failures are never fatal to a run.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generates images for `body`, storing them under names derived from
    /// `slug`.
    async fn generate_images(&self, body: &str, slug: &str) -> anyhow::Result<Vec<ImageAsset>>;
}

/// Image generator that produces nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpImageGenerator;

#[async_trait]
impl ImageGenerator for NoOpImageGenerator {
    async fn generate_images(&self, _body: &str, _slug: &str) -> anyhow::Result<Vec<ImageAsset>> {
        Ok(Vec::new())
    }
}

/// The collaborators a pipeline runs against.
#[derive(Clone)]
pub struct GeneratorPorts {
    /// Text generator.
    pub text: Arc<dyn TextGenerator>,
    /// Image generator.
    pub images: Arc<dyn ImageGenerator>,
}

impl std::fmt::Debug for GeneratorPorts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorPorts")
            .field("text", &"<dyn TextGenerator>")
            .field("images", &"<dyn ImageGenerator>")
            .finish()
    }
}

impl GeneratorPorts {
    /// Creates ports with the given text generator and no images.
    #[must_use]
    pub fn new(text: Arc<dyn TextGenerator>) -> Self {
        Self {
            text,
            images: Arc::new(NoOpImageGenerator),
        }
    }

    /// Sets the image generator.
    #[must_use]
    pub fn with_images(mut self, images: Arc<dyn ImageGenerator>) -> Self {
        self.images = images;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ContentType;

    #[tokio::test]
    async fn test_noop_image_generator() {
        let images = NoOpImageGenerator.generate_images("body", "slug").await.unwrap();
        assert!(images.is_empty());
    }

    #[tokio::test]
    async fn test_ports_dispatch_to_mocks() {
        let mut text = MockTextGenerator::new();
        text.expect_generate()
            .times(1)
            .returning(|request| Ok(ContentResult::raw(request.category(), "isi")));
        let ports = GeneratorPorts::new(Arc::new(text));

        let request = ContentRequest::new(ContentType::News, "kebun");
        let result = ports.text.generate(&request).await.unwrap();
        assert_eq!(result.title, "kebun");
        assert!(ports.images.generate_images("", "").await.unwrap().is_empty());
    }

    #[test]
    fn test_debug_hides_implementations() {
        let ports = GeneratorPorts::new(Arc::new(MockTextGenerator::new()));
        assert!(format!("{ports:?}").contains("GeneratorPorts"));
    }
}

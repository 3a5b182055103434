//! Pipeline configuration.
//!
//! Settings come from a JSON document (every field optional) and can be
//! overlaid with `DRAFTFLOW_*` environment variables:
//!
//! | Key | Field |
//! |-----|-------|
//! | `DRAFTFLOW_ORIGIN` | `origin` (`generated`/`ai` or `human`/`manual`) |
//! | `DRAFTFLOW_MAX_RETRIES` | `max_retries` |
//! | `DRAFTFLOW_SITE_NAME` | `seo.site_name` (empty clears it) |
//! | `DRAFTFLOW_ENFORCE_WORD_COUNT` | `validator.enforce_word_count` |
//! | `DRAFTFLOW_IMAGE_PREFIX` | `images.storage_prefix` |

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::ContentOrigin;
use crate::errors::{DraftflowError, Result};
use crate::normalizer::NormalizerConfig;
use crate::pipeline::{ImageConfig, RetryPolicy, MAX_RETRIES};
use crate::seo::SeoConfig;
use crate::state::DEFAULT_MAX_RETRIES;
use crate::validator::ValidatorConfig;

const ENV_PREFIX: &str = "DRAFTFLOW_";

/// Everything a [`DraftPipeline`](crate::pipeline::DraftPipeline) needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Selects strict (human) or advisory (generated) handling.
    pub origin: ContentOrigin,
    /// Retries used by `run`; clamped to the hard limit at run time.
    pub max_retries: u32,
    /// Normalizer settings.
    pub normalizer: NormalizerConfig,
    /// Validator settings.
    pub validator: ValidatorConfig,
    /// SEO settings.
    pub seo: SeoConfig,
    /// Image storage settings.
    pub images: ImageConfig,
    /// Delay between attempts.
    pub retry: RetryPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            origin: ContentOrigin::Generated,
            max_retries: DEFAULT_MAX_RETRIES,
            normalizer: NormalizerConfig::default(),
            validator: ValidatorConfig::default(),
            seo: SeoConfig::default(),
            images: ImageConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` for malformed JSON and `Config` for settings
    /// that fail [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loaded pipeline configuration");
        Self::from_json_str(&json)
    }

    /// Defaults overlaid with the process environment.
    ///
    /// # Errors
    ///
    /// Returns `Config` for an unparsable override or an invalid result.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(std::env::vars())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `DRAFTFLOW_*` overrides. Other keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns `Config` if a recognised key has an unparsable value.
    pub fn apply_overrides<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.as_ref().trim();
            match name {
                "ORIGIN" => {
                    self.origin = value.parse().map_err(DraftflowError::Config)?;
                }
                "MAX_RETRIES" => {
                    self.max_retries = value.parse().map_err(|_| {
                        DraftflowError::Config(format!(
                            "{ENV_PREFIX}MAX_RETRIES must be a non-negative integer, got '{value}'"
                        ))
                    })?;
                }
                "SITE_NAME" => {
                    self.seo.site_name = (!value.is_empty()).then(|| value.to_string());
                }
                "ENFORCE_WORD_COUNT" => {
                    self.validator.enforce_word_count = parse_flag(value).ok_or_else(|| {
                        DraftflowError::Config(format!(
                            "{ENV_PREFIX}ENFORCE_WORD_COUNT must be a boolean, got '{value}'"
                        ))
                    })?;
                }
                "IMAGE_PREFIX" => {
                    self.images.storage_prefix = value.to_string();
                }
                other => {
                    tracing::debug!(key = %format!("{ENV_PREFIX}{other}"), "Ignoring unknown override");
                    continue;
                }
            }
            tracing::debug!(key = key.as_ref(), "Applied configuration override");
        }
        Ok(())
    }

    /// Rejects settings the pipeline cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `Config` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let seo = &self.seo;
        if seo.meta_title_max < seo.meta_title_min {
            return Err(DraftflowError::Config(format!(
                "seo.meta_title_max ({}) is below seo.meta_title_min ({})",
                seo.meta_title_max, seo.meta_title_min
            )));
        }
        if seo.meta_title_max <= 3 {
            return Err(DraftflowError::Config(
                "seo.meta_title_max leaves no room before the ellipsis".to_string(),
            ));
        }
        if seo.meta_description_max == 0 {
            return Err(DraftflowError::Config(
                "seo.meta_description_max must be positive".to_string(),
            ));
        }
        if self.images.storage_prefix.trim_matches('/').trim().is_empty() {
            return Err(DraftflowError::Config(
                "images.storage_prefix must name a directory".to_string(),
            ));
        }
        if self.retry.max_delay_ms < self.retry.base_delay_ms {
            return Err(DraftflowError::Config(
                "retry.max_delay_ms is below retry.base_delay_ms".to_string(),
            ));
        }
        if self.max_retries > MAX_RETRIES {
            tracing::warn!(
                configured = self.max_retries,
                limit = MAX_RETRIES,
                "max_retries above the limit will be clamped"
            );
        }
        Ok(())
    }

    /// Sets the content origin.
    #[must_use]
    pub fn with_origin(mut self, origin: ContentOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Sets the retry count used by `run`.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the normalizer settings.
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: NormalizerConfig) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Sets the validator settings.
    #[must_use]
    pub fn with_validator(mut self, validator: ValidatorConfig) -> Self {
        self.validator = validator;
        self
    }

    /// Sets the SEO settings.
    #[must_use]
    pub fn with_seo(mut self, seo: SeoConfig) -> Self {
        self.seo = seo;
        self
    }

    /// Sets the image storage settings.
    #[must_use]
    pub fn with_images(mut self, images: ImageConfig) -> Self {
        self.images = images;
        self
    }

    /// Sets the inter-attempt delay policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the site name appended to meta titles.
    #[must_use]
    pub fn with_site_name(mut self, site_name: impl Into<String>) -> Self {
        self.seo.site_name = Some(site_name.into());
        self
    }

    /// Sets the brand terms the validator rejects.
    #[must_use]
    pub fn with_brand_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validator.brand_terms = terms.into_iter().map(Into::into).collect();
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.origin, ContentOrigin::Generated);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.validator.min_word_count, 720);
        assert!(!config.validator.enforce_word_count);
        assert_eq!(config.seo.meta_title_max, 60);
        assert_eq!(config.images.storage_prefix, "/images/");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PipelineConfig::from_json_str(
            r#"{"origin":"manual","seo":{"site_name":"Kebunku"},"validator":{"brand_terms":["Acme"]}}"#,
        )
        .unwrap();
        assert_eq!(config.origin, ContentOrigin::Human);
        assert_eq!(config.seo.site_name.as_deref(), Some("Kebunku"));
        assert_eq!(config.seo.meta_description_max, 300);
        assert_eq!(config.validator.brand_terms, vec!["Acme".to_string()]);
        assert_eq!(config.validator.min_body_words, 200);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_retries":1,"retry":{{"base_delay_ms":10}}}}"#).unwrap();
        let config = PipelineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.retry.base_delay_ms, 10);
    }

    #[test]
    fn test_from_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PipelineConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, DraftflowError::Io(_)));
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = PipelineConfig::from_json_str("{origin:").unwrap_err();
        assert!(matches!(err, DraftflowError::Serialization(_)));
    }

    #[test]
    fn test_overrides() {
        let mut config = PipelineConfig::default().with_site_name("Lama");
        config
            .apply_overrides([
                ("DRAFTFLOW_ORIGIN", "human"),
                ("DRAFTFLOW_MAX_RETRIES", "1"),
                ("DRAFTFLOW_SITE_NAME", ""),
                ("DRAFTFLOW_ENFORCE_WORD_COUNT", "yes"),
                ("DRAFTFLOW_IMAGE_PREFIX", "/media/"),
                ("DRAFTFLOW_UNKNOWN", "x"),
                ("PATH", "/usr/bin"),
            ])
            .unwrap();
        assert_eq!(config.origin, ContentOrigin::Human);
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.seo.site_name, None);
        assert!(config.validator.enforce_word_count);
        assert_eq!(config.images.storage_prefix, "/media/");
    }

    #[test]
    fn test_bad_overrides() {
        let mut config = PipelineConfig::default();
        assert!(config.apply_overrides([("DRAFTFLOW_ORIGIN", "robot")]).is_err());
        assert!(config.apply_overrides([("DRAFTFLOW_MAX_RETRIES", "-1")]).is_err());
        assert!(config
            .apply_overrides([("DRAFTFLOW_ENFORCE_WORD_COUNT", "maybe")])
            .is_err());
    }

    #[test]
    fn test_validate_rejects_impossible_settings() {
        let mut config = PipelineConfig::default();
        config.seo.meta_title_max = 10;
        assert!(config.validate().is_err());

        let config = PipelineConfig::default().with_images(ImageConfig {
            storage_prefix: "/".to_string(),
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("storage_prefix"));

        let config = PipelineConfig::default().with_retry(
            RetryPolicy::new()
                .with_base_delay_ms(500)
                .with_max_delay_ms(100),
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builders() {
        let config = PipelineConfig::new()
            .with_origin(ContentOrigin::Human)
            .with_max_retries(5)
            .with_brand_terms(["Acme", "ACM"]);
        assert_eq!(config.validator.brand_terms.len(), 2);
        assert!(config.validate().is_ok());
    }
}

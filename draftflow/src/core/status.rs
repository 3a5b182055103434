//! Content status and origin enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Provenance tag attached to a [`ContentResult`](super::ContentResult).
///
/// Each stage updates it; control flow never depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentStatus {
    /// Straight from the text generator.
    #[default]
    RawFromModel,
    /// Tone and punctuation normalized.
    Normalized,
    /// Meta fields (and, for human content, the body) optimized.
    SeoOptimized,
    /// Passed through the validator.
    Validated,
    /// Ready to be stored as a draft.
    DraftReady,
    /// Rejected and quarantined. A quarantined run returns no content, so
    /// this only appears in the `draft.run.failed` event payload.
    Rejected,
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RawFromModel => write!(f, "raw-from-model"),
            Self::Normalized => write!(f, "normalized"),
            Self::SeoOptimized => write!(f, "seo-optimized"),
            Self::Validated => write!(f, "validated"),
            Self::DraftReady => write!(f, "draft-ready"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl ContentStatus {
    /// Returns true if the content reached a final disposition.
    #[must_use]
    pub fn is_final(&self) -> bool {
        matches!(self, Self::DraftReady | Self::Rejected)
    }
}

/// Where a piece of content came from.
///
/// Selects how strict the SEO layer and the orchestrator are: generated
/// content gets advisory checks and a read-only body, human content gets
/// hard checks and an actively rewritten body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentOrigin {
    /// Produced by the text generation model ("ai", lenient).
    #[default]
    #[serde(alias = "ai")]
    Generated,
    /// Written or edited by a person ("manual", strict).
    #[serde(alias = "manual")]
    Human,
}

impl ContentOrigin {
    /// Returns true if rule violations block publication.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Human)
    }
}

impl fmt::Display for ContentOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generated => write!(f, "generated"),
            Self::Human => write!(f, "human"),
        }
    }
}

impl FromStr for ContentOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generated" | "ai" => Ok(Self::Generated),
            "human" | "manual" => Ok(Self::Human),
            other => Err(format!("unknown content origin '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_status_display() {
        assert_eq!(ContentStatus::RawFromModel.to_string(), "raw-from-model");
        assert_eq!(ContentStatus::SeoOptimized.to_string(), "seo-optimized");
        assert_eq!(ContentStatus::DraftReady.to_string(), "draft-ready");
    }

    #[test]
    fn test_content_status_serialize_matches_display() {
        for status in [
            ContentStatus::RawFromModel,
            ContentStatus::Normalized,
            ContentStatus::SeoOptimized,
            ContentStatus::Validated,
            ContentStatus::DraftReady,
            ContentStatus::Rejected,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn test_content_status_is_final() {
        assert!(ContentStatus::DraftReady.is_final());
        assert!(ContentStatus::Rejected.is_final());
        assert!(!ContentStatus::Validated.is_final());
    }

    #[test]
    fn test_content_origin_parse_aliases() {
        assert_eq!("ai".parse::<ContentOrigin>().unwrap(), ContentOrigin::Generated);
        assert_eq!("Manual".parse::<ContentOrigin>().unwrap(), ContentOrigin::Human);
        assert!("robot".parse::<ContentOrigin>().is_err());
    }

    #[test]
    fn test_content_origin_deserialize_aliases() {
        let origin: ContentOrigin = serde_json::from_str(r#""manual""#).unwrap();
        assert_eq!(origin, ContentOrigin::Human);
        assert!(origin.is_strict());
        assert!(!ContentOrigin::Generated.is_strict());
    }
}

//! Resolve request/response shapes.
//!
//! The caption extractor sends a [`ResolveRequest`]; the backend answers
//! with a [`ResolveResponse`] whose `sequence` is already in playback order
//! and whose URLs are fully resolved.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SignifyError};
use crate::media::{MediaItem, MediaKind};

/// Which resolution tier produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchSource {
    /// Whole-word lookup in the vocabulary index.
    WordLevelDataset,
    /// The small curated fallback table keyed by literal word.
    DemoFallbackDatabase,
    /// Letter-by-letter fingerspelling.
    Fingerspell,
    /// Whole-caption containment fallback.
    PartialMatch,
    /// No tier produced media.
    #[serde(rename = "none")]
    NoMatch,
}

impl fmt::Display for MatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WordLevelDataset => write!(f, "word-level-dataset"),
            Self::DemoFallbackDatabase => write!(f, "demo-fallback-database"),
            Self::Fingerspell => write!(f, "fingerspell"),
            Self::PartialMatch => write!(f, "partial-match"),
            Self::NoMatch => write!(f, "none"),
        }
    }
}

/// A resolve request: freeform caption `text`, caller-tokenized `words`, or
/// both. When `words` is present it is used as-is and `text` is informational.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

impl ResolveRequest {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn from_words(words: Vec<String>) -> Self {
        Self {
            words: Some(words),
            ..Self::default()
        }
    }

    /// Reject requests that carry neither `text` nor `words`.
    pub fn validate(&self) -> Result<()> {
        if self.text.is_none() && self.words.is_none() {
            return Err(SignifyError::InvalidRequest(
                "either text or words is required".into(),
            ));
        }
        Ok(())
    }
}

/// One entry of a resolved sequence.
///
/// A fingerspelled word contributes one token per letter, all carrying the
/// same `source_word`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedToken {
    #[serde(rename = "word")]
    pub source_word: String,
    pub gloss: String,
    #[serde(rename = "type")]
    pub media_type: MediaKind,
    pub url: String,
    pub match_source: MatchSource,
}

impl From<ResolvedToken> for MediaItem {
    fn from(token: ResolvedToken) -> Self {
        MediaItem::new(token.media_type, token.url, token.source_word, token.gloss)
    }
}

/// Per-word summary of how a caption word was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordMapping {
    pub word: String,
    pub gloss: String,
    pub match_source: MatchSource,
    /// Number of sequence items this word contributed.
    pub items: usize,
}

/// Response to a resolve request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    pub success: bool,
    pub sequence: Vec<ResolvedToken>,
    pub found_words: Vec<String>,
    pub not_found_words: Vec<String>,
    #[serde(default)]
    pub mappings: Vec<WordMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_source_wire_names() {
        assert_eq!(
            serde_json::to_string(&MatchSource::WordLevelDataset).unwrap(),
            "\"word-level-dataset\""
        );
        assert_eq!(
            serde_json::to_string(&MatchSource::DemoFallbackDatabase).unwrap(),
            "\"demo-fallback-database\""
        );
        assert_eq!(serde_json::to_string(&MatchSource::NoMatch).unwrap(), "\"none\"");
        assert_eq!(MatchSource::PartialMatch.to_string(), "partial-match");
    }

    #[test]
    fn request_requires_text_or_words() {
        let empty: ResolveRequest = serde_json::from_str("{}").unwrap();
        assert!(matches!(empty.validate(), Err(SignifyError::InvalidRequest(_))));

        let text: ResolveRequest = serde_json::from_str(r#"{"text":"hello"}"#).unwrap();
        assert!(text.validate().is_ok());

        let words: ResolveRequest = serde_json::from_str(r#"{"words":[],"videoId":"v1"}"#).unwrap();
        assert!(words.validate().is_ok());
        assert_eq!(words.video_id.as_deref(), Some("v1"));
    }

    #[test]
    fn token_wire_shape_and_conversion() {
        let token = ResolvedToken {
            source_word: "running".into(),
            gloss: "run".into(),
            media_type: MediaKind::Video,
            url: "http://h/asl/run/1.mp4".into(),
            match_source: MatchSource::WordLevelDataset,
        };
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["word"], "running");
        assert_eq!(json["type"], "video");
        assert_eq!(json["matchSource"], "word-level-dataset");

        let item: MediaItem = token.into();
        assert_eq!(item.word, "running");
        assert_eq!(item.gloss, "run");
    }

    #[test]
    fn response_uses_camel_case() {
        let resp = ResolveResponse {
            success: true,
            not_found_words: vec!["zebra".into()],
            ..ResolveResponse::default()
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["notFoundWords"][0], "zebra");
        assert!(json.get("videoId").is_none());
    }
}

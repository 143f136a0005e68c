//! Caption-cleaning request/response shapes.

use serde::{Deserialize, Serialize};

/// A caption as submitted for cleaning: either bare text or text with
/// optional timing (seconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaptionInput {
    Text(String),
    Timed {
        #[serde(default)]
        text: String,
        #[serde(default)]
        start: Option<f64>,
        #[serde(default)]
        end: Option<f64>,
    },
}

impl CaptionInput {
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Timed { text, .. } => text,
        }
    }
}

/// A cleaned caption with resolved timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedCaption {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub original: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceRequest {
    #[serde(default)]
    pub captions: Option<Vec<CaptionInput>>,
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceResponse {
    pub success: bool,
    pub original_count: usize,
    pub enhanced_count: usize,
    pub enhanced_captions: Vec<EnhancedCaption>,
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

//! Media references and playable items.
//!
//! A [`MediaRef`] is what the vocabulary index stores: a kind plus a
//! locator that is only turned into a URL at lookup time, because the
//! bare-filename encoding needs the owning gloss as its folder. A
//! [`MediaItem`] is what the playback controller consumes.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Whether a media reference is a clip or a still image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// A word-level sign clip, played to its natural end.
    #[default]
    Video,
    /// A still image (fingerspelled letter), held for a fixed duration.
    Image,
}

impl MediaKind {
    /// Infer the kind from a locator's file extension.
    ///
    /// Image extensions (`jpg`, `jpeg`, `png`, `gif`, `webp`) map to
    /// [`MediaKind::Image`]; everything else, including unknown or missing
    /// extensions, maps to [`MediaKind::Video`].
    pub fn from_locator(locator: &str) -> Self {
        let path = locator.split(['?', '#']).next().unwrap_or(locator);
        let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
        match file.rsplit_once('.') {
            Some((_, ext)) if IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => {
                Self::Image
            }
            _ => Self::Video,
        }
    }

    /// Parse an explicit `"video"` / `"image"` tag (case-insensitive).
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "video" => Some(Self::Video),
            "image" => Some(Self::Image),
            _ => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Image => write!(f, "image"),
        }
    }
}

/// One playable clip or image backing a gloss.
///
/// `locator` is stored exactly as the mapping artifact gave it. `mount` is
/// the URL path prefix under which the owning dataset's media directory is
/// served (for example `/asl`); it is shared by every reference loaded from
/// the same artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub kind: MediaKind,
    pub locator: String,
    pub mount: Arc<str>,
}

impl MediaRef {
    pub fn new(kind: MediaKind, locator: impl Into<String>, mount: Arc<str>) -> Self {
        Self {
            kind,
            locator: locator.into(),
            mount,
        }
    }

    /// True when the locator is a bare filename that needs the gloss folder.
    pub fn is_bare(&self) -> bool {
        !self.locator.contains(['/', '\\'])
    }

    /// Path of this media relative to its mount.
    pub fn relative_path(&self, gloss: &str) -> String {
        if self.is_bare() {
            format!("{}/{}", encode_segment(gloss), encode_segment(&self.locator))
        } else {
            self.locator
                .replace('\\', "/")
                .trim_start_matches("./")
                .split('/')
                .map(encode_segment)
                .collect::<Vec<_>>()
                .join("/")
        }
    }

    /// Build the fetchable URL for this media under `base_url`.
    ///
    /// - `http://` / `https://` locators are returned unchanged.
    /// - Locators starting with `/` are server-absolute and joined to
    ///   `base_url` directly, skipping the mount.
    /// - Locators containing a separator are relative to the mount.
    /// - Bare filenames get `<gloss>/` prepended.
    pub fn url(&self, gloss: &str, base_url: &str) -> String {
        if self.locator.starts_with("http://") || self.locator.starts_with("https://") {
            return self.locator.clone();
        }
        let base = base_url.trim_end_matches('/');
        if self.locator.starts_with('/') {
            return format!("{base}{}", self.locator);
        }
        let mount = self.mount.trim_matches('/');
        let path = self.relative_path(gloss);
        if mount.is_empty() {
            format!("{base}/{path}")
        } else {
            format!("{base}/{mount}/{path}")
        }
    }
}

fn encode_segment(segment: &str) -> String {
    segment.replace('%', "%25").replace(' ', "%20")
}

/// A single playable entry in a playback queue.
///
/// `word` is the caption word this item signs (shown in the overlay);
/// `gloss` is the vocabulary entry or letter it was resolved through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(rename = "type", default)]
    pub kind: MediaKind,
    pub url: String,
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub gloss: String,
}

impl MediaItem {
    pub fn new(
        kind: MediaKind,
        url: impl Into<String>,
        word: impl Into<String>,
        gloss: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            url: url.into(),
            word: word.into(),
            gloss: gloss.into(),
        }
    }

    /// The text the caption overlay shows while this item plays.
    ///
    /// Falls back to the gloss when the source word is empty.
    pub fn caption(&self) -> &str {
        if self.word.is_empty() { &self.gloss } else { &self.word }
    }
}

//! Vocabulary index: gloss → ordered media references.
//!
//! Built once from one or more mapping artifacts and read-only afterwards.
//! An artifact is a JSON object keyed by gloss whose values come in three
//! historical encodings, all normalized into `Vec<MediaRef>` at load time:
//!
//! ```text
//! { "hello": "/asl-videos/hello/clip.mp4" }             legacy single path
//! { "hello": ["69241.mp4", "69242.mp4"] }                bare filenames
//! { "hello": [{ "url": "a/1.jpeg", "type": "image" }] }  processed objects
//! ```
//!
//! Keys are trimmed and lowercased. Entries whose value is empty or
//! malformed are skipped, so a present key never maps to an empty list.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use signify_types::{Gloss, MediaKind, MediaRef, Result, SignifyError};

/// In-memory gloss → media index.
#[derive(Debug, Clone, Default)]
pub struct VocabularyIndex {
    entries: HashMap<Gloss, Vec<MediaRef>>,
    /// Glosses in artifact insertion order.
    order: Vec<Gloss>,
}

impl VocabularyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an artifact from JSON text. `mount` is the URL path its media
    /// directory is served under.
    pub fn from_json_str(json: &str, mount: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_artifact(&value, mount)
    }

    /// Build an index from a parsed artifact.
    pub fn from_artifact(artifact: &Value, mount: &str) -> Result<Self> {
        let Value::Object(map) = artifact else {
            return Err(SignifyError::ConfigInvalid {
                reason: "vocabulary artifact must be a JSON object".into(),
            });
        };

        let mount: Arc<str> = Arc::from(mount);
        let mut index = Self::new();
        for (key, value) in map {
            let gloss = key.trim().to_lowercase();
            if gloss.is_empty() {
                debug!(key = %key, "skipping vocabulary entry with empty gloss");
                continue;
            }
            let refs = parse_entry(value, &mount);
            if refs.is_empty() {
                debug!(gloss = %gloss, "skipping vocabulary entry with no valid media");
                continue;
            }
            index.push(gloss, refs);
        }
        Ok(index)
    }

    /// Load an artifact from disk.
    ///
    /// A missing file or an unparsable one is not fatal: it is logged and an
    /// empty index is returned, so lookups fall through to later tiers.
    pub fn load_file(path: &Path, mount: &str) -> Self {
        if !path.exists() {
            warn!(path = %path.display(), "vocabulary artifact not found, continuing without it");
            return Self::new();
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read vocabulary artifact");
                return Self::new();
            }
        };
        match Self::from_json_str(&contents, mount) {
            Ok(index) => {
                info!(
                    path = %path.display(),
                    glosses = index.len(),
                    "loaded vocabulary artifact"
                );
                index
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "malformed vocabulary artifact");
                Self::new()
            }
        }
    }

    /// Merge another index into this one. Media for glosses present in both
    /// are appended after the existing ones, so earlier datasets keep
    /// priority.
    pub fn extend(&mut self, other: VocabularyIndex) {
        let VocabularyIndex { mut entries, order } = other;
        for gloss in order {
            if let Some(refs) = entries.remove(&gloss) {
                self.push(gloss, refs);
            }
        }
    }

    /// All media for a gloss, in artifact order.
    pub fn lookup(&self, gloss: &str) -> Option<&[MediaRef]> {
        self.entries.get(gloss).map(Vec::as_slice)
    }

    /// The first-listed media for a gloss.
    pub fn first(&self, gloss: &str) -> Option<&MediaRef> {
        self.lookup(gloss).and_then(<[MediaRef]>::first)
    }

    pub fn contains(&self, gloss: &str) -> bool {
        self.entries.contains_key(gloss)
    }

    /// Glosses in insertion order.
    pub fn glosses(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn push(&mut self, gloss: Gloss, refs: Vec<MediaRef>) {
        match self.entries.get_mut(&gloss) {
            Some(existing) => existing.extend(refs),
            None => {
                self.order.push(gloss.clone());
                self.entries.insert(gloss, refs);
            }
        }
    }
}

fn parse_entry(value: &Value, mount: &Arc<str>) -> Vec<MediaRef> {
    match value {
        Value::String(locator) => parse_locator(locator, None, mount).into_iter().collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| parse_item(item, mount))
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_item(item: &Value, mount: &Arc<str>) -> Option<MediaRef> {
    match item {
        Value::String(locator) => parse_locator(locator, None, mount),
        Value::Object(obj) => {
            let locator = obj.get("url").or_else(|| obj.get("path"))?.as_str()?;
            let kind = obj.get("type").and_then(Value::as_str).and_then(MediaKind::parse);
            parse_locator(locator, kind, mount)
        }
        _ => None,
    }
}

fn parse_locator(locator: &str, kind: Option<MediaKind>, mount: &Arc<str>) -> Option<MediaRef> {
    let locator = locator.trim();
    if locator.is_empty() {
        return None;
    }
    let kind = kind.unwrap_or_else(|| MediaKind::from_locator(locator));
    Some(MediaRef::new(kind, locator, Arc::clone(mount)))
}

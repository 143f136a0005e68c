//! Fingerspelling: one representative still image per letter or digit.
//!
//! The store is filled once at startup from, in priority order:
//!
//! 1. `<fingerspelling_dir>/<c>.png`, served under [`FINGERSPELLING_MOUNT`];
//! 2. the first image (by file name) in `<letter_dataset_dir>/<c>/`, served
//!    under [`LETTER_DATASET_MOUNT`];
//! 3. single-character glosses in the vocabulary index whose first media is
//!    an image ([`LetterImageStore::absorb_index`]).
//!
//! A source never overrides a letter already provided by an earlier one.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use signify_types::{MediaKind, MediaRef};

use crate::vocabulary::VocabularyIndex;

/// URL path the fingerspelling directory is served under.
pub const FINGERSPELLING_MOUNT: &str = "/fingerspelling";

/// URL path the per-letter dataset directory is served under.
pub const LETTER_DATASET_MOUNT: &str = "/asl";

/// A resolved letter image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterImage {
    pub letter: char,
    pub media: MediaRef,
}

impl LetterImage {
    /// Fetchable URL of this letter's image.
    pub fn url(&self, base_url: &str) -> String {
        self.media.url(&self.letter.to_string(), base_url)
    }
}

/// Letter/digit → image reference.
#[derive(Debug, Clone, Default)]
pub struct LetterImageStore {
    letters: HashMap<char, MediaRef>,
}

impl LetterImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan both letter directories. Missing directories are logged and
    /// contribute nothing.
    pub fn scan(fingerspelling_dir: &Path, letter_dataset_dir: &Path) -> Self {
        let mut store = Self::new();

        if fingerspelling_dir.is_dir() {
            let mount: Arc<str> = Arc::from(FINGERSPELLING_MOUNT);
            for c in alphabet() {
                let file = format!("{c}.png");
                if fingerspelling_dir.join(&file).is_file() {
                    let locator = format!("{FINGERSPELLING_MOUNT}/{file}");
                    store.insert(c, MediaRef::new(MediaKind::Image, locator, Arc::clone(&mount)));
                }
            }
        } else {
            warn!(path = %fingerspelling_dir.display(), "fingerspelling directory not found");
        }

        if letter_dataset_dir.is_dir() {
            let mount: Arc<str> = Arc::from(LETTER_DATASET_MOUNT);
            for c in alphabet() {
                if store.get(c).is_some() {
                    continue;
                }
                if let Some(file) = first_image_in(&letter_dataset_dir.join(c.to_string())) {
                    let locator = format!("{c}/{file}");
                    store.insert(c, MediaRef::new(MediaKind::Image, locator, Arc::clone(&mount)));
                }
            }
        } else {
            debug!(path = %letter_dataset_dir.display(), "letter dataset directory not found");
        }

        info!(letters = store.len(), "letter image store scanned");
        store
    }

    /// Fill gaps from single-character glosses of the index.
    pub fn absorb_index(&mut self, index: &VocabularyIndex) {
        let mut added = 0usize;
        for gloss in index.glosses() {
            let mut chars = gloss.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                continue;
            };
            if !c.is_ascii_alphanumeric() || self.letters.contains_key(&c) {
                continue;
            }
            if let Some(media) = index.first(gloss).filter(|m| m.kind == MediaKind::Image) {
                self.letters.insert(c, media.clone());
                added += 1;
            }
        }
        if added > 0 {
            debug!(added, "letters taken from vocabulary index");
        }
    }

    /// Register an image for a letter unless one is already present.
    pub fn insert(&mut self, letter: char, media: MediaRef) {
        self.letters
            .entry(letter.to_ascii_lowercase())
            .or_insert(media);
    }

    pub fn get(&self, letter: char) -> Option<&MediaRef> {
        self.letters.get(&letter.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Spell a word letter by letter.
    ///
    /// Non-alphanumeric characters are stripped. Letters without art are
    /// skipped, never replaced by a placeholder, so the result may be
    /// shorter than the word or empty.
    pub fn spell_out(&self, word: &str) -> Vec<LetterImage> {
        word.chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .filter_map(|letter| {
                self.letters.get(&letter).map(|media| LetterImage {
                    letter,
                    media: media.clone(),
                })
            })
            .collect()
    }
}

fn alphabet() -> impl Iterator<Item = char> {
    ('a'..='z').chain('0'..='9')
}

fn first_image_in(dir: &Path) -> Option<String> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut images: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| MediaKind::from_locator(name) == MediaKind::Image)
        .collect();
    images.sort();
    images.into_iter().next()
}

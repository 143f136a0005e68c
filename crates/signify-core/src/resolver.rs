//! Sequence resolver: caption words → ordered playable media.
//!
//! Each word is normalized and then tried against the tiers in strict
//! order, stopping at the first that yields media:
//!
//! 1. the vocabulary index (first-listed media of the gloss);
//! 2. the curated fallback table, keyed by the cleaned source word;
//! 3. fingerspelling of the source word, one item per letter with art.
//!
//! Words that survive normalization but miss every tier are reported in
//! `not_found_words`. Only when the whole caption produced nothing does a
//! looser containment pass run over the index glosses.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use signify_types::config::PartialMatchConfig;
use signify_types::{
    Config, Gloss, MatchSource, MediaKind, MediaRef, ResolveRequest, ResolveResponse,
    ResolvedToken, Result, WordMapping,
};

use crate::fingerspell::LetterImageStore;
use crate::gloss::{GlossNormalizer, clean_token, tokenize};
use crate::vocabulary::VocabularyIndex;

/// Resolves caption text into a playback sequence.
///
/// Immutable after construction and safe to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SequenceResolver {
    normalizer: GlossNormalizer,
    index: VocabularyIndex,
    letters: LetterImageStore,
    fallback: HashMap<String, MediaRef>,
    partial: PartialMatchConfig,
    base_url: String,
}

impl SequenceResolver {
    pub fn new(index: VocabularyIndex, letters: LetterImageStore, base_url: impl Into<String>) -> Self {
        Self {
            normalizer: GlossNormalizer::new(),
            index,
            letters,
            fallback: HashMap::new(),
            partial: PartialMatchConfig::default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: GlossNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Set the curated fallback table (literal word → clip locator).
    ///
    /// Locators follow the same rules as vocabulary media with an empty
    /// mount: absolute URLs pass through, `/`-prefixed paths are joined to
    /// the base URL.
    pub fn with_fallback_clips(mut self, clips: HashMap<String, String>) -> Self {
        let mount: Arc<str> = Arc::from("");
        self.fallback = clips
            .into_iter()
            .filter(|(_, locator)| !locator.trim().is_empty())
            .map(|(word, locator)| {
                let locator = locator.trim().to_string();
                let kind = MediaKind::from_locator(&locator);
                (clean_token(&word), MediaRef::new(kind, locator, Arc::clone(&mount)))
            })
            .collect();
        self
    }

    pub fn with_partial_match(mut self, partial: PartialMatchConfig) -> Self {
        self.partial = partial;
        self
    }

    /// Load every configured dataset, scan the letter directories and
    /// assemble a resolver.
    pub fn from_config(config: &Config) -> Self {
        let data = &config.data;

        let mut index = VocabularyIndex::new();
        for dataset in &data.datasets {
            let path = data.resolve_path(&dataset.mapping);
            debug!(dataset = %dataset.name, path = %path.display(), "loading dataset");
            index.extend(VocabularyIndex::load_file(&path, &dataset.mount));
        }

        let mut letters = LetterImageStore::scan(
            &data.resolve_path(&data.fingerspelling_dir),
            &data.resolve_path(&data.letter_dataset_dir),
        );
        letters.absorb_index(&index);

        Self::new(index, letters, config.server.public_base_url())
            .with_fallback_clips(data.fallback_clips.clone())
            .with_partial_match(data.partial_match.clone())
    }

    pub fn index(&self) -> &VocabularyIndex {
        &self.index
    }

    pub fn letters(&self) -> &LetterImageStore {
        &self.letters
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a wire request. `words` wins over `text` when both are set.
    pub fn resolve_request(&self, request: &ResolveRequest) -> Result<ResolveResponse> {
        request.validate()?;
        let mut response = match (&request.words, &request.text) {
            (Some(words), _) => self.resolve_words(words),
            (None, Some(text)) => self.resolve_text(text),
            (None, None) => ResolveResponse::default(),
        };
        response.video_id = request.video_id.clone();
        Ok(response)
    }

    /// Tokenize freeform caption text and resolve it.
    pub fn resolve_text(&self, text: &str) -> ResolveResponse {
        self.resolve_words(&tokenize(text))
    }

    /// Resolve caller-tokenized words, in order.
    ///
    /// Repeated words are resolved independently and each contributes its
    /// own items.
    pub fn resolve_words<S: AsRef<str>>(&self, words: &[S]) -> ResolveResponse {
        let mut out = Resolution::default();

        for raw in words {
            let Some(gloss) = self.normalizer.normalize(raw.as_ref()) else {
                continue;
            };
            let source_word = clean_token(raw.as_ref());
            self.resolve_one(source_word, gloss, &mut out);
        }

        if out.sequence.is_empty() && self.partial.enabled && !out.not_found.is_empty() {
            self.resolve_partial(&mut out);
        }

        debug!(
            words = words.len(),
            items = out.sequence.len(),
            found = out.found.len(),
            not_found = out.not_found.len(),
            "resolved caption"
        );

        ResolveResponse {
            success: true,
            sequence: out.sequence,
            found_words: out.found,
            not_found_words: out.not_found,
            mappings: out.mappings,
            video_id: None,
        }
    }

    fn resolve_one(&self, source_word: String, gloss: Gloss, out: &mut Resolution) {
        if let Some(media) = self.index.first(&gloss) {
            let url = media.url(&gloss, &self.base_url);
            out.push_token(&source_word, &gloss, media.kind, url, MatchSource::WordLevelDataset);
            out.record(source_word, gloss, MatchSource::WordLevelDataset, 1);
            return;
        }

        if let Some(media) = self.fallback.get(&source_word) {
            let url = media.url(&source_word, &self.base_url);
            out.push_token(&source_word, &gloss, media.kind, url, MatchSource::DemoFallbackDatabase);
            out.record(source_word, gloss, MatchSource::DemoFallbackDatabase, 1);
            return;
        }

        let letters = self.letters.spell_out(&source_word);
        if !letters.is_empty() {
            for letter in &letters {
                out.push_token(
                    &source_word,
                    &letter.letter.to_string(),
                    letter.media.kind,
                    letter.url(&self.base_url),
                    MatchSource::Fingerspell,
                );
            }
            out.record(source_word, gloss, MatchSource::Fingerspell, letters.len());
            return;
        }

        out.record(source_word, gloss, MatchSource::NoMatch, 0);
    }

    /// Containment fallback over the whole caption. Runs only when the
    /// strict tiers produced no items at all.
    fn resolve_partial(&self, out: &mut Resolution) {
        let min_len = self.partial.min_len;
        let mut matched: HashMap<Gloss, Option<Gloss>> = HashMap::new();

        for i in 0..out.mappings.len() {
            if out.mappings[i].match_source != MatchSource::NoMatch {
                continue;
            }
            let word_gloss = out.mappings[i].gloss.clone();
            let key = matched
                .entry(word_gloss.clone())
                .or_insert_with(|| self.containment_match(&word_gloss, min_len))
                .clone();
            let Some(key) = key else {
                continue;
            };
            let Some(media) = self.index.first(&key) else {
                continue;
            };

            let source_word = out.mappings[i].word.clone();
            let url = media.url(&key, &self.base_url);
            out.push_token(&source_word, &key, media.kind, url, MatchSource::PartialMatch);
            out.mappings[i].match_source = MatchSource::PartialMatch;
            out.mappings[i].items = 1;
            out.mark_found(&word_gloss);
        }

        if !out.sequence.is_empty() {
            debug!(items = out.sequence.len(), "caption resolved through partial matches");
        }
    }

    fn containment_match(&self, word: &str, min_len: usize) -> Option<Gloss> {
        if word.len() < min_len {
            return None;
        }
        self.index
            .glosses()
            .filter(|key| key.len() >= min_len)
            .find(|key| key.contains(word) || word.contains(key))
            .map(str::to_string)
    }
}

#[derive(Default)]
struct Resolution {
    sequence: Vec<ResolvedToken>,
    found: Vec<Gloss>,
    not_found: Vec<Gloss>,
    mappings: Vec<WordMapping>,
}

impl Resolution {
    fn push_token(&mut self, source_word: &str, gloss: &str, kind: MediaKind, url: String, source: MatchSource) {
        self.sequence.push(ResolvedToken {
            source_word: source_word.to_string(),
            gloss: gloss.to_string(),
            media_type: kind,
            url,
            match_source: source,
        });
    }

    fn record(&mut self, word: String, gloss: Gloss, source: MatchSource, items: usize) {
        if source == MatchSource::NoMatch {
            if !self.found.contains(&gloss) && !self.not_found.contains(&gloss) {
                self.not_found.push(gloss.clone());
            }
        } else {
            self.mark_found(&gloss);
        }
        self.mappings.push(WordMapping {
            word,
            gloss,
            match_source: source,
            items,
        });
    }

    fn mark_found(&mut self, gloss: &str) {
        self.not_found.retain(|g| g != gloss);
        if !self.found.iter().any(|g| g == gloss) {
            self.found.push(gloss.to_string());
        }
    }
}

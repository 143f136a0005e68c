//! Gloss normalization.
//!
//! Maps an English caption word to a canonical sign-vocabulary entry, or
//! drops it when it is a stop word with no distinct sign. Precedence is
//! fixed: stop words, then exact word-form mappings, then registered
//! suffix pairings, then pass-through.

use std::collections::{HashMap, HashSet};

use signify_types::Gloss;

/// Articles, prepositions, conjunctions, auxiliary be/have/do forms, modal
/// verbs, demonstratives and degree adverbs.
const STOP_WORDS: &[&str] = &[
    "a", "an", "the",
    "to", "of", "for", "with", "on", "at", "by", "from", "up", "about", "into", "through", "during",
    "and", "or", "but", "so", "if", "then", "than", "because",
    "is", "are", "was", "were", "be", "been", "being", "am",
    "have", "has", "had", "do", "does", "did",
    "will", "would", "could", "should", "may", "might", "can",
    "this", "that", "these", "those",
    "very", "really", "quite", "too", "also", "just", "only", "even", "still", "yet",
];

/// Irregular verb forms, slang, and plural-to-singular pairs.
const WORD_FORMS: &[(&str, &str)] = &[
    // Verb forms
    ("running", "run"), ("ran", "run"), ("runs", "run"),
    ("walking", "walk"), ("walked", "walk"), ("walks", "walk"),
    ("going", "go"), ("went", "go"), ("goes", "go"),
    ("coming", "come"), ("came", "come"), ("comes", "come"),
    ("doing", "do"), ("did", "do"), ("does", "do"), ("done", "do"),
    ("saying", "say"), ("said", "say"), ("says", "say"),
    ("telling", "tell"), ("told", "tell"), ("tells", "tell"),
    ("seeing", "see"), ("saw", "see"), ("sees", "see"),
    ("looking", "look"), ("looked", "look"), ("looks", "look"),
    ("watching", "watch"), ("watched", "watch"), ("watches", "watch"),
    ("knowing", "know"), ("knew", "know"), ("knows", "know"),
    ("thinking", "think"), ("thought", "think"), ("thinks", "think"),
    ("feeling", "feel"), ("felt", "feel"), ("feels", "feel"),
    ("wanting", "want"), ("wanted", "want"), ("wants", "want"),
    ("needing", "need"), ("needed", "need"), ("needs", "need"),
    ("liking", "like"), ("liked", "like"), ("likes", "like"),
    ("loving", "love"), ("loved", "love"), ("loves", "love"),
    ("getting", "get"), ("got", "get"), ("gets", "get"),
    ("giving", "give"), ("gave", "give"), ("gives", "give"),
    ("taking", "take"), ("took", "take"), ("takes", "take"),
    ("making", "make"), ("made", "make"), ("makes", "make"),
    // Slang and common variations
    ("yeah", "yes"), ("yep", "yes"), ("yup", "yes"),
    ("nope", "no"), ("nah", "no"),
    ("hi", "hello"), ("hey", "hello"),
    ("thanks", "thank"), ("thankyou", "thank"),
    ("welcome", "welcome"),
    ("okay", "ok"), ("ok", "ok"),
    // Plural to singular
    ("hands", "hand"), ("people", "person"), ("children", "child"),
    ("men", "man"), ("women", "woman"), ("friends", "friend"),
    ("families", "family"), ("things", "thing"), ("ways", "way"),
    ("places", "place"), ("parts", "part"), ("kinds", "kind"),
    ("sorts", "sort"), ("types", "type"), ("days", "day"),
    ("weeks", "week"), ("months", "month"), ("years", "year"),
    ("hours", "hour"), ("minutes", "minute"), ("seconds", "second"),
    ("countries", "country"), ("cities", "city"), ("homes", "home"),
    ("houses", "house"), ("schools", "school"), ("works", "work"),
];

/// Suffix heuristics in the order they are tried: `(suffix, min_len)`,
/// where the word must be strictly longer than `min_len`.
const SUFFIX_RULES: &[(&str, usize)] = &[("s", 3), ("ing", 4), ("ed", 3)];

/// Normalizes caption words into glosses.
#[derive(Debug, Clone)]
pub struct GlossNormalizer {
    stop_words: HashSet<String>,
    word_forms: HashMap<String, String>,
}

impl Default for GlossNormalizer {
    fn default() -> Self {
        Self::from_tables(
            STOP_WORDS.iter().copied(),
            WORD_FORMS.iter().copied(),
        )
    }
}

impl GlossNormalizer {
    /// Normalizer with the built-in stop-word and word-form tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a normalizer from explicit tables.
    pub fn from_tables<'a>(
        stop_words: impl IntoIterator<Item = &'a str>,
        word_forms: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self {
            stop_words: stop_words.into_iter().map(str::to_string).collect(),
            word_forms: word_forms
                .into_iter()
                .map(|(form, base)| (form.to_string(), base.to_string()))
                .collect(),
        }
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Normalize one word. `None` means the word is dropped.
    ///
    /// Words that clean down to nothing (pure punctuation) are dropped too.
    pub fn normalize(&self, word: &str) -> Option<Gloss> {
        let token = clean_token(word);
        if token.is_empty() || self.is_stop_word(&token) {
            return None;
        }

        if let Some(base) = self.word_forms.get(&token) {
            return Some(base.clone());
        }

        for (suffix, min_len) in SUFFIX_RULES {
            if token.len() > *min_len {
                if let Some(base) = token.strip_suffix(suffix) {
                    if self.is_registered_pair(base, suffix) {
                        return Some(base.to_string());
                    }
                }
            }
        }

        Some(token)
    }

    /// Normalize a batch, returning unique glosses in first-seen order.
    pub fn normalize_all<I, S>(&self, words: I) -> Vec<Gloss>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        words
            .into_iter()
            .filter_map(|w| self.normalize(w.as_ref()))
            .filter(|g| seen.insert(g.clone()))
            .collect()
    }

    fn is_registered_pair(&self, base: &str, suffix: &str) -> bool {
        self.word_forms
            .get(&format!("{base}{suffix}"))
            .is_some_and(|mapped| mapped == base)
    }
}

/// Lowercase and trim a word, keep only word characters, whitespace and
/// apostrophes, then drop the apostrophes so contractions collapse
/// (`"Don't!"` becomes `"dont"`).
pub fn clean_token(word: &str) -> String {
    word.trim()
        .to_lowercase()
        .chars()
        .filter(|c| is_word_char(*c) || c.is_whitespace())
        .collect()
}

/// Split caption text into lowercase word tokens.
///
/// Apostrophes are elided before splitting so contractions survive as a
/// single token; every other non-word character acts as a separator.
pub fn tokenize(text: &str) -> Vec<String> {
    let spaced: String = text
        .to_lowercase()
        .chars()
        .filter(|c| *c != '\'')
        .map(|c| if is_word_char(c) { c } else { ' ' })
        .collect();
    spaced.split_whitespace().map(str::to_string).collect()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

//! Word-to-sign resolution for signify.
//!
//! Turns caption text into an ordered sequence of playable sign media:
//!
//! - [`gloss`]: word → gloss normalization and tokenization
//! - [`vocabulary`]: the gloss → media index loaded from mapping artifacts
//! - [`fingerspell`]: the per-letter image store
//! - [`resolver`]: the tiered [`SequenceResolver`]
//! - [`captions`]: caption cleaning for the enhance endpoint
//! - [`config_loader`]: configuration discovery
//!
//! Everything here is synchronous; the index and letter store are built
//! once and only read afterwards.

pub mod captions;
pub mod config_loader;
pub mod fingerspell;
pub mod gloss;
pub mod resolver;
pub mod vocabulary;

pub use fingerspell::{LetterImage, LetterImageStore};
pub use gloss::{GlossNormalizer, clean_token, tokenize};
pub use resolver::SequenceResolver;
pub use vocabulary::VocabularyIndex;

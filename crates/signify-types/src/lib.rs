//! Core types for the signify sign-language overlay.
//!
//! This crate holds the data model shared by the resolution backend and the
//! playback client: glosses, media references, resolved sequences, the
//! request/response shapes of the resolve and caption-cleaning endpoints,
//! and the typed configuration. It performs no I/O.
//!
//! # Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`media`] | [`MediaKind`], [`MediaRef`], [`MediaItem`] |
//! | [`resolve`] | [`ResolveRequest`], [`ResolveResponse`], [`ResolvedToken`], [`MatchSource`] |
//! | [`captions`] | Caption-cleaning request/response shapes |
//! | [`config`] | [`Config`] and its sections |
//! | [`error`] | [`SignifyError`] |

pub mod captions;
pub mod config;
pub mod error;
pub mod media;
pub mod resolve;

pub use config::Config;
pub use error::{Result, SignifyError};
pub use media::{MediaItem, MediaKind, MediaRef};
pub use resolve::{MatchSource, ResolveRequest, ResolveResponse, ResolvedToken, WordMapping};

/// A canonical lowercase token naming one sign-vocabulary entry.
pub type Gloss = String;

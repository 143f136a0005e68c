//! Sequential sign playback for signify.
//!
//! A resolved sequence is played one item at a time: videos to their
//! natural end, letter images for a fixed hold, with a fixed pause between
//! items. A newer sequence always supersedes the one in flight.
//!
//! - [`machine`]: the I/O-free [`PlaybackMachine`]
//! - [`controller`]: the async driver and its [`PlaybackHandle`]
//! - [`surface`]: the [`MediaSurface`] rendering seam and [`CaptionOverlay`]
//! - [`fetch`]: the [`MediaFetcher`] seam and its HTTP implementation
//! - [`client`]: resolve-service clients
//! - [`session`]: caption de-duplication and outage handling

pub mod client;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod machine;
pub mod session;
pub mod surface;

pub use client::{HttpResolveClient, LocalResolveClient, ResolveClient};
pub use controller::{ControllerOptions, PlaybackController, PlaybackHandle, PlaybackSnapshot};
pub use error::{FetchError, PlayerError, ResolveError, SurfaceError};
pub use fetch::{HttpMediaFetcher, MediaFetcher, MediaPayload};
pub use machine::{Command, PlaybackMachine, PlaybackState, PlaybackStatus, Ticket, Timing};
pub use session::{CaptionOutcome, CaptionSession};
pub use surface::{CaptionOverlay, MediaSurface};

//! HTTP service for signify.
//!
//! Exposes the sequence resolver over `POST /api/asl/video-map`, a caption
//! cleaning endpoint, a health check, and the media directories the
//! resolved URLs point into.

pub mod api;
pub mod error;
pub mod server;

pub use api::{ApiState, StaticMount, build_router, static_mounts};
pub use error::ApiError;
pub use server::{app, run, serve};

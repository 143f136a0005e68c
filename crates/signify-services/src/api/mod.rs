//! REST API for the signify backend.
//!
//! Serves the resolve and caption-cleaning endpoints under `/api`, plus the
//! media directories that resolved URLs point into.

pub mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use signify_core::SequenceResolver;
use signify_core::fingerspell::{FINGERSPELLING_MOUNT, LETTER_DATASET_MOUNT};
use signify_types::config::DataConfig;

/// Shared state accessible by all API handlers.
#[derive(Clone)]
pub struct ApiState {
    /// Built once at startup and only read afterwards.
    pub resolver: Arc<SequenceResolver>,
}

impl ApiState {
    pub fn new(resolver: Arc<SequenceResolver>) -> Self {
        Self { resolver }
    }
}

/// A directory served verbatim under a URL prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticMount {
    pub mount: String,
    pub dir: PathBuf,
}

/// Every media mount the data config implies: one per dataset, then the
/// fingerspelling and letter-dataset directories.
///
/// A prefix claimed twice keeps its first directory, so a dataset whose
/// mount matches `/asl` shadows the letter-dataset mount.
pub fn static_mounts(data: &DataConfig) -> Vec<StaticMount> {
    let candidates = data
        .datasets
        .iter()
        .map(|d| (d.mount.clone(), data.resolve_path(&d.media_dir)))
        .chain([
            (
                FINGERSPELLING_MOUNT.to_string(),
                data.resolve_path(&data.fingerspelling_dir),
            ),
            (
                LETTER_DATASET_MOUNT.to_string(),
                data.resolve_path(&data.letter_dataset_dir),
            ),
        ]);

    let mut mounts: Vec<StaticMount> = Vec::new();
    for (mount, dir) in candidates {
        let mount = mount.trim_end_matches('/').to_string();
        if mount.is_empty() || mount == "/api" {
            warn!(mount = %mount, "refusing to serve media at this prefix");
            continue;
        }
        if let Some(existing) = mounts.iter().find(|m| m.mount == mount) {
            if existing.dir != dir {
                debug!(mount = %mount, kept = %existing.dir.display(), dropped = %dir.display(), "mount already claimed");
            }
            continue;
        }
        mounts.push(StaticMount { mount, dir });
    }
    mounts
}

/// Build the API router with all routes and media mounts.
pub fn build_router(state: ApiState, cors_origins: &[String], mounts: &[StaticMount]) -> Router {
    handlers::mark_started();

    let cors = if cors_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<_> = cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let mut router = Router::new().nest("/api", handlers::api_routes());
    for m in mounts {
        debug!(mount = %m.mount, dir = %m.dir.display(), "serving media");
        router = router.nest_service(&m.mount, ServeDir::new(&m.dir));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

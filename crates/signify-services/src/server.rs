//! Process-level wiring: config → resolver → router → listener.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use signify_core::SequenceResolver;
use signify_types::Config;

use crate::api::{self, ApiState};
use crate::error::Result;

/// Load the vocabulary and letter images the config points at and build
/// the full application router.
pub fn app(config: &Config) -> Router {
    let resolver = SequenceResolver::from_config(config);
    info!(
        words = resolver.index().len(),
        letters = resolver.letters().len(),
        base_url = %resolver.base_url(),
        "vocabulary ready"
    );
    let mounts = api::static_mounts(&config.data);
    api::build_router(
        ApiState::new(Arc::new(resolver)),
        &config.server.cors_origins,
        &mounts,
    )
}

/// Serve `router` on `listener` until `shutdown` is cancelled.
pub async fn serve(listener: TcpListener, router: Router, shutdown: CancellationToken) -> Result<()> {
    let addr = listener.local_addr()?;
    info!(addr = %addr, "server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;
    info!("server stopped");
    Ok(())
}

/// Bind the configured host and port and serve until `shutdown`.
pub async fn run(config: &Config, shutdown: CancellationToken) -> Result<()> {
    let router = app(config);
    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    serve(listener, router, shutdown).await
}

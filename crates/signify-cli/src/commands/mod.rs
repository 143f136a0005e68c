//! CLI command implementations for `signify`.
//!
//! - [`serve`] -- HTTP API and static media.
//! - [`resolve`] -- One-shot resolution, printed as JSON or a table.
//! - [`play`] -- Resolution plus playback against a logging surface.
//! - [`config_cmd`] -- Configuration display.

pub mod config_cmd;
pub mod play;
pub mod resolve;
pub mod serve;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use signify_core::SequenceResolver;
use signify_player::{HttpResolveClient, LocalResolveClient, ResolveClient};
use signify_types::Config;

/// Load configuration from the given path override or via auto-discovery.
pub fn load_config(config_override: Option<&Path>) -> anyhow::Result<Config> {
    signify_core::config_loader::load_config(config_override).context("failed to load configuration")
}

/// A resolve client: in-process against the configured data, or over HTTP
/// against `client.backend_url` when `remote` is set.
pub fn resolve_client(config: &Config, remote: bool) -> anyhow::Result<Arc<dyn ResolveClient>> {
    if remote {
        let timeout = Duration::from_millis(config.client.request_timeout_ms);
        let client = HttpResolveClient::new(&config.client.backend_url, timeout)
            .context("failed to build HTTP client")?;
        tracing::debug!(endpoint = %client.endpoint(), "resolving remotely");
        return Ok(Arc::new(client));
    }
    let resolver = SequenceResolver::from_config(config);
    tracing::debug!(
        words = resolver.index().len(),
        letters = resolver.letters().len(),
        "resolving locally"
    );
    Ok(Arc::new(LocalResolveClient::new(Arc::new(resolver))))
}

//! `signify serve` -- run the HTTP API.
//!
//! Loads the configured datasets and letter images once, then serves
//! `/api/*` and the media mounts until Ctrl-C.

use std::path::PathBuf;

use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::info;

use signify_types::Config;

/// Arguments for `signify serve`.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind (overrides `server.host`).
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides `server.port` and `PORT`).
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Data directory holding mapping artifacts and media (overrides `data.data_dir`).
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

impl ServeArgs {
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = self.data_dir {
            config.data.data_dir = dir;
        }
    }
}

pub async fn run(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config);
    config.validate()?;

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received shutdown signal");
        }
        signal.cancel();
    });

    signify_services::run(&config, shutdown).await?;
    Ok(())
}

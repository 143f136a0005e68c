//! `signify play` -- resolve a caption and drive the playback controller.
//!
//! Media is fetched over HTTP from the URLs in the resolved sequence, so
//! local resolution needs `signify serve` running at the public base URL.
//! Rendering goes to a [`LogSurface`] that prints each step and stands in
//! for a clip's length with a fixed delay.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::Args;
use tracing::info;

use signify_player::{
    CaptionOutcome, CaptionSession, ControllerOptions, HttpMediaFetcher, MediaPayload, MediaSurface,
    PlaybackController, PlaybackStatus, SurfaceError,
};
use signify_types::{Config, MediaItem};

/// Arguments for `signify play`.
#[derive(Args)]
pub struct PlayArgs {
    /// Caption text (joined with spaces).
    #[arg(required = true)]
    pub text: Vec<String>,

    /// Ask the configured backend instead of resolving in-process.
    #[arg(long)]
    pub remote: bool,

    /// How long each video is "played", in milliseconds.
    #[arg(long, default_value = "1000")]
    pub clip_ms: u64,

    /// Hide the caption line.
    #[arg(long)]
    pub no_captions: bool,
}

/// Prints every surface call to stdout.
pub struct LogSurface {
    clip: Duration,
}

impl LogSurface {
    pub fn new(clip: Duration) -> Self {
        Self { clip }
    }
}

#[async_trait]
impl MediaSurface for LogSurface {
    async fn load(&self, item: &MediaItem, payload: MediaPayload) -> Result<(), SurfaceError> {
        if payload.is_empty() {
            return Err(SurfaceError::Decode(format!("{} is empty", item.url)));
        }
        tracing::debug!(url = %item.url, bytes = payload.len(), "loaded");
        Ok(())
    }

    async fn play_video(&self, item: &MediaItem) -> Result<(), SurfaceError> {
        println!("  ▶ {:<16} {}", item.gloss, item.url);
        tokio::time::sleep(self.clip).await;
        Ok(())
    }

    async fn show_image(&self, item: &MediaItem) -> Result<(), SurfaceError> {
        println!("  ■ {:<16} {}", item.gloss, item.url);
        Ok(())
    }

    async fn clear(&self) {}

    async fn show_caption(&self, text: Option<&str>) {
        if let Some(text) = text {
            println!("[{text}]");
        }
    }

    async fn show_notice(&self, notice: Option<&str>) {
        if let Some(notice) = notice {
            println!("! {notice}");
        }
    }
}

pub async fn run(args: PlayArgs, config: Config) -> anyhow::Result<()> {
    let text = args.text.join(" ");
    let client = super::resolve_client(&config, args.remote)?;

    let mut options = ControllerOptions::from_config(&config.playback, &config.display);
    options.avatar_enabled = true;
    options.captions_visible = !args.no_captions;

    let controller = PlaybackController::spawn(
        Arc::new(HttpMediaFetcher::new()),
        Arc::new(LogSurface::new(Duration::from_millis(args.clip_ms))),
        options,
    );
    let mut session = CaptionSession::new(client, controller.handle());
    let mut state = controller.handle().subscribe();

    match session.on_caption(&text).await? {
        CaptionOutcome::Submitted { items, not_found } => {
            if !not_found.is_empty() {
                println!("not found: {}", not_found.join(", "));
            }
            if items > 0 {
                tokio::select! {
                    done = state.wait_for(|s| s.generation > 0 && s.status == PlaybackStatus::Idle) => {
                        done?;
                        info!(items, "sequence finished");
                    }
                    _ = tokio::signal::ctrl_c() => info!("interrupted"),
                }
            }
        }
        CaptionOutcome::NoWords | CaptionOutcome::Duplicate => println!("nothing to sign"),
        CaptionOutcome::Unavailable => {
            controller.shutdown().await;
            anyhow::bail!("resolve service unavailable");
        }
    }

    controller.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_payload_fails_to_load() {
        let surface = LogSurface::new(Duration::ZERO);
        let item = MediaItem::new(signify_types::MediaKind::Image, "http://h/a.png", "a", "a");
        let err = surface
            .load(&item, MediaPayload::new(Vec::new(), None))
            .await
            .unwrap_err();
        assert!(matches!(err, SurfaceError::Decode(_)));
        assert!(surface.load(&item, MediaPayload::new(b"png".to_vec(), None)).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn video_plays_for_clip_length() {
        let surface = LogSurface::new(Duration::from_millis(800));
        let item = MediaItem::new(signify_types::MediaKind::Video, "http://h/v.mp4", "hi", "hello");
        let start = tokio::time::Instant::now();
        surface.play_video(&item).await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(800));
    }
}

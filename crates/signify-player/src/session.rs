//! Caption session: the glue between incoming captions and playback.
//!
//! Each caption the extractor reports goes through [`CaptionSession::on_caption`].
//! Repeats of the previous caption and captions with no words are ignored.
//! Anything else is resolved and handed to the controller, which
//! supersedes whatever was playing. A caption whose words resolve to no
//! media stops the previous sequence. If the resolve service cannot be
//! reached, a notice is raised on the surface and current playback is
//! left alone; the next successful resolve clears it.

use std::sync::Arc;

use tracing::{debug, warn};

use signify_core::tokenize;
use signify_types::{MediaItem, ResolveRequest};

use crate::client::ResolveClient;
use crate::controller::PlaybackHandle;
use crate::error::PlayerError;

pub const SERVICE_UNAVAILABLE_NOTICE: &str = "Sign language service unavailable";

/// What happened to one caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionOutcome {
    /// Same text as the previous caption.
    Duplicate,
    /// No word tokens in the caption.
    NoWords,
    /// Resolved and handed to the controller.
    Submitted {
        items: usize,
        not_found: Vec<String>,
    },
    /// The resolve service failed; a notice is showing.
    Unavailable,
}

pub struct CaptionSession {
    client: Arc<dyn ResolveClient>,
    player: PlaybackHandle,
    video_id: Option<String>,
    last_caption: Option<String>,
    notice_active: bool,
}

impl CaptionSession {
    pub fn new(client: Arc<dyn ResolveClient>, player: PlaybackHandle) -> Self {
        Self {
            client,
            player,
            video_id: None,
            last_caption: None,
            notice_active: false,
        }
    }

    /// Tag requests with the host video's identifier.
    pub fn with_video_id(mut self, video_id: impl Into<String>) -> Self {
        self.video_id = Some(video_id.into());
        self
    }

    pub fn player(&self) -> &PlaybackHandle {
        &self.player
    }

    /// Handle one caption update.
    pub async fn on_caption(&mut self, text: &str) -> Result<CaptionOutcome, PlayerError> {
        let text = text.trim();
        if self.last_caption.as_deref() == Some(text) {
            return Ok(CaptionOutcome::Duplicate);
        }
        self.last_caption = Some(text.to_string());

        let words = tokenize(text);
        if words.is_empty() {
            debug!("caption has no words, ignoring");
            return Ok(CaptionOutcome::NoWords);
        }

        let request = ResolveRequest {
            text: Some(text.to_string()),
            words: Some(words),
            video_id: self.video_id.clone(),
        };

        let response = match self.client.resolve(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "resolve service unavailable");
                if !self.notice_active {
                    self.player
                        .set_notice(Some(SERVICE_UNAVAILABLE_NOTICE.to_string()))
                        .await?;
                    self.notice_active = true;
                }
                return Ok(CaptionOutcome::Unavailable);
            }
        };

        if self.notice_active {
            self.player.set_notice(None).await?;
            self.notice_active = false;
        }

        if !response.not_found_words.is_empty() {
            debug!(words = ?response.not_found_words, "words without signs");
        }
        let items: Vec<MediaItem> = response.sequence.into_iter().map(MediaItem::from).collect();
        let count = items.len();
        if items.is_empty() {
            self.player.stop().await?;
        } else {
            self.player.play(items).await?;
        }
        Ok(CaptionOutcome::Submitted {
            items: count,
            not_found: response.not_found_words,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use signify_types::{MatchSource, MediaKind, ResolveResponse, ResolvedToken};

    use crate::controller::{ControllerOptions, PlaybackController};
    use crate::error::{FetchError, ResolveError, SurfaceError};
    use crate::fetch::{MediaFetcher, MediaPayload};
    use crate::machine::PlaybackStatus;
    use crate::surface::MediaSurface;

    #[derive(Default)]
    struct ScriptedClient {
        down: AtomicBool,
        requests: Mutex<Vec<ResolveRequest>>,
    }

    #[async_trait]
    impl ResolveClient for ScriptedClient {
        async fn resolve(&self, request: &ResolveRequest) -> Result<ResolveResponse, ResolveError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.down.load(Ordering::SeqCst) {
                return Err(ResolveError::Unreachable("connection refused".into()));
            }
            let (words, unknown): (Vec<String>, Vec<String>) = request
                .words
                .clone()
                .unwrap_or_default()
                .into_iter()
                .partition(|w| !w.starts_with('z'));
            Ok(ResolveResponse {
                success: true,
                sequence: words
                    .iter()
                    .map(|w| ResolvedToken {
                        source_word: w.clone(),
                        gloss: w.clone(),
                        media_type: MediaKind::Video,
                        url: format!("http://h/{w}.mp4"),
                        match_source: MatchSource::WordLevelDataset,
                    })
                    .collect(),
                found_words: words,
                not_found_words: unknown,
                ..ResolveResponse::default()
            })
        }
    }

    struct InstantFetcher;

    #[async_trait]
    impl MediaFetcher for InstantFetcher {
        async fn fetch(&self, _url: &str) -> Result<MediaPayload, FetchError> {
            Ok(MediaPayload::new(b"m".to_vec(), None))
        }
    }

    #[derive(Default)]
    struct NoticeSurface {
        notices: Mutex<Vec<Option<String>>>,
        played: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MediaSurface for NoticeSurface {
        async fn load(&self, _: &MediaItem, _: MediaPayload) -> Result<(), SurfaceError> {
            Ok(())
        }
        async fn play_video(&self, item: &MediaItem) -> Result<(), SurfaceError> {
            self.played.lock().unwrap().push(item.gloss.clone());
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(())
        }
        async fn show_image(&self, _: &MediaItem) -> Result<(), SurfaceError> {
            Ok(())
        }
        async fn clear(&self) {}
        async fn show_caption(&self, _: Option<&str>) {}
        async fn show_notice(&self, notice: Option<&str>) {
            self.notices.lock().unwrap().push(notice.map(str::to_string));
        }
    }

    fn session() -> (CaptionSession, Arc<ScriptedClient>, Arc<NoticeSurface>) {
        let client = Arc::new(ScriptedClient::default());
        let surface = Arc::new(NoticeSurface::default());
        let controller = PlaybackController::spawn(
            Arc::new(InstantFetcher),
            Arc::clone(&surface) as Arc<dyn MediaSurface>,
            ControllerOptions::default(),
        );
        let session = CaptionSession::new(Arc::clone(&client) as Arc<dyn ResolveClient>, controller.handle())
            .with_video_id("vid");
        (session, client, surface)
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_caption_is_ignored() {
        let (mut s, client, _) = session();
        let first = s.on_caption("Hello world").await.unwrap();
        assert_eq!(
            first,
            CaptionOutcome::Submitted {
                items: 2,
                not_found: vec![]
            }
        );
        assert_eq!(s.on_caption(" Hello world ").await.unwrap(), CaptionOutcome::Duplicate);
        assert_eq!(client.requests.lock().unwrap().len(), 1);

        let req = client.requests.lock().unwrap()[0].clone();
        assert_eq!(req.words, Some(vec!["hello".to_string(), "world".to_string()]));
        assert_eq!(req.video_id.as_deref(), Some("vid"));
    }

    #[tokio::test(start_paused = true)]
    async fn wordless_caption_is_ignored() {
        let (mut s, client, _) = session();
        assert_eq!(s.on_caption("♪ ... ♪").await.unwrap(), CaptionOutcome::NoWords);
        assert!(client.requests.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn outage_shows_notice_without_stopping_playback() {
        let (mut s, client, surface) = session();
        s.on_caption("one two three").await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(s.player().snapshot().status, PlaybackStatus::Playing);

        client.down.store(true, Ordering::SeqCst);
        assert_eq!(s.on_caption("four").await.unwrap(), CaptionOutcome::Unavailable);
        assert_eq!(s.on_caption("five").await.unwrap(), CaptionOutcome::Unavailable);
        tokio::time::sleep(Duration::from_millis(100)).await;
        let snap = s.player().snapshot();
        assert_eq!(snap.status, PlaybackStatus::Playing);
        assert_eq!(snap.notice.as_deref(), Some(SERVICE_UNAVAILABLE_NOTICE));

        client.down.store(false, Ordering::SeqCst);
        s.on_caption("six").await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(
            *surface.notices.lock().unwrap(),
            vec![Some(SERVICE_UNAVAILABLE_NOTICE.to_string()), None]
        );
        assert_eq!(s.player().snapshot().notice, None);
    }

    #[tokio::test(start_paused = true)]
    async fn caption_without_signs_stops_previous_sequence() {
        let (mut s, _, surface) = session();
        s.on_caption("old stale").await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(s.player().snapshot().status, PlaybackStatus::Playing);

        let outcome = s.on_caption("zebra zoo").await.unwrap();
        assert_eq!(
            outcome,
            CaptionOutcome::Submitted {
                items: 0,
                not_found: vec!["zebra".to_string(), "zoo".to_string()]
            }
        );

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(*surface.played.lock().unwrap(), vec!["old".to_string()]);
        assert_eq!(s.player().snapshot().status, PlaybackStatus::Idle);
    }
}

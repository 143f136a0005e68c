//! Async driver for the playback state machine.
//!
//! [`PlaybackController::spawn`] starts a single task that owns the
//! [`PlaybackMachine`], the caption overlay and the preload slot. Callers
//! talk to it through a cloneable [`PlaybackHandle`]; fetches, loads,
//! holds and pauses run as child tasks that report back over an internal
//! channel. Every child task belongs to one generation and is cancelled
//! when that generation is superseded or stopped, so no stale completion
//! reaches the machine (and the machine rejects stale tickets anyway).

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use signify_types::MediaItem;
use signify_types::config::{DisplayConfig, PlaybackConfig};

use crate::error::{FetchError, PlayerError};
use crate::fetch::{MediaFetcher, MediaPayload};
use crate::machine::{Command, PlaybackMachine, PlaybackStatus, Ticket, Timing};
use crate::surface::{CaptionOverlay, MediaSurface};

/// Startup options for the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    pub timing: Timing,
    pub avatar_enabled: bool,
    pub captions_visible: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            avatar_enabled: true,
            captions_visible: true,
        }
    }
}

impl ControllerOptions {
    pub fn from_config(playback: &PlaybackConfig, display: &DisplayConfig) -> Self {
        Self {
            timing: Timing::from(playback),
            avatar_enabled: display.avatar_enabled,
            captions_visible: display.captions_enabled,
        }
    }
}

/// Point-in-time view of the controller, published after every step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,
    pub generation: u64,
    pub position: usize,
    pub item: Option<MediaItem>,
    pub remaining: usize,
    pub caption: Option<String>,
    pub avatar_enabled: bool,
    pub captions_visible: bool,
    pub notice: Option<String>,
}

enum Control {
    Play(Vec<MediaItem>),
    Stop,
    SetAvatarEnabled(bool),
    SetCaptionsVisible(bool),
    SetNotice(Option<String>),
}

enum Event {
    Ready(Ticket),
    LoadFailed(Ticket, String),
    Ended(Ticket),
    PlaybackFailed(Ticket, String),
    DisplayElapsed(Ticket),
    PauseElapsed(Ticket),
    Preloaded(Ticket, Result<MediaPayload, FetchError>),
}

/// Cloneable handle to a running controller.
#[derive(Clone)]
pub struct PlaybackHandle {
    tx: mpsc::Sender<Control>,
    state: watch::Receiver<PlaybackSnapshot>,
}

impl PlaybackHandle {
    /// Play a new sequence, superseding anything in flight. Empty
    /// sequences are ignored.
    pub async fn play(&self, items: Vec<MediaItem>) -> Result<(), PlayerError> {
        self.send(Control::Play(items)).await
    }

    /// Stop playback and empty the queue.
    pub async fn stop(&self) -> Result<(), PlayerError> {
        self.send(Control::Stop).await
    }

    /// Enable or disable avatar playback. Disabling stops playback and
    /// ignores sequences until re-enabled.
    pub async fn set_avatar_enabled(&self, enabled: bool) -> Result<(), PlayerError> {
        self.send(Control::SetAvatarEnabled(enabled)).await
    }

    /// Show or hide the caption overlay without touching the queue.
    pub async fn set_captions_visible(&self, visible: bool) -> Result<(), PlayerError> {
        self.send(Control::SetCaptionsVisible(visible)).await
    }

    /// Show or clear a status notice on the surface.
    pub async fn set_notice(&self, notice: Option<String>) -> Result<(), PlayerError> {
        self.send(Control::SetNotice(notice)).await
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.state.clone()
    }

    async fn send(&self, control: Control) -> Result<(), PlayerError> {
        self.tx.send(control).await.map_err(|_| PlayerError::Closed)
    }
}

/// A running playback controller task.
pub struct PlaybackController {
    handle: PlaybackHandle,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl PlaybackController {
    /// Spawn the controller on the current Tokio runtime.
    pub fn spawn(
        fetcher: Arc<dyn MediaFetcher>,
        surface: Arc<dyn MediaSurface>,
        options: ControllerOptions,
    ) -> Self {
        let (control_tx, control_rx) = mpsc::channel(32);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(PlaybackSnapshot::default());
        let shutdown = CancellationToken::new();

        let driver = Driver {
            machine: PlaybackMachine::new(options.timing),
            overlay: CaptionOverlay::new(options.captions_visible),
            fetcher,
            surface,
            events_tx,
            generation_token: CancellationToken::new(),
            token_generation: 0,
            preload: None,
            avatar_enabled: options.avatar_enabled,
            notice: None,
            state_tx,
        };
        driver.publish();

        let task = tokio::spawn(driver.run(control_rx, events_rx, shutdown.clone()));
        Self {
            handle: PlaybackHandle {
                tx: control_tx,
                state: state_rx,
            },
            shutdown,
            task,
        }
    }

    pub fn handle(&self) -> PlaybackHandle {
        self.handle.clone()
    }

    /// Stop the controller task and clear the surface.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "playback controller task failed");
        }
    }
}

struct Driver {
    machine: PlaybackMachine,
    overlay: CaptionOverlay,
    fetcher: Arc<dyn MediaFetcher>,
    surface: Arc<dyn MediaSurface>,
    events_tx: mpsc::UnboundedSender<Event>,
    generation_token: CancellationToken,
    token_generation: u64,
    /// At most one preloaded payload, for exactly one ticket.
    preload: Option<(Ticket, MediaPayload)>,
    avatar_enabled: bool,
    notice: Option<String>,
    state_tx: watch::Sender<PlaybackSnapshot>,
}

impl Driver {
    async fn run(
        mut self,
        mut control_rx: mpsc::Receiver<Control>,
        mut events_rx: mpsc::UnboundedReceiver<Event>,
        shutdown: CancellationToken,
    ) {
        debug!("playback controller started");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                control = control_rx.recv() => match control {
                    Some(control) => self.handle_control(control).await,
                    None => break,
                },
                Some(event) = events_rx.recv() => self.handle_event(event).await,
            }
            self.publish();
        }

        self.generation_token.cancel();
        self.surface.clear().await;
        debug!("playback controller stopped");
    }

    async fn handle_control(&mut self, control: Control) {
        match control {
            Control::Play(items) => {
                if !self.avatar_enabled {
                    debug!(items = items.len(), "avatar disabled, ignoring sequence");
                    return;
                }
                if items.is_empty() {
                    debug!("empty sequence, keeping current playback");
                    return;
                }
                info!(
                    items = items.len(),
                    superseding = !self.machine.is_idle(),
                    "starting sequence"
                );
                let commands = self.machine.submit(items);
                self.apply(commands).await;
            }
            Control::Stop => {
                let commands = self.machine.stop();
                self.apply(commands).await;
            }
            Control::SetAvatarEnabled(enabled) => {
                self.avatar_enabled = enabled;
                if !enabled {
                    info!("avatar disabled, stopping playback");
                    let commands = self.machine.stop();
                    self.apply(commands).await;
                }
            }
            Control::SetCaptionsVisible(visible) => {
                self.overlay.set_visible(visible);
                self.surface.show_caption(self.overlay.displayed()).await;
            }
            Control::SetNotice(notice) => {
                if notice != self.notice {
                    self.surface.show_notice(notice.as_deref()).await;
                    self.notice = notice;
                }
            }
        }
    }

    async fn handle_event(&mut self, event: Event) {
        let commands = match event {
            Event::Ready(ticket) => self.machine.on_ready(ticket),
            Event::LoadFailed(ticket, reason) => {
                let commands = self.machine.on_load_failed(ticket);
                if !commands.is_empty() {
                    warn!(position = ticket.position, reason = %reason, "media failed to load, skipping");
                }
                commands
            }
            Event::Ended(ticket) => self.machine.on_ended(ticket),
            Event::PlaybackFailed(ticket, reason) => {
                let commands = self.machine.on_playback_failed(ticket);
                if !commands.is_empty() {
                    warn!(position = ticket.position, reason = %reason, "playback failed, advancing");
                }
                commands
            }
            Event::DisplayElapsed(ticket) => self.machine.on_display_elapsed(ticket),
            Event::PauseElapsed(ticket) => self.machine.on_pause_elapsed(ticket),
            Event::Preloaded(ticket, result) => {
                if ticket.generation == self.machine.generation() {
                    match result {
                        Ok(payload) => self.preload = Some((ticket, payload)),
                        Err(e) => debug!(position = ticket.position, error = %e, "preload failed"),
                    }
                }
                Vec::new()
            }
        };
        self.apply(commands).await;
    }

    async fn apply(&mut self, commands: Vec<Command>) {
        if self.machine.generation() != self.token_generation {
            self.generation_token.cancel();
            self.generation_token = CancellationToken::new();
            self.token_generation = self.machine.generation();
            self.preload = None;
        }
        for command in commands {
            self.execute(command).await;
        }
    }

    async fn execute(&mut self, command: Command) {
        match command {
            Command::Stop => self.surface.clear().await,
            Command::Caption(word) => {
                self.overlay.set_word(word);
                self.surface.show_caption(self.overlay.displayed()).await;
            }
            Command::Load {
                ticket,
                item,
                timeout,
            } => {
                let preloaded = match self.preload.take() {
                    Some((t, payload)) if t == ticket => Some(payload),
                    _ => None,
                };
                let fetcher = Arc::clone(&self.fetcher);
                let surface = Arc::clone(&self.surface);
                self.spawn_guarded(async move {
                    match tokio::time::timeout(timeout, load_item(&*fetcher, &*surface, &item, preloaded)).await {
                        Ok(Ok(())) => Event::Ready(ticket),
                        Ok(Err(reason)) => Event::LoadFailed(ticket, reason),
                        Err(_) => Event::LoadFailed(
                            ticket,
                            format!("load timed out after {}ms", timeout.as_millis()),
                        ),
                    }
                });
            }
            Command::Preload { ticket, item } => {
                let fetcher = Arc::clone(&self.fetcher);
                self.spawn_guarded(async move {
                    Event::Preloaded(ticket, fetcher.fetch(&item.url).await)
                });
            }
            Command::PlayVideo { ticket, item } => {
                let surface = Arc::clone(&self.surface);
                self.spawn_guarded(async move {
                    match surface.play_video(&item).await {
                        Ok(()) => Event::Ended(ticket),
                        Err(e) => Event::PlaybackFailed(ticket, e.to_string()),
                    }
                });
            }
            Command::ShowImage { ticket, item, hold } => {
                let surface = Arc::clone(&self.surface);
                self.spawn_guarded(async move {
                    if let Err(e) = surface.show_image(&item).await {
                        return Event::PlaybackFailed(ticket, e.to_string());
                    }
                    tokio::time::sleep(hold).await;
                    Event::DisplayElapsed(ticket)
                });
            }
            Command::Pause { ticket, duration } => {
                self.spawn_guarded(async move {
                    tokio::time::sleep(duration).await;
                    Event::PauseElapsed(ticket)
                });
            }
        }
    }

    /// Run `work` as part of the current generation and report its event
    /// unless the generation is cancelled first.
    fn spawn_guarded<F>(&self, work: F)
    where
        F: Future<Output = Event> + Send + 'static,
    {
        let token = self.generation_token.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                event = work => {
                    let _ = tx.send(event);
                }
            }
        });
    }

    fn publish(&self) {
        let state = self.machine.state();
        self.state_tx.send_replace(PlaybackSnapshot {
            status: state.status(),
            generation: self.machine.generation(),
            position: self.machine.position(),
            item: state.item().cloned(),
            remaining: self.machine.remaining(),
            caption: self.overlay.displayed().map(str::to_string),
            avatar_enabled: self.avatar_enabled,
            captions_visible: self.overlay.is_visible(),
            notice: self.notice.clone(),
        });
    }
}

async fn load_item(
    fetcher: &dyn MediaFetcher,
    surface: &dyn MediaSurface,
    item: &MediaItem,
    preloaded: Option<MediaPayload>,
) -> Result<(), String> {
    let payload = match preloaded {
        Some(payload) => payload,
        None => fetcher.fetch(&item.url).await.map_err(|e| e.to_string())?,
    };
    surface.load(item, payload).await.map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use signify_types::MediaKind;

    use crate::error::SurfaceError;

    type Log = Arc<Mutex<Vec<String>>>;

    struct FakeSurface {
        log: Log,
        clip_len: Duration,
    }

    impl FakeSurface {
        fn push(&self, line: String) {
            self.log.lock().unwrap().push(line);
        }
    }

    #[async_trait]
    impl MediaSurface for FakeSurface {
        async fn load(&self, item: &MediaItem, payload: MediaPayload) -> Result<(), SurfaceError> {
            if payload.bytes == b"corrupt" {
                return Err(SurfaceError::Decode("bad header".into()));
            }
            self.push(format!("load {}", item.gloss));
            Ok(())
        }

        async fn play_video(&self, item: &MediaItem) -> Result<(), SurfaceError> {
            self.push(format!("play {}", item.gloss));
            tokio::time::sleep(self.clip_len).await;
            self.push(format!("end {}", item.gloss));
            Ok(())
        }

        async fn show_image(&self, item: &MediaItem) -> Result<(), SurfaceError> {
            self.push(format!("show {}", item.gloss));
            Ok(())
        }

        async fn clear(&self) {
            self.push("clear".into());
        }

        async fn show_caption(&self, text: Option<&str>) {
            self.push(format!("caption {}", text.unwrap_or("-")));
        }

        async fn show_notice(&self, notice: Option<&str>) {
            self.push(format!("notice {}", notice.unwrap_or("-")));
        }
    }

    #[derive(Default)]
    struct FakeFetcher {
        hang: HashSet<String>,
        missing: HashSet<String>,
        corrupt: HashSet<String>,
        fail_once: Mutex<HashSet<String>>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MediaFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<MediaPayload, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            if self.missing.contains(url) {
                return Err(FetchError::NotFound);
            }
            if self.fail_once.lock().unwrap().remove(url) {
                return Err(FetchError::Unreachable("flaky".into()));
            }
            if self.hang.contains(url) {
                std::future::pending::<()>().await;
            }
            if self.corrupt.contains(url) {
                return Ok(MediaPayload::new(b"corrupt".to_vec(), None));
            }
            Ok(MediaPayload::new(b"media".to_vec(), None))
        }
    }

    impl FakeFetcher {
        fn calls_for(&self, url: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|c| *c == url).count()
        }
    }

    fn url(gloss: &str, kind: MediaKind) -> String {
        match kind {
            MediaKind::Video => format!("http://h/{gloss}.mp4"),
            MediaKind::Image => format!("http://h/{gloss}.png"),
        }
    }

    fn video(gloss: &str) -> MediaItem {
        MediaItem::new(MediaKind::Video, url(gloss, MediaKind::Video), gloss, gloss)
    }

    fn letter(letter: &str, word: &str) -> MediaItem {
        MediaItem::new(MediaKind::Image, url(letter, MediaKind::Image), word, letter)
    }

    struct Harness {
        controller: PlaybackController,
        fetcher: Arc<FakeFetcher>,
        log: Log,
    }

    impl Harness {
        fn new(fetcher: FakeFetcher, clip_len: Duration) -> Self {
            let log: Log = Arc::default();
            let fetcher = Arc::new(fetcher);
            let surface = Arc::new(FakeSurface {
                log: Arc::clone(&log),
                clip_len,
            });
            let controller = PlaybackController::spawn(
                Arc::clone(&fetcher) as Arc<dyn MediaFetcher>,
                surface,
                ControllerOptions::default(),
            );
            Self {
                controller,
                fetcher,
                log,
            }
        }

        fn handle(&self) -> PlaybackHandle {
            self.controller.handle()
        }

        fn media_log(&self) -> Vec<String> {
            self.log
                .lock()
                .unwrap()
                .iter()
                .filter(|l| !l.starts_with("caption") && !l.starts_with("notice"))
                .cloned()
                .collect()
        }

        fn captions(&self) -> Vec<String> {
            self.log
                .lock()
                .unwrap()
                .iter()
                .filter(|l| l.starts_with("caption"))
                .cloned()
                .collect()
        }

        fn contains(&self, line: &str) -> bool {
            self.log.lock().unwrap().iter().any(|l| l == line)
        }
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn plays_sequence_in_order() {
        let h = Harness::new(FakeFetcher::default(), Duration::from_secs(1));
        h.handle()
            .play(vec![video("hello"), letter("a", "ab"), letter("b", "ab")])
            .await
            .unwrap();
        advance(10_000).await;

        assert_eq!(
            h.media_log(),
            vec!["load hello", "play hello", "end hello", "load a", "show a", "load b", "show b"]
        );
        assert_eq!(
            h.captions(),
            vec!["caption hello", "caption ab", "caption ab", "caption -"]
        );
        let snap = h.handle().snapshot();
        assert_eq!(snap.status, PlaybackStatus::Idle);
        assert_eq!(snap.caption, None);
    }

    #[tokio::test(start_paused = true)]
    async fn preloaded_payload_is_used_once() {
        let h = Harness::new(FakeFetcher::default(), Duration::from_secs(1));
        h.handle()
            .play(vec![video("one"), video("two"), video("three")])
            .await
            .unwrap();
        advance(10_000).await;

        for gloss in ["one", "two", "three"] {
            assert_eq!(h.fetcher.calls_for(&url(gloss, MediaKind::Video)), 1, "{gloss}");
        }
        assert!(h.contains("end three"));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_preload_falls_back_to_fresh_fetch() {
        let fetcher = FakeFetcher::default();
        fetcher
            .fail_once
            .lock()
            .unwrap()
            .insert(url("two", MediaKind::Video));
        let h = Harness::new(fetcher, Duration::from_secs(1));
        h.handle().play(vec![video("one"), video("two")]).await.unwrap();
        advance(10_000).await;

        assert_eq!(h.fetcher.calls_for(&url("two", MediaKind::Video)), 2);
        assert!(h.contains("end two"));
    }

    #[tokio::test(start_paused = true)]
    async fn new_sequence_supersedes_in_flight_one() {
        let h = Harness::new(FakeFetcher::default(), Duration::from_secs(10));
        let handle = h.handle();
        handle.play(vec![video("a"), video("b")]).await.unwrap();
        advance(1_000).await;
        assert_eq!(handle.snapshot().status, PlaybackStatus::Playing);

        handle.play(vec![video("c")]).await.unwrap();
        advance(30_000).await;

        assert_eq!(
            h.media_log(),
            vec!["load a", "play a", "clear", "load c", "play c", "end c"]
        );
        assert!(!h.contains("end a"));
        assert!(!h.contains("load b"));
        assert_eq!(handle.snapshot().generation, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_sequence_keeps_current_playback() {
        let h = Harness::new(FakeFetcher::default(), Duration::from_secs(2));
        let handle = h.handle();
        handle.play(vec![video("a")]).await.unwrap();
        advance(500).await;
        handle.play(Vec::new()).await.unwrap();
        advance(5_000).await;
        assert!(h.contains("end a"));
        assert!(!h.contains("clear"));
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_load_times_out_and_advances() {
        let fetcher = FakeFetcher {
            hang: HashSet::from([url("slow", MediaKind::Video)]),
            ..FakeFetcher::default()
        };
        let h = Harness::new(fetcher, Duration::from_secs(1));
        let handle = h.handle();
        handle.play(vec![video("slow"), video("ok")]).await.unwrap();

        advance(4_900).await;
        let snap = handle.snapshot();
        assert_eq!(snap.status, PlaybackStatus::Loading);
        assert_eq!(snap.position, 0);

        advance(1_000).await;
        assert!(h.contains("load ok"));
        assert!(!h.contains("load slow"));
    }

    #[tokio::test(start_paused = true)]
    async fn image_load_uses_shorter_timeout() {
        let fetcher = FakeFetcher {
            hang: HashSet::from([url("x", MediaKind::Image)]),
            ..FakeFetcher::default()
        };
        let h = Harness::new(fetcher, Duration::from_secs(1));
        h.handle().play(vec![letter("x", "xz"), letter("z", "xz")]).await.unwrap();
        advance(3_300).await;
        assert!(h.contains("show z"));
    }

    #[tokio::test(start_paused = true)]
    async fn missing_and_corrupt_media_are_skipped() {
        let fetcher = FakeFetcher {
            missing: HashSet::from([url("gone", MediaKind::Image)]),
            corrupt: HashSet::from([url("bad", MediaKind::Video)]),
            ..FakeFetcher::default()
        };
        let h = Harness::new(fetcher, Duration::from_secs(1));
        h.handle()
            .play(vec![letter("gone", "gone"), video("bad"), video("ok")])
            .await
            .unwrap();
        advance(5_000).await;
        assert_eq!(h.media_log(), vec!["load ok", "play ok", "end ok"]);
    }

    #[tokio::test(start_paused = true)]
    async fn disabling_avatar_stops_and_ignores_sequences() {
        let h = Harness::new(FakeFetcher::default(), Duration::from_secs(10));
        let handle = h.handle();
        handle.play(vec![video("a")]).await.unwrap();
        advance(1_000).await;

        handle.set_avatar_enabled(false).await.unwrap();
        advance(100).await;
        assert!(h.contains("clear"));
        assert_eq!(handle.snapshot().status, PlaybackStatus::Idle);

        handle.play(vec![video("b")]).await.unwrap();
        advance(1_000).await;
        assert!(!h.contains("load b"));

        handle.set_avatar_enabled(true).await.unwrap();
        handle.play(vec![video("c")]).await.unwrap();
        advance(1_000).await;
        assert!(h.contains("play c"));
        assert!(!h.contains("end a"));
    }

    #[tokio::test(start_paused = true)]
    async fn caption_toggle_keeps_queue() {
        let h = Harness::new(FakeFetcher::default(), Duration::from_secs(2));
        let handle = h.handle();
        handle.play(vec![video("hello"), video("world")]).await.unwrap();
        advance(1_000).await;

        handle.set_captions_visible(false).await.unwrap();
        advance(10).await;
        let snap = handle.snapshot();
        assert_eq!(snap.status, PlaybackStatus::Playing);
        assert_eq!(snap.caption, None);
        assert!(!snap.captions_visible);

        advance(10_000).await;
        assert!(h.contains("end world"));
        assert!(!h.contains("caption world"));
    }

    #[tokio::test(start_paused = true)]
    async fn notice_is_deduplicated() {
        let h = Harness::new(FakeFetcher::default(), Duration::from_secs(1));
        let handle = h.handle();
        handle.set_notice(Some("offline".into())).await.unwrap();
        handle.set_notice(Some("offline".into())).await.unwrap();
        handle.set_notice(None).await.unwrap();
        advance(10).await;
        let notices: Vec<String> = h
            .log
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.starts_with("notice"))
            .cloned()
            .collect();
        assert_eq!(notices, vec!["notice offline", "notice -"]);
        assert_eq!(handle.snapshot().notice, None);
    }

    #[tokio::test]
    async fn shutdown_closes_handle() {
        let h = Harness::new(FakeFetcher::default(), Duration::from_millis(10));
        let handle = h.handle();
        h.controller.shutdown().await;
        assert!(matches!(handle.stop().await, Err(PlayerError::Closed)));
        assert!(h.log.lock().unwrap().contains(&"clear".to_string()));
    }
}

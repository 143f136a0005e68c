//! The playback state machine, free of I/O.
//!
//! [`PlaybackMachine`] owns the queue and decides what happens next; every
//! input returns the [`Command`]s the driver must carry out. Asynchronous
//! work is tagged with a [`Ticket`] naming the generation and queue
//! position it was issued for, and any completion whose ticket does not
//! match the current one is ignored. A new sequence bumps the generation,
//! which invalidates every outstanding ticket at once.
//!
//! ```text
//! Idle ──submit──▶ Loading ──ready──▶ Playing ──ended / held──▶ Transitioning
//!                     │                                            │
//!                     └──────────── load failed ──────────────────▶│
//!                                                                  │ pause elapsed
//!                       Loading(next) ◀── queue non-empty ─────────┤
//!                       Idle          ◀── queue empty ─────────────┘
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use signify_types::config::PlaybackConfig;
use signify_types::{MediaItem, MediaKind};

/// Playback state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Loading(MediaItem),
    Playing(MediaItem),
    Transitioning,
}

impl PlaybackState {
    pub fn status(&self) -> PlaybackStatus {
        match self {
            Self::Idle => PlaybackStatus::Idle,
            Self::Loading(_) => PlaybackStatus::Loading,
            Self::Playing(_) => PlaybackStatus::Playing,
            Self::Transitioning => PlaybackStatus::Transitioning,
        }
    }

    /// The item being loaded or played, if any.
    pub fn item(&self) -> Option<&MediaItem> {
        match self {
            Self::Loading(item) | Self::Playing(item) => Some(item),
            Self::Idle | Self::Transitioning => None,
        }
    }
}

/// [`PlaybackState`] without its payload, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Loading,
    Playing,
    Transitioning,
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Playing => write!(f, "playing"),
            Self::Transitioning => write!(f, "transitioning"),
        }
    }
}

/// Identity of one queue item within one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub generation: u64,
    pub position: usize,
}

/// Timing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub image_display: Duration,
    pub inter_item_pause: Duration,
    pub image_load_timeout: Duration,
    pub video_load_timeout: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self::from(&PlaybackConfig::default())
    }
}

impl From<&PlaybackConfig> for Timing {
    fn from(config: &PlaybackConfig) -> Self {
        Self {
            image_display: config.image_display(),
            inter_item_pause: config.inter_item_pause(),
            image_load_timeout: config.image_load_timeout(),
            video_load_timeout: config.video_load_timeout(),
        }
    }
}

impl Timing {
    pub fn load_timeout(&self, kind: MediaKind) -> Duration {
        match kind {
            MediaKind::Image => self.image_load_timeout,
            MediaKind::Video => self.video_load_timeout,
        }
    }
}

/// Work the driver must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Tear down whatever media is on screen and abandon in-flight work.
    Stop,
    /// Fetch and load an item; report ready or failed within `timeout`.
    Load {
        ticket: Ticket,
        item: MediaItem,
        timeout: Duration,
    },
    /// Fetch the next item's bytes ahead of time.
    Preload { ticket: Ticket, item: MediaItem },
    /// Play a loaded video; report when it ends.
    PlayVideo { ticket: Ticket, item: MediaItem },
    /// Show a loaded image and report after `hold`.
    ShowImage {
        ticket: Ticket,
        item: MediaItem,
        hold: Duration,
    },
    /// Wait between items; report when elapsed.
    Pause { ticket: Ticket, duration: Duration },
    /// Set (or clear) the caption overlay word.
    Caption(Option<String>),
}

/// Sequential playback state machine.
#[derive(Debug, Clone)]
pub struct PlaybackMachine {
    state: PlaybackState,
    queue: VecDeque<MediaItem>,
    generation: u64,
    position: usize,
    timing: Timing,
}

impl PlaybackMachine {
    pub fn new(timing: Timing) -> Self {
        Self {
            state: PlaybackState::Idle,
            queue: VecDeque::new(),
            generation: 0,
            position: 0,
            timing,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Items queued after the current one.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn is_idle(&self) -> bool {
        self.state == PlaybackState::Idle
    }

    fn ticket(&self) -> Ticket {
        Ticket {
            generation: self.generation,
            position: self.position,
        }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket == self.ticket()
    }

    /// Accept a new sequence, superseding whatever is in flight.
    ///
    /// An empty sequence is ignored and leaves current playback alone.
    pub fn submit(&mut self, items: Vec<MediaItem>) -> Vec<Command> {
        if items.is_empty() {
            return Vec::new();
        }

        let mut commands = Vec::new();
        if !self.is_idle() {
            debug!(
                generation = self.generation,
                dropped = self.queue.len(),
                "superseding in-flight sequence"
            );
            commands.push(Command::Stop);
            commands.push(Command::Caption(None));
        }

        self.generation += 1;
        self.position = 0;
        self.queue = items.into();
        commands.extend(self.load_next());
        commands
    }

    /// Explicit stop: empty the queue and return to idle.
    pub fn stop(&mut self) -> Vec<Command> {
        if self.is_idle() && self.queue.is_empty() {
            return Vec::new();
        }
        self.generation += 1;
        self.queue.clear();
        self.state = PlaybackState::Idle;
        vec![Command::Stop, Command::Caption(None)]
    }

    /// The current item finished loading.
    pub fn on_ready(&mut self, ticket: Ticket) -> Vec<Command> {
        if !self.is_current(ticket) {
            return Vec::new();
        }
        let PlaybackState::Loading(item) = &self.state else {
            return Vec::new();
        };
        let item = item.clone();
        self.state = PlaybackState::Playing(item.clone());

        let mut commands = vec![Command::Caption(Some(item.caption().to_string()))];
        if let Some(next) = self.queue.front() {
            commands.push(Command::Preload {
                ticket: Ticket {
                    generation: self.generation,
                    position: self.position + 1,
                },
                item: next.clone(),
            });
        }
        commands.push(match item.kind {
            MediaKind::Video => Command::PlayVideo { ticket, item },
            MediaKind::Image => Command::ShowImage {
                ticket,
                item,
                hold: self.timing.image_display,
            },
        });
        commands
    }

    /// The current item failed to load (error or timeout); skip it.
    pub fn on_load_failed(&mut self, ticket: Ticket) -> Vec<Command> {
        if !self.is_current(ticket) || !matches!(self.state, PlaybackState::Loading(_)) {
            return Vec::new();
        }
        self.transition()
    }

    /// A playing video reached its natural end.
    pub fn on_ended(&mut self, ticket: Ticket) -> Vec<Command> {
        self.finish_playing(ticket, MediaKind::Video)
    }

    /// A displayed image's hold elapsed.
    pub fn on_display_elapsed(&mut self, ticket: Ticket) -> Vec<Command> {
        self.finish_playing(ticket, MediaKind::Image)
    }

    /// Playback of the current item failed midway; advance without retry.
    pub fn on_playback_failed(&mut self, ticket: Ticket) -> Vec<Command> {
        if !self.is_current(ticket) || !matches!(self.state, PlaybackState::Playing(_)) {
            return Vec::new();
        }
        self.transition()
    }

    /// The inter-item pause elapsed.
    pub fn on_pause_elapsed(&mut self, ticket: Ticket) -> Vec<Command> {
        if !self.is_current(ticket) || self.state != PlaybackState::Transitioning {
            return Vec::new();
        }
        if self.queue.is_empty() {
            debug!(generation = self.generation, "queue drained");
            self.state = PlaybackState::Idle;
            return Vec::new();
        }
        self.position += 1;
        self.load_next()
    }

    fn finish_playing(&mut self, ticket: Ticket, kind: MediaKind) -> Vec<Command> {
        if !self.is_current(ticket) {
            return Vec::new();
        }
        match &self.state {
            PlaybackState::Playing(item) if item.kind == kind => self.transition(),
            _ => Vec::new(),
        }
    }

    fn transition(&mut self) -> Vec<Command> {
        self.state = PlaybackState::Transitioning;
        let mut commands = Vec::new();
        if self.queue.is_empty() {
            commands.push(Command::Caption(None));
        }
        commands.push(Command::Pause {
            ticket: self.ticket(),
            duration: self.timing.inter_item_pause,
        });
        commands
    }

    fn load_next(&mut self) -> Vec<Command> {
        let Some(item) = self.queue.pop_front() else {
            self.state = PlaybackState::Idle;
            return Vec::new();
        };
        self.state = PlaybackState::Loading(item.clone());
        let timeout = self.timing.load_timeout(item.kind);
        vec![Command::Load {
            ticket: self.ticket(),
            item,
            timeout,
        }]
    }
}

impl Default for PlaybackMachine {
    fn default() -> Self {
        Self::new(Timing::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(word: &str) -> MediaItem {
        MediaItem::new(MediaKind::Video, format!("http://h/{word}.mp4"), word, word)
    }

    fn image(letter: &str, word: &str) -> MediaItem {
        MediaItem::new(MediaKind::Image, format!("http://h/{letter}.png"), word, letter)
    }

    fn load_ticket(commands: &[Command]) -> Ticket {
        commands
            .iter()
            .find_map(|c| match c {
                Command::Load { ticket, .. } => Some(*ticket),
                _ => None,
            })
            .expect("expected a Load command")
    }

    #[test]
    fn starts_idle_and_ignores_empty_sequence() {
        let mut m = PlaybackMachine::default();
        assert!(m.is_idle());
        assert!(m.submit(Vec::new()).is_empty());
        assert_eq!(m.generation(), 0);
    }

    #[test]
    fn walks_a_video_then_an_image() {
        let mut m = PlaybackMachine::default();
        let cmds = m.submit(vec![video("hello"), image("a", "ab")]);
        assert_eq!(cmds.len(), 1);
        let t0 = load_ticket(&cmds);
        assert!(matches!(&cmds[0], Command::Load { timeout, .. } if *timeout == Duration::from_secs(5)));
        assert_eq!(m.state().status(), PlaybackStatus::Loading);

        let cmds = m.on_ready(t0);
        assert_eq!(cmds[0], Command::Caption(Some("hello".into())));
        assert!(matches!(&cmds[1], Command::Preload { ticket, item } if ticket.position == 1 && item.gloss == "a"));
        assert!(matches!(&cmds[2], Command::PlayVideo { .. }));
        assert_eq!(m.state().status(), PlaybackStatus::Playing);

        let cmds = m.on_ended(t0);
        assert_eq!(
            cmds,
            vec![Command::Pause {
                ticket: t0,
                duration: Duration::from_millis(150)
            }]
        );

        let cmds = m.on_pause_elapsed(t0);
        let t1 = load_ticket(&cmds);
        assert_eq!(t1.position, 1);
        assert!(matches!(&cmds[0], Command::Load { timeout, .. } if *timeout == Duration::from_secs(3)));

        let cmds = m.on_ready(t1);
        // Caption shows the source word, not the letter gloss.
        assert_eq!(cmds[0], Command::Caption(Some("ab".into())));
        assert!(matches!(&cmds[1], Command::ShowImage { hold, .. } if *hold == Duration::from_millis(500)));

        let cmds = m.on_display_elapsed(t1);
        assert_eq!(cmds[0], Command::Caption(None));
        assert!(matches!(cmds[1], Command::Pause { .. }));

        assert!(m.on_pause_elapsed(t1).is_empty());
        assert!(m.is_idle());
    }

    #[test]
    fn load_failure_skips_to_next() {
        let mut m = PlaybackMachine::default();
        let t0 = load_ticket(&m.submit(vec![video("a"), video("b")]));
        let cmds = m.on_load_failed(t0);
        assert!(matches!(cmds[0], Command::Pause { .. }));
        assert_eq!(m.state(), &PlaybackState::Transitioning);
        let cmds = m.on_pause_elapsed(t0);
        assert!(matches!(&cmds[0], Command::Load { item, .. } if item.word == "b"));
    }

    #[test]
    fn supersession_discards_old_queue_and_stale_tickets() {
        let mut m = PlaybackMachine::default();
        let old = load_ticket(&m.submit(vec![video("a"), video("b")]));
        m.on_ready(old);

        let cmds = m.submit(vec![video("c")]);
        assert_eq!(cmds[0], Command::Stop);
        assert_eq!(cmds[1], Command::Caption(None));
        let new = load_ticket(&cmds);
        assert_eq!(new.generation, old.generation + 1);
        assert_eq!(new.position, 0);
        assert_eq!(m.remaining(), 0);

        // A late "ended" from the cancelled clip must not advance the new queue.
        assert!(m.on_ended(old).is_empty());
        assert!(m.on_pause_elapsed(old).is_empty());
        assert!(m.on_ready(old).is_empty());
        assert_eq!(m.state(), &PlaybackState::Loading(video("c")));
    }

    #[test]
    fn wrong_kind_completion_is_ignored() {
        let mut m = PlaybackMachine::default();
        let t = load_ticket(&m.submit(vec![video("a")]));
        m.on_ready(t);
        assert!(m.on_display_elapsed(t).is_empty());
        assert_eq!(m.state().status(), PlaybackStatus::Playing);
        assert!(!m.on_playback_failed(t).is_empty());
    }

    #[test]
    fn stop_clears_everything() {
        let mut m = PlaybackMachine::default();
        assert!(m.stop().is_empty());
        let t = load_ticket(&m.submit(vec![video("a"), video("b")]));
        assert_eq!(m.stop(), vec![Command::Stop, Command::Caption(None)]);
        assert!(m.is_idle());
        assert_eq!(m.remaining(), 0);
        assert!(m.on_ready(t).is_empty());
    }

    #[test]
    fn submit_from_idle_does_not_stop() {
        let mut m = PlaybackMachine::default();
        let cmds = m.submit(vec![video("a")]);
        assert!(!cmds.contains(&Command::Stop));
    }
}

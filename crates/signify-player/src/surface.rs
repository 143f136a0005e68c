//! Rendering surface and caption overlay.

use async_trait::async_trait;

use signify_types::MediaItem;

use crate::error::SurfaceError;
use crate::fetch::MediaPayload;

/// Where sign media is rendered: the avatar widget and its caption line.
///
/// `play_video` runs in its own task, so caption and notice updates may
/// arrive while a clip is still playing.
#[async_trait]
pub trait MediaSurface: Send + Sync {
    /// Decode `payload` and make `item` ready to play.
    async fn load(&self, item: &MediaItem, payload: MediaPayload) -> Result<(), SurfaceError>;

    /// Play the loaded video; resolves when it reaches its natural end.
    async fn play_video(&self, item: &MediaItem) -> Result<(), SurfaceError>;

    /// Display the loaded image. Resolves once it is on screen; the
    /// controller owns the hold duration.
    async fn show_image(&self, item: &MediaItem) -> Result<(), SurfaceError>;

    /// Pause and clear any media currently shown.
    async fn clear(&self);

    /// Render the caption line, or hide it with `None`.
    async fn show_caption(&self, text: Option<&str>);

    /// Show or clear a non-blocking status notice.
    async fn show_notice(&self, notice: Option<&str>);
}

/// The caption overlay: the word for the item being played plus an
/// independent visibility preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionOverlay {
    word: Option<String>,
    visible: bool,
}

impl CaptionOverlay {
    pub fn new(visible: bool) -> Self {
        Self {
            word: None,
            visible,
        }
    }

    pub fn set_word(&mut self, word: Option<String>) {
        self.word = word;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn word(&self) -> Option<&str> {
        self.word.as_deref()
    }

    /// What the surface should show right now.
    pub fn displayed(&self) -> Option<&str> {
        if self.visible { self.word() } else { None }
    }
}

impl Default for CaptionOverlay {
    fn default() -> Self {
        Self::new(true)
    }
}

//! Configuration types.
//!
//! Every section is `#[serde(default)]`, so a partial JSON file (or none at
//! all) yields a working configuration. Keys are expected in snake_case;
//! the loader converts camelCase keys before deserializing, and the common
//! multi-word fields also carry camelCase aliases.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SignifyError};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

impl Config {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(SignifyError::ConfigInvalid {
                reason: "server.port must be non-zero".into(),
            });
        }
        for dataset in &self.data.datasets {
            if !dataset.mount.starts_with('/') {
                return Err(SignifyError::ConfigInvalid {
                    reason: format!(
                        "dataset '{}' mount must start with '/', got '{}'",
                        dataset.name, dataset.mount
                    ),
                });
            }
        }
        if self.playback.image_load_timeout_ms == 0 || self.playback.video_load_timeout_ms == 0 {
            return Err(SignifyError::ConfigInvalid {
                reason: "playback load timeouts must be non-zero".into(),
            });
        }
        Ok(())
    }
}

// ── Server ────────────────────────────────────────────────────────────

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL clients use to reach this server. Media URLs in resolve
    /// responses are joined to it. Defaults to `http://{host}:{port}`.
    #[serde(default, alias = "publicUrl")]
    pub public_url: Option<String>,

    /// Allowed CORS origins. Empty means permissive.
    #[serde(default, alias = "corsOrigins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: None,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn public_base_url(&self) -> String {
        match &self.public_url {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => format!("http://{}:{}", self.host, self.port),
        }
    }
}

// ── Data ──────────────────────────────────────────────────────────────

/// One mapping artifact plus the directory its media is served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub name: String,
    /// Mapping artifact path, relative to `data_dir` unless absolute.
    pub mapping: String,
    /// Media directory, relative to `data_dir` unless absolute.
    #[serde(alias = "mediaDir")]
    pub media_dir: String,
    /// URL path prefix the media directory is served under.
    pub mount: String,
}

/// Settings for the whole-caption containment fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialMatchConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Words shorter than this never take part in containment matching.
    #[serde(default = "default_partial_min_len", alias = "minLen")]
    pub min_len: usize,
}

fn default_partial_min_len() -> usize {
    3
}

impl Default for PartialMatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_len: default_partial_min_len(),
        }
    }
}

/// Vocabulary and media locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir", alias = "dataDir")]
    pub data_dir: PathBuf,

    /// Mapping artifacts in priority order.
    #[serde(default = "default_datasets")]
    pub datasets: Vec<DatasetConfig>,

    /// Directory of `<letter>.png` fingerspelling images.
    #[serde(default = "default_fingerspelling_dir", alias = "fingerspellingDir")]
    pub fingerspelling_dir: String,

    /// Directory of per-letter folders (`<letter>/<image>`).
    #[serde(default = "default_letter_dataset_dir", alias = "letterDatasetDir")]
    pub letter_dataset_dir: String,

    /// Curated fallback clips keyed by literal lowercase word.
    #[serde(default, alias = "fallbackClips")]
    pub fallback_clips: HashMap<String, String>,

    #[serde(default, alias = "partialMatch")]
    pub partial_match: PartialMatchConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_fingerspelling_dir() -> String {
    "fingerspelling".into()
}
fn default_letter_dataset_dir() -> String {
    "asl_dataset".into()
}
fn default_datasets() -> Vec<DatasetConfig> {
    vec![
        DatasetConfig {
            name: "wlasl".into(),
            mapping: "mapping.json".into(),
            media_dir: "asl_dataset".into(),
            mount: "/asl".into(),
        },
        DatasetConfig {
            name: "kaggle".into(),
            mapping: "asl-word-mapping.json".into(),
            media_dir: "asl_dataset".into(),
            mount: "/asl-videos".into(),
        },
    ]
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            datasets: default_datasets(),
            fingerspelling_dir: default_fingerspelling_dir(),
            letter_dataset_dir: default_letter_dataset_dir(),
            fallback_clips: HashMap::new(),
            partial_match: PartialMatchConfig::default(),
        }
    }
}

impl DataConfig {
    /// Resolve a path from the config against `data_dir`.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}

// ── Playback ──────────────────────────────────────────────────────────

/// Timing of the playback controller, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// How long a letter image is held.
    #[serde(default = "default_image_display_ms", alias = "imageDisplayMs")]
    pub image_display_ms: u64,

    /// Pause inserted after every item.
    #[serde(default = "default_inter_item_pause_ms", alias = "interItemPauseMs")]
    pub inter_item_pause_ms: u64,

    #[serde(default = "default_image_load_timeout_ms", alias = "imageLoadTimeoutMs")]
    pub image_load_timeout_ms: u64,

    #[serde(default = "default_video_load_timeout_ms", alias = "videoLoadTimeoutMs")]
    pub video_load_timeout_ms: u64,
}

fn default_image_display_ms() -> u64 {
    500
}
fn default_inter_item_pause_ms() -> u64 {
    150
}
fn default_image_load_timeout_ms() -> u64 {
    3000
}
fn default_video_load_timeout_ms() -> u64 {
    5000
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            image_display_ms: default_image_display_ms(),
            inter_item_pause_ms: default_inter_item_pause_ms(),
            image_load_timeout_ms: default_image_load_timeout_ms(),
            video_load_timeout_ms: default_video_load_timeout_ms(),
        }
    }
}

impl PlaybackConfig {
    pub fn image_display(&self) -> Duration {
        Duration::from_millis(self.image_display_ms)
    }

    pub fn inter_item_pause(&self) -> Duration {
        Duration::from_millis(self.inter_item_pause_ms)
    }

    pub fn image_load_timeout(&self) -> Duration {
        Duration::from_millis(self.image_load_timeout_ms)
    }

    pub fn video_load_timeout(&self) -> Duration {
        Duration::from_millis(self.video_load_timeout_ms)
    }
}

// ── Display / client ──────────────────────────────────────────────────

/// User display preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default, alias = "avatarEnabled")]
    pub avatar_enabled: bool,

    #[serde(default = "default_true", alias = "captionsEnabled")]
    pub captions_enabled: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            avatar_enabled: false,
            captions_enabled: true,
        }
    }
}

/// Settings for talking to a resolve backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_backend_url", alias = "backendUrl")]
    pub backend_url: String,

    #[serde(default = "default_request_timeout_ms", alias = "requestTimeoutMs")]
    pub request_timeout_ms: u64,
}

fn default_backend_url() -> String {
    "http://localhost:3000".into()
}
fn default_request_timeout_ms() -> u64 {
    10_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}

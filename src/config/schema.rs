use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/encore/config.toml` or `~/.config/encore/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ENCORE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub audio: AudioSettings,
    pub library: LibrarySettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Catalog search endpoint.
    pub endpoint: String,
    /// Entity filter sent with every query.
    pub entity: String,
    /// Maximum number of results requested from the catalog.
    pub limit: u32,
    /// Case-insensitive title fragments that are never shown.
    pub denylist: Vec<String>,
    /// Size token present in thumbnail URLs as returned by the catalog.
    pub artwork_base: String,
    /// Size token substituted into thumbnail URLs.
    pub artwork_size: String,
    /// Lower bound passed to the result clamp. Results are never padded,
    /// so in practice every filtered result is kept.
    pub min_results: usize,
    /// Term searched once at startup. Empty disables the startup search.
    pub initial_term: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://itunes.apple.com/search".to_string(),
            entity: "song".to_string(),
            limit: 50,
            denylist: vec!["bekhayali".to_string()],
            artwork_base: "100x100bb".to_string(),
            artwork_size: "300x300bb".to_string(),
            min_results: 10,
            initial_term: "Arijit Singh".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether repeat starts enabled.
    pub repeat: bool,
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Initial output volume in `0.0..=1.0`.
    pub volume: f32,
    /// Track length assumed by skip-forward when the real duration is unknown.
    pub fallback_duration_secs: f64,
    /// "Previous" restarts the current track once it has played this long.
    pub restart_threshold_secs: f64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            repeat: false,
            shuffle: false,
            volume: 1.0,
            fallback_duration_secs: 30.0,
            restart_threshold_secs: 3.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to skip with the arrow keys.
    pub skip_seconds: u64,
    /// Volume change per `+` / `-` press.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            skip_seconds: 10,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Interval between position updates while playing (milliseconds).
    pub tick_ms: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
    /// Timeout for fetching remote audio (seconds).
    pub fetch_timeout_secs: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            tick_ms: 250,
            quit_fade_out_ms: 300,
            fetch_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio when walking directories
    /// (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: ["mp3", "m4a", "aac", "flac", "wav", "ogg"]
                .into_iter()
                .map(String::from)
                .collect(),
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionSetting {
    #[default]
    Search,
    #[serde(alias = "local", alias = "files")]
    Library,
    Queue,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Section shown at startup.
    pub start_section: SectionSetting,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ search, queue, play ~ ".to_string(),
            start_section: SectionSetting::Search,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log file. Defaults to `$XDG_STATE_HOME/encore/encore.log`.
    pub file: Option<PathBuf>,
    /// `tracing` filter directives; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: None,
            filter: "info,reqwest=warn,hyper=warn,hyper_util=warn".to_string(),
        }
    }
}

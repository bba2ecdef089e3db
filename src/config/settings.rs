//! Configuration settings for Lingo.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub detection: DetectionSettings,
    pub instrumental: InstrumentalSettings,
    pub lyrics: LyricsSettings,
    pub retry: RetrySettings,
    pub playlist: PlaylistSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory holding the catalog export and every stage's output.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.lingo".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Per-field weights applied to oracle probabilities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldWeights {
    pub name: f64,
    pub artist: f64,
    pub album: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            name: 0.5,
            artist: 0.3,
            album: 0.2,
        }
    }
}

/// Metadata language detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    /// Minimum accumulated weighted score to accept a language.
    pub confidence_threshold: f64,
    /// Field texts shorter than this (in characters, after trimming) are skipped.
    pub min_text_len: usize,
    /// Clamp the reported confidence to [0, 1].
    pub clamp_confidence: bool,
    pub field_weights: FieldWeights,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.80,
            min_text_len: 3,
            clamp_confidence: false,
            field_weights: FieldWeights::default(),
        }
    }
}

/// Instrumental tagging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentalSettings {
    /// Tracks whose `instrumentalness` is at or above this are instrumental.
    pub threshold: f64,
}

impl Default for InstrumentalSettings {
    fn default() -> Self {
        Self { threshold: 0.9 }
    }
}

/// Lyrics provider (Genius) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsSettings {
    /// Search endpoint.
    pub search_url: String,
    /// Environment variable holding the API access token.
    pub token_env: String,
    /// Maximum number of characters kept from the lyrics text.
    pub snippet_max_chars: usize,
    /// Pause after each lookup, in milliseconds.
    pub lookup_delay_ms: u64,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Persist the checkpoint after this many metadata-resolved records.
    pub flush_interval: usize,
}

impl Default for LyricsSettings {
    fn default() -> Self {
        Self {
            search_url: "https://api.genius.com/search".to_string(),
            token_env: "GENIUS_ACCESS_TOKEN".to_string(),
            snippet_max_chars: 400,
            lookup_delay_ms: 1000,
            request_timeout_secs: 10,
            flush_interval: 1,
        }
    }
}

impl LyricsSettings {
    pub fn lookup_delay(&self) -> Duration {
        Duration::from_millis(self.lookup_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Retry/backoff settings shared by every network call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Maximum attempts per operation (including the first one).
    pub max_attempts: u32,
    /// Rate-limit wait when the provider sends no hint, multiplied by the attempt number.
    pub rate_limit_base_secs: u64,
    /// Wait after a 5xx response.
    pub server_error_delay_secs: u64,
    /// Wait after any other retryable failure.
    pub transient_delay_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            rate_limit_base_secs: 10,
            server_error_delay_secs: 2,
            transient_delay_secs: 5,
        }
    }
}

/// Playlist creation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistSettings {
    /// Web API base URL.
    pub api_base: String,
    /// Environment variable holding the OAuth access token.
    pub token_env: String,
    /// Languages with fewer tracks than this get no playlist.
    pub min_size: usize,
    /// Maximum track ids per add request.
    pub batch_size: usize,
    /// Pause after each write, in milliseconds.
    pub write_delay_ms: u64,
    /// Playlist name; `{LANG}` is replaced by the upper-cased language code.
    pub name_template: String,
    /// Create public playlists.
    pub public: bool,
}

impl Default for PlaylistSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.spotify.com/v1".to_string(),
            token_env: "SPOTIFY_ACCESS_TOKEN".to_string(),
            min_size: 10,
            batch_size: 100,
            write_delay_ms: 1000,
            name_template: "My {LANG} Songs".to_string(),
            public: false,
        }
    }
}

impl PlaylistSettings {
    pub fn write_delay(&self) -> Duration {
        Duration::from_millis(self.write_delay_ms)
    }

    /// Render the playlist name for a language code.
    pub fn playlist_name(&self, language: &str) -> String {
        self.name_template.replace("{LANG}", &language.to_uppercase())
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str::<Settings>(&content)?
        } else {
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values no stage can work with.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::LingoError;

        let threshold = self.detection.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(LingoError::Config(format!(
                "detection.confidence_threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        let weights = self.detection.field_weights;
        if [weights.name, weights.artist, weights.album]
            .iter()
            .any(|w| *w < 0.0 || !w.is_finite())
        {
            return Err(LingoError::Config(
                "detection.field_weights must be finite and non-negative".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(LingoError::Config("retry.max_attempts must be at least 1".to_string()));
        }
        if self.playlist.batch_size == 0 {
            return Err(LingoError::Config("playlist.batch_size must be at least 1".to_string()));
        }
        url::Url::parse(&self.lyrics.search_url)
            .map_err(|e| LingoError::Config(format!("lyrics.search_url: {}", e)))?;
        url::Url::parse(&self.playlist.api_base)
            .map_err(|e| LingoError::Config(format!("playlist.api_base: {}", e)))?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lingo")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Raw catalog export.
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir().join("spotify_tracks.json")
    }

    /// Output of the metadata detection stage.
    pub fn scored_path(&self) -> PathBuf {
        self.data_dir().join("language_identified.json")
    }

    /// Output of the lyrics augmentation stage, doubling as its checkpoint.
    pub fn augmented_path(&self) -> PathBuf {
        self.data_dir().join("language_identified_genius.json")
    }
}

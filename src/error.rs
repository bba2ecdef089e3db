//! Error types for Lingo.

use thiserror::Error;

/// Library-level error type for Lingo operations.
#[derive(Error, Debug)]
pub enum LingoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed input in {path}: {message}")]
    MalformedInput { path: String, message: String },

    #[error("Checkpoint error: {0}")]
    Checkpoint(String),

    #[error("Lyrics provider error: {0}")]
    Lyrics(String),

    #[error("Playlist error: {0}")]
    Playlist(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Lingo operations.
pub type Result<T> = std::result::Result<T, LingoError>;

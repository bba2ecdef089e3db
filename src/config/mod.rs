//! Configuration module for Lingo.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    DetectionSettings, FieldWeights, GeneralSettings, InstrumentalSettings, LyricsSettings,
    PlaylistSettings, RetrySettings, Settings,
};

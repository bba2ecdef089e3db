//! Pre-flight checks before network stages.
//!
//! Validates that access tokens and input files are available before
//! starting a stage that would otherwise fail after partial work.

use crate::config::Settings;
use crate::error::{LingoError, Result};
use std::path::Path;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Metadata detection only needs its input.
    Detect,
    /// Lyrics augmentation requires the lyrics token.
    Augment,
    /// Playlist creation requires the playlist token.
    Playlists,
    /// A full run requires both tokens.
    Run,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Detect => {}
        Operation::Augment => {
            check_token(&settings.lyrics.token_env)?;
        }
        Operation::Playlists => {
            check_token(&settings.playlist.token_env)?;
        }
        Operation::Run => {
            check_token(&settings.lyrics.token_env)?;
            check_token(&settings.playlist.token_env)?;
        }
    }
    Ok(())
}

/// Check that an input file exists before a stage reads it.
pub fn check_input(path: &Path, produced_by: &str) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(LingoError::Config(format!(
            "{} not found. Create it with: {}",
            path.display(),
            produced_by
        )))
    }
}

/// Check if an access token is configured.
fn check_token(var: &str) -> Result<()> {
    match std::env::var(var) {
        Ok(token) if !token.trim().is_empty() => Ok(()),
        Ok(_) => Err(LingoError::Config(format!(
            "{} is empty. Set it with: export {}='...'",
            var, var
        ))),
        Err(_) => Err(LingoError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            var, var
        ))),
    }
}

//! Track files exchanged between pipeline stages.
//!
//! Every stage reads and writes a JSON array of objects. Writes go through a
//! temporary file in the destination directory followed by a rename, so a
//! reader never observes a half-written file.

mod models;

pub use models::{
    round_confidence, AugmentationRecord, Field, FieldDetail, Labeled, RecordSource, ScoredTrack,
    Track, INSTRUMENTAL, UNKNOWN,
};

use crate::error::{LingoError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Read a JSON array of records.
///
/// Any record missing a required field fails the whole load.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)?;
    let records: Vec<T> = serde_json::from_str(&content).map_err(|e| LingoError::MalformedInput {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Read the catalog export, rejecting empty or duplicate ids.
pub fn load_catalog(path: &Path) -> Result<Vec<Track>> {
    let tracks: Vec<Track> = read_records(path)?;
    check_ids(path, tracks.iter().map(|t| t.id.as_str()))?;
    Ok(tracks)
}

/// Read the scored output of the detection stage.
pub fn load_scored(path: &Path) -> Result<Vec<ScoredTrack>> {
    let tracks: Vec<ScoredTrack> = read_records(path)?;
    check_ids(path, tracks.iter().map(|t| t.id()))?;
    Ok(tracks)
}

fn check_ids<'a>(path: &Path, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(LingoError::MalformedInput {
                path: path.display().to_string(),
                message: "track with empty id".to_string(),
            });
        }
        if !seen.insert(id) {
            return Err(LingoError::MalformedInput {
                path: path.display().to_string(),
                message: format!("duplicate track id '{}'", id),
            });
        }
    }
    Ok(())
}

/// Write records as a pretty-printed JSON array, replacing the file atomically.
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp_file = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    temp_file.as_file().sync_all()?;
    temp_file
        .persist(path)
        .map_err(|e| LingoError::Io(e.error))?;

    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

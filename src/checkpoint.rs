//! Durable, resumable store of augmentation results.
//!
//! The store maps track id to [`AugmentationRecord`] and is persisted as the
//! augmented output file itself: a JSON array in first-stored order. Presence
//! of an id means the track is done; a later run never asks about it again.

use crate::catalog::{read_records, write_records, AugmentationRecord};
use crate::error::{LingoError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Append-only checkpoint of augmentation records.
#[derive(Debug)]
pub struct CheckpointStore {
    path: PathBuf,
    records: Vec<AugmentationRecord>,
    index: HashMap<String, usize>,
}

impl CheckpointStore {
    /// Open the store at `path`, seeding it from the file when one exists.
    pub fn load(path: &Path) -> Result<Self> {
        let mut store = Self {
            path: path.to_path_buf(),
            records: Vec::new(),
            index: HashMap::new(),
        };

        if path.exists() {
            let records: Vec<AugmentationRecord> = read_records(path).map_err(|e| {
                LingoError::Checkpoint(format!(
                    "cannot resume from {}: {}. Move it aside to start over.",
                    path.display(),
                    e
                ))
            })?;
            for record in records {
                if !store.put(record) {
                    warn!("Duplicate id in checkpoint {}, keeping the first", path.display());
                }
            }
            info!(
                "Resuming from checkpoint {} ({} records)",
                path.display(),
                store.len()
            );
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&AugmentationRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    /// Store a record under its track id.
    ///
    /// Returns `false` and leaves the store untouched if the id is already
    /// present; stored records are never replaced.
    pub fn put(&mut self, record: AugmentationRecord) -> bool {
        if self.contains(record.id()) {
            return false;
        }
        self.index.insert(record.id().to_string(), self.records.len());
        self.records.push(record);
        true
    }

    /// Replace the file on disk with the full current contents.
    pub fn persist(&self) -> Result<()> {
        write_records(&self.path, &self.records)?;
        debug!("Checkpoint persisted ({} records)", self.records.len());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in the order they were first stored.
    pub fn records(&self) -> &[AugmentationRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{RecordSource, ScoredTrack, Track, UNKNOWN};
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn record(id: &str, language: &str, source: RecordSource) -> AugmentationRecord {
        AugmentationRecord {
            scored: ScoredTrack {
                track: Track::new(id, "name", "artist", "album"),
                final_language: language.to_string(),
                confidence: 0.9,
                details: BTreeMap::new(),
            },
            source,
            genius_known: None,
            lyrics_snippet: None,
        }
    }

    #[test]
    fn test_empty_when_file_missing() {
        let dir = tempdir().unwrap();
        let store = CheckpointStore::load(&dir.path().join("missing.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_put_does_not_overwrite() {
        let dir = tempdir().unwrap();
        let mut store = CheckpointStore::load(&dir.path().join("cp.json")).unwrap();

        assert!(store.put(record("a", "fra", RecordSource::Metadata)));
        assert!(!store.put(record("a", UNKNOWN, RecordSource::GeniusNotFound)));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").unwrap().final_language(), "fra");
    }

    #[test]
    fn test_persist_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cp.json");

        let mut store = CheckpointStore::load(&path).unwrap();
        store.put(record("b", "spa", RecordSource::Metadata));
        store.put(record("a", UNKNOWN, RecordSource::GeniusNotFound));
        store.persist().unwrap();

        let reloaded = CheckpointStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains("a"));
        assert!(reloaded.contains("b"));
        assert_eq!(reloaded.records()[0].id(), "b");
        assert_eq!(reloaded.records(), store.records());
    }

    #[test]
    fn test_corrupt_checkpoint_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cp.json");
        std::fs::write(&path, "[{\"id\": ").unwrap();

        let err = tokio_test::assert_err!(CheckpointStore::load(&path));
        assert!(matches!(err, LingoError::Checkpoint(_)));
    }
}

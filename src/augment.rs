//! Lyrics-based augmentation for tracks metadata could not classify.
//!
//! Tracks are processed strictly in input order. Every newly resolved track
//! is written to the [`CheckpointStore`] before the next one starts, so an
//! interrupted run resumes where it stopped and never repeats a lookup.

use crate::catalog::{round_confidence, AugmentationRecord, RecordSource, ScoredTrack, UNKNOWN};
use crate::checkpoint::CheckpointStore;
use crate::config::LyricsSettings;
use crate::detection::{detect_top, LanguageOracle};
use crate::error::Result;
use crate::http::RetryPolicy;
use crate::lyrics::{extract_lyrics, search_query, truncate_snippet, LyricsProvider};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Result of asking the lyrics provider about one track.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// The provider has no matching page.
    NotFound,
    /// The provider knows the track; `lyrics` is `None` when the page could
    /// not be fetched or held no lyrics, or the lookup ran out of retries.
    Found { lyrics: Option<String> },
}

/// Counters for one augmentation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AugmentStats {
    /// Already in the checkpoint; no work done.
    pub reused: usize,
    /// Resolved by metadata, stored without a lookup.
    pub from_metadata: usize,
    /// Sent to the lyrics provider.
    pub looked_up: usize,
    /// Provider had no match.
    pub not_found: usize,
    /// Lyrics found and a language detected from them.
    pub resolved_by_lyrics: usize,
    /// Provider knew the track but no lyrics text could be obtained.
    pub without_lyrics: usize,
}

/// Output of [`LyricsAugmentor::augment`].
#[derive(Debug, Clone)]
pub struct AugmentReport {
    /// One record per input track, in input order.
    pub records: Vec<AugmentationRecord>,
    pub stats: AugmentStats,
}

/// Resolves `unknown` tracks from their lyrics.
pub struct LyricsAugmentor {
    provider: Arc<dyn LyricsProvider>,
    oracle: Arc<dyn LanguageOracle>,
    retry: RetryPolicy,
    settings: LyricsSettings,
    min_text_len: usize,
}

impl LyricsAugmentor {
    pub fn new(
        provider: Arc<dyn LyricsProvider>,
        oracle: Arc<dyn LanguageOracle>,
        retry: RetryPolicy,
        settings: LyricsSettings,
        min_text_len: usize,
    ) -> Self {
        Self {
            provider,
            oracle,
            retry,
            settings,
            min_text_len,
        }
    }

    /// Augment `tracks`, reusing and extending `store`.
    pub async fn augment(
        &self,
        tracks: Vec<ScoredTrack>,
        store: &mut CheckpointStore,
    ) -> Result<AugmentReport> {
        self.augment_with_progress(tracks, store, |_| {}).await
    }

    /// Like [`augment`](Self::augment), calling `on_record` after each track.
    #[instrument(skip_all, fields(tracks = tracks.len()))]
    pub async fn augment_with_progress<F>(
        &self,
        tracks: Vec<ScoredTrack>,
        store: &mut CheckpointStore,
        mut on_record: F,
    ) -> Result<AugmentReport>
    where
        F: FnMut(&AugmentationRecord),
    {
        let mut stats = AugmentStats::default();
        let mut records = Vec::with_capacity(tracks.len());
        let flush_interval = self.settings.flush_interval.max(1);
        let mut unflushed = 0usize;

        for track in tracks {
            if let Some(existing) = store.get(track.id()) {
                stats.reused += 1;
                on_record(existing);
                records.push(existing.clone());
                continue;
            }

            if !track.is_unknown() {
                let record = AugmentationRecord::from_metadata(track);
                stats.from_metadata += 1;
                on_record(&record);
                store.put(record.clone());
                records.push(record);

                unflushed += 1;
                if unflushed >= flush_interval {
                    store.persist()?;
                    unflushed = 0;
                }
                continue;
            }

            info!(
                "Fetching lyrics for: {} - {}",
                track.track.name, track.track.artist
            );
            stats.looked_up += 1;
            let outcome = self.lookup(&track).await;
            let record = self.resolve(track, outcome);

            match (record.source, &record.lyrics_snippet) {
                (RecordSource::GeniusNotFound, _) => stats.not_found += 1,
                (_, Some(_)) => stats.resolved_by_lyrics += 1,
                (_, None) => stats.without_lyrics += 1,
            }

            on_record(&record);
            store.put(record.clone());
            records.push(record);
            store.persist()?;
            unflushed = 0;

            tokio::time::sleep(self.settings.lookup_delay()).await;
        }

        if unflushed > 0 {
            store.persist()?;
        }

        debug!("Augmentation finished: {:?}", stats);
        Ok(AugmentReport { records, stats })
    }

    /// Query the provider for a track's lyrics.
    pub async fn lookup(&self, track: &ScoredTrack) -> LookupOutcome {
        let query = search_query(&track.track.name, &track.track.artist);

        let url = match self
            .retry
            .run("lyrics search", || self.provider.search(&query))
            .await
        {
            Ok(Some(url)) => url,
            Ok(None) => return LookupOutcome::NotFound,
            Err(e) => {
                warn!("Lyrics search failed for {}: {}", track.id(), e);
                return LookupOutcome::Found { lyrics: None };
            }
        };

        if let Err(e) = url::Url::parse(&url) {
            warn!("Unusable lyrics page URL '{}' for {}: {}", url, track.id(), e);
            return LookupOutcome::Found { lyrics: None };
        }

        match self
            .retry
            .run("lyrics page", || self.provider.fetch_page(&url))
            .await
        {
            Ok(page) => {
                let lyrics = extract_lyrics(&page);
                if lyrics.is_none() {
                    debug!("No lyrics text on {}", url);
                }
                LookupOutcome::Found { lyrics }
            }
            Err(e) => {
                warn!("Error fetching {}: {}", url, e);
                LookupOutcome::Found { lyrics: None }
            }
        }
    }

    /// Turn a lookup outcome into the stored record.
    fn resolve(&self, track: ScoredTrack, outcome: LookupOutcome) -> AugmentationRecord {
        let mut scored = track;

        let (source, genius_known, snippet) = match outcome {
            LookupOutcome::NotFound => (RecordSource::GeniusNotFound, false, None),
            LookupOutcome::Found { lyrics } => {
                let snippet = lyrics
                    .map(|text| truncate_snippet(&text, self.settings.snippet_max_chars))
                    .filter(|s| !s.trim().is_empty());
                (RecordSource::Genius, true, snippet)
            }
        };

        let (language, confidence) = match &snippet {
            Some(text) => detect_top(self.oracle.as_ref(), text, self.min_text_len).into_parts(),
            None => (UNKNOWN.to_string(), 0.0),
        };
        scored.final_language = language;
        scored.confidence = round_confidence(confidence);

        AugmentationRecord {
            scored,
            source,
            genius_known: Some(genius_known),
            lyrics_snippet: snippet,
        }
    }
}

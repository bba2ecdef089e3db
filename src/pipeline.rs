//! Pipeline orchestrator for lingo.
//!
//! Wires the stages together: metadata detection, lyrics augmentation and
//! playlist creation. Each stage reads the previous stage's output file, so
//! stages can also be run on their own.

use crate::augment::{AugmentReport, LyricsAugmentor};
use crate::catalog::{load_catalog, load_scored, read_records, write_records, AugmentationRecord, ScoredTrack};
use crate::checkpoint::CheckpointStore;
use crate::config::Settings;
use crate::detection::{label_track, InstrumentalClassifier, LanguageOracle, WeightedLanguageScorer, WhatlangOracle};
use crate::error::{LingoError, Result};
use crate::grouping::{LanguageGrouper, LanguageGroups};
use crate::http::RetryPolicy;
use crate::lyrics::{GeniusClient, LyricsProvider};
use crate::playlist::{PlaylistCreator, PlaylistReport, PlaylistSink, SpotifyPlaylistClient};
use crate::summary::LanguageSummary;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// Which languages get a playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageSelection {
    /// Every grouped language except `unknown`.
    All,
    /// Only these codes, in the given order.
    Only(Vec<String>),
}

impl LanguageSelection {
    /// Parse `all` or a comma-separated list of language codes.
    pub fn parse(input: &str) -> Result<Self> {
        if input.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        let mut languages: Vec<String> = Vec::new();
        for code in input.split(',').map(|c| c.trim().to_lowercase()) {
            if !code.is_empty() && !languages.contains(&code) {
                languages.push(code);
            }
        }
        if languages.is_empty() {
            return Err(LingoError::InvalidInput(
                "expected 'all' or a comma-separated list of language codes".to_string(),
            ));
        }
        Ok(Self::Only(languages))
    }

    /// Resolve against the groups actually present.
    pub fn resolve(&self, groups: &LanguageGroups) -> Vec<String> {
        match self {
            Self::All => PlaylistCreator::default_languages(groups),
            Self::Only(languages) => languages.clone(),
        }
    }
}

/// Outcome of a full `run`.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub detected: LanguageSummary,
    pub augment: AugmentReport,
    pub playlists: PlaylistReport,
}

/// The main orchestrator for the lingo pipeline.
///
/// Network collaborators are created on first use from the environment,
/// so `detect` works without any tokens. Tests inject fakes instead.
pub struct Pipeline {
    settings: Settings,
    oracle: Arc<dyn LanguageOracle>,
    lyrics: Option<Arc<dyn LyricsProvider>>,
    playlists: Option<Arc<dyn PlaylistSink>>,
}

impl Pipeline {
    /// Create a pipeline with the default oracle and env-configured clients.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            oracle: Arc::new(WhatlangOracle::new()),
            lyrics: None,
            playlists: None,
        }
    }

    pub fn with_oracle(mut self, oracle: Arc<dyn LanguageOracle>) -> Self {
        self.oracle = oracle;
        self
    }

    pub fn with_lyrics_provider(mut self, provider: Arc<dyn LyricsProvider>) -> Self {
        self.lyrics = Some(provider);
        self
    }

    pub fn with_playlist_sink(mut self, sink: Arc<dyn PlaylistSink>) -> Self {
        self.playlists = Some(sink);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn lyrics_provider(&self) -> Result<Arc<dyn LyricsProvider>> {
        match &self.lyrics {
            Some(provider) => Ok(provider.clone()),
            None => Ok(Arc::new(GeniusClient::from_env(&self.settings.lyrics)?)),
        }
    }

    fn playlist_sink(&self) -> Result<Arc<dyn PlaylistSink>> {
        match &self.playlists {
            Some(sink) => Ok(sink.clone()),
            None => Ok(Arc::new(SpotifyPlaylistClient::from_env(&self.settings.playlist)?)),
        }
    }

    /// Metadata stage: label every catalog track and write the scored file.
    #[instrument(skip(self))]
    pub fn detect(&self, input: &Path, output: &Path) -> Result<Vec<ScoredTrack>> {
        let tracks = load_catalog(input)?;
        info!("Loaded {} tracks from {}", tracks.len(), input.display());

        let scorer = WeightedLanguageScorer::new(self.oracle.clone(), self.settings.detection.clone());
        let classifier = InstrumentalClassifier::new(&self.settings.instrumental);

        let scored: Vec<ScoredTrack> = tracks
            .into_iter()
            .map(|track| label_track(&scorer, &classifier, track))
            .collect();

        write_records(output, &scored)?;
        info!("Wrote {} scored tracks to {}", scored.len(), output.display());
        Ok(scored)
    }

    /// Lyrics stage: resume from `output` and resolve remaining `unknown` tracks.
    pub async fn augment(&self, input: &Path, output: &Path) -> Result<AugmentReport> {
        let tracks = load_scored(input)?;
        self.augment_tracks(tracks, output, |_| {}).await
    }

    /// Lyrics stage over already loaded tracks, calling `on_record` per track.
    #[instrument(skip(self, tracks, on_record), fields(tracks = tracks.len()))]
    pub async fn augment_tracks<F>(
        &self,
        tracks: Vec<ScoredTrack>,
        output: &Path,
        on_record: F,
    ) -> Result<AugmentReport>
    where
        F: FnMut(&AugmentationRecord),
    {
        let mut store = CheckpointStore::load(output)?;
        let augmentor = LyricsAugmentor::new(
            self.lyrics_provider()?,
            self.oracle.clone(),
            RetryPolicy::lyrics(&self.settings.retry),
            self.settings.lyrics.clone(),
            self.settings.detection.min_text_len,
        );

        let report = augmentor
            .augment_with_progress(tracks, &mut store, on_record)
            .await?;
        // Current input first, then records kept from earlier inputs.
        let current: HashSet<&str> = report.records.iter().map(|r| r.id()).collect();
        let mut ordered = report.records.clone();
        ordered.extend(
            store
                .records()
                .iter()
                .filter(|r| !current.contains(r.id()))
                .cloned(),
        );
        write_records(output, &ordered)?;
        Ok(report)
    }

    /// Group the resolved tracks of `input` by language.
    pub fn groups(&self, input: &Path) -> Result<LanguageGroups> {
        let records: Vec<AugmentationRecord> = read_records(input)?;
        Ok(LanguageGrouper::group(&records))
    }

    /// Playlist stage: one playlist per selected language.
    #[instrument(skip(self))]
    pub async fn create_playlists(
        &self,
        input: &Path,
        selection: &LanguageSelection,
    ) -> Result<PlaylistReport> {
        let groups = self.groups(input)?;
        let languages = selection.resolve(&groups);
        info!(
            "Creating playlists for {} of {} languages",
            languages.len(),
            groups.len()
        );

        let creator = PlaylistCreator::new(
            self.playlist_sink()?,
            RetryPolicy::playlist(&self.settings.retry),
            self.settings.playlist.clone(),
        );
        Ok(creator.create_all(&groups, &languages).await)
    }

    /// All stages in sequence over the configured data directory.
    pub async fn run(&self, catalog: &Path, selection: &LanguageSelection) -> Result<RunReport> {
        let scored_path = self.settings.scored_path();
        let augmented_path = self.settings.augmented_path();

        let scored = self.detect(catalog, &scored_path)?;
        let detected = LanguageSummary::from_tracks(&scored);

        let augment = self.augment_tracks(scored, &augmented_path, |_| {}).await?;
        let playlists = self.create_playlists(&augmented_path, selection).await?;

        Ok(RunReport {
            detected,
            augment,
            playlists,
        })
    }
}

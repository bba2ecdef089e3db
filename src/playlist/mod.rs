//! Playlist creation from language groups.
//!
//! Each requested language becomes one playlist. Languages below the minimum
//! size are skipped, track ids are added in bounded batches with a pause
//! between writes, and a failure for one language never stops the others.

mod spotify;

pub use spotify::SpotifyPlaylistClient;

use crate::catalog::UNKNOWN;
use crate::config::PlaylistSettings;
use crate::grouping::LanguageGroups;
use crate::http::{HttpFailure, RetryError, RetryPolicy};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Write-side of a playlist service.
#[async_trait]
pub trait PlaylistSink: Send + Sync {
    /// Id of the account playlists are created for.
    async fn current_user(&self) -> Result<String, HttpFailure>;

    /// Create an empty playlist and return its id.
    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
    ) -> Result<String, HttpFailure>;

    /// Append tracks to a playlist.
    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<(), HttpFailure>;
}

/// What happened for one language.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaylistOutcome {
    Created {
        name: String,
        playlist_id: String,
        tracks: usize,
    },
    Skipped {
        tracks: usize,
    },
    Failed {
        name: String,
        error: RetryError,
    },
}

/// Per-language outcomes, in request order.
#[derive(Debug, Clone, Default)]
pub struct PlaylistReport {
    pub results: Vec<(String, PlaylistOutcome)>,
}

impl PlaylistReport {
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, PlaylistOutcome::Created { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, PlaylistOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, PlaylistOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&PlaylistOutcome) -> bool) -> usize {
        self.results.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Creates one playlist per language through a [`PlaylistSink`].
pub struct PlaylistCreator {
    sink: Arc<dyn PlaylistSink>,
    retry: RetryPolicy,
    settings: PlaylistSettings,
}

impl PlaylistCreator {
    pub fn new(sink: Arc<dyn PlaylistSink>, retry: RetryPolicy, settings: PlaylistSettings) -> Self {
        Self {
            sink,
            retry,
            settings,
        }
    }

    /// Every grouped language except `unknown`.
    pub fn default_languages(groups: &LanguageGroups) -> Vec<String> {
        groups
            .languages()
            .filter(|lang| *lang != UNKNOWN)
            .map(str::to_string)
            .collect()
    }

    /// Create playlists for `languages`, isolating failures per language.
    #[instrument(skip_all, fields(languages = languages.len()))]
    pub async fn create_all(&self, groups: &LanguageGroups, languages: &[String]) -> PlaylistReport {
        let mut report = PlaylistReport::default();
        let mut user_id: Option<String> = None;

        for language in languages {
            let ids = groups.get(language).unwrap_or(&[]);
            if ids.len() < self.settings.min_size {
                info!(
                    "Skipping {}: only {} tracks (need at least {})",
                    language,
                    ids.len(),
                    self.settings.min_size
                );
                report
                    .results
                    .push((language.clone(), PlaylistOutcome::Skipped { tracks: ids.len() }));
                continue;
            }

            let name = self.settings.playlist_name(language);
            let outcome = match self.create_one(&mut user_id, &name, ids).await {
                Ok(playlist_id) => PlaylistOutcome::Created {
                    name,
                    playlist_id,
                    tracks: ids.len(),
                },
                Err(error) => {
                    warn!("Failed to create playlist '{}': {}", name, error);
                    PlaylistOutcome::Failed { name, error }
                }
            };
            report.results.push((language.clone(), outcome));
        }

        report
    }

    async fn create_one(
        &self,
        user_id: &mut Option<String>,
        name: &str,
        ids: &[String],
    ) -> Result<String, RetryError> {
        if user_id.is_none() {
            let user = self
                .retry
                .run("current user", || self.sink.current_user())
                .await?;
            *user_id = Some(user);
        }
        let user = user_id.clone().unwrap_or_default();

        info!("Creating playlist '{}' with {} tracks", name, ids.len());
        let playlist_id = self
            .retry
            .run("create playlist", || {
                self.sink.create_playlist(&user, name, self.settings.public)
            })
            .await?;
        tokio::time::sleep(self.settings.write_delay()).await;

        let mut added = 0;
        for batch in ids.chunks(self.settings.batch_size.max(1)) {
            self.retry
                .run("add tracks", || self.sink.add_tracks(&playlist_id, batch))
                .await?;
            added += batch.len();
            info!("Added {}/{} tracks to '{}'", added, ids.len(), name);
            tokio::time::sleep(self.settings.write_delay()).await;
        }

        Ok(playlist_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ScoredTrack, Track};
    use crate::config::RetrySettings;
    use crate::grouping::LanguageGrouper;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSink {
        fail_name: Option<String>,
        unavailable_name: Option<String>,
        created: Mutex<Vec<String>>,
        batches: Mutex<Vec<(String, usize)>>,
        user_calls: Mutex<usize>,
        unavailable_calls: Mutex<u32>,
    }

    #[async_trait]
    impl PlaylistSink for FakeSink {
        async fn current_user(&self) -> Result<String, HttpFailure> {
            *self.user_calls.lock().unwrap() += 1;
            Ok("me".to_string())
        }

        async fn create_playlist(
            &self,
            user_id: &str,
            name: &str,
            _public: bool,
        ) -> Result<String, HttpFailure> {
            assert_eq!(user_id, "me");
            if self.fail_name.as_deref() == Some(name) {
                return Err(HttpFailure::Client(403));
            }
            if self.unavailable_name.as_deref() == Some(name) {
                *self.unavailable_calls.lock().unwrap() += 1;
                return Err(HttpFailure::Server(503));
            }
            let mut created = self.created.lock().unwrap();
            created.push(name.to_string());
            Ok(format!("pl{}", created.len()))
        }

        async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<(), HttpFailure> {
            self.batches
                .lock()
                .unwrap()
                .push((playlist_id.to_string(), track_ids.len()));
            Ok(())
        }
    }

    fn groups(counts: &[(&str, usize)]) -> LanguageGroups {
        let mut tracks = Vec::new();
        for (lang, count) in counts {
            for i in 0..*count {
                tracks.push(ScoredTrack {
                    track: Track::new(&format!("{}-{}", lang, i), "n", "a", "b"),
                    final_language: lang.to_string(),
                    confidence: 1.0,
                    details: BTreeMap::new(),
                });
            }
        }
        LanguageGrouper::group(&tracks)
    }

    fn creator(sink: Arc<FakeSink>) -> PlaylistCreator {
        let settings = PlaylistSettings {
            write_delay_ms: 0,
            ..PlaylistSettings::default()
        };
        PlaylistCreator::new(
            sink,
            RetryPolicy::playlist(&RetrySettings::default()).without_delays(),
            settings,
        )
    }

    #[tokio::test]
    async fn test_batches_and_skips() {
        let sink = Arc::new(FakeSink::default());
        let groups = groups(&[("fra", 250), ("spa", 3), (UNKNOWN, 40)]);
        let languages = PlaylistCreator::default_languages(&groups);
        assert_eq!(languages, vec!["fra".to_string(), "spa".to_string()]);

        let report = creator(sink.clone()).create_all(&groups, &languages).await;

        assert_eq!(report.created(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(*sink.created.lock().unwrap(), vec!["My FRA Songs".to_string()]);
        let sizes: Vec<usize> = sink.batches.lock().unwrap().iter().map(|(_, n)| *n).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let sink = Arc::new(FakeSink {
            fail_name: Some("My FRA Songs".to_string()),
            ..FakeSink::default()
        });
        let groups = groups(&[("fra", 12), ("deu", 15)]);
        let languages = vec!["fra".to_string(), "deu".to_string(), "ita".to_string()];

        let report = creator(sink.clone()).create_all(&groups, &languages).await;

        assert!(matches!(report.results[0].1, PlaylistOutcome::Failed { .. }));
        assert!(matches!(
            report.results[1].1,
            PlaylistOutcome::Created { tracks: 15, .. }
        ));
        assert_eq!(report.results[2].1, PlaylistOutcome::Skipped { tracks: 0 });
        assert_eq!(*sink.user_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_budget_is_isolated() {
        let sink = Arc::new(FakeSink {
            unavailable_name: Some("My SPA Songs".to_string()),
            ..FakeSink::default()
        });
        let groups = groups(&[("spa", 11), ("fra", 12)]);
        let languages = PlaylistCreator::default_languages(&groups);

        let report = creator(sink.clone()).create_all(&groups, &languages).await;

        match &report.results[0].1 {
            PlaylistOutcome::Failed {
                error: RetryError::Exhausted { attempts, last, .. },
                ..
            } => {
                assert_eq!(*attempts, RetrySettings::default().max_attempts);
                assert_eq!(*last, HttpFailure::Server(503));
            }
            other => panic!("expected exhausted failure, got {:?}", other),
        }
        assert_eq!(
            *sink.unavailable_calls.lock().unwrap(),
            RetrySettings::default().max_attempts
        );
        assert!(matches!(
            report.results[1].1,
            PlaylistOutcome::Created { tracks: 12, .. }
        ));
        assert_eq!(report.failed(), 1);
        assert_eq!(report.created(), 1);
    }
}

//! Instrumental track classification.

use crate::catalog::Track;
use crate::config::InstrumentalSettings;

/// Decides whether a track skips text-based scoring.
///
/// An explicit `instrumental` (or `is_instrumental`) flag from the export wins. Otherwise a raw
/// `instrumentalness` at or above the configured threshold marks the track
/// instrumental. Tracks with neither are treated as vocal.
#[derive(Debug, Clone)]
pub struct InstrumentalClassifier {
    threshold: f64,
}

impl InstrumentalClassifier {
    pub fn new(settings: &InstrumentalSettings) -> Self {
        Self {
            threshold: settings.threshold,
        }
    }

    pub fn classify(&self, track: &Track) -> bool {
        match (track.instrumental_flag(), track.instrumentalness) {
            (Some(flag), _) => flag,
            (None, Some(value)) => value >= self.threshold,
            (None, None) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(threshold: f64) -> InstrumentalClassifier {
        InstrumentalClassifier::new(&InstrumentalSettings { threshold })
    }

    #[test]
    fn test_flag_wins_over_instrumentalness() {
        let mut track = Track::new("1", "a", "b", "c");
        track.instrumental = Some(false);
        track.instrumentalness = Some(0.99);
        assert!(!classifier(0.9).classify(&track));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut track = Track::new("1", "a", "b", "c");
        track.instrumentalness = Some(0.9);
        assert!(classifier(0.9).classify(&track));

        track.instrumentalness = Some(0.6);
        assert!(!classifier(0.9).classify(&track));
        assert!(classifier(0.5).classify(&track));
    }

    #[test]
    fn test_is_instrumental_key() {
        let mut track = Track::new("1", "a", "b", "c");
        track
            .extra
            .insert("is_instrumental".to_string(), serde_json::Value::Bool(true));
        track.instrumentalness = Some(0.1);
        assert!(classifier(0.9).classify(&track));
    }

    #[test]
    fn test_no_signal_means_vocal() {
        assert!(!classifier(0.9).classify(&Track::new("1", "a", "b", "c")));
    }
}

//! Language detection for catalog tracks.
//!
//! A [`LanguageOracle`] ranks candidate languages for a single piece of text.
//! The [`WeightedLanguageScorer`] combines oracle results across metadata
//! fields, and the [`InstrumentalClassifier`] lets instrumental tracks bypass
//! text scoring entirely.

mod instrumental;
mod scorer;
mod oracle;

pub use instrumental::InstrumentalClassifier;
pub use scorer::{LanguageDecision, WeightedLanguageScorer};
pub use oracle::{language_name, WhatlangOracle};

use crate::catalog::{round_confidence, ScoredTrack, Track, INSTRUMENTAL};
use std::collections::BTreeMap;

/// One ranked candidate returned by an oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageGuess {
    pub language: String,
    pub probability: f64,
}

impl LanguageGuess {
    pub fn new(language: &str, probability: f64) -> Self {
        Self {
            language: language.to_string(),
            probability,
        }
    }
}

/// Maps text to ranked language candidates.
///
/// Implementations must be deterministic: the same text always yields the
/// same ranking. An empty ranking means the oracle found nothing.
pub trait LanguageOracle: Send + Sync {
    /// Rank candidate languages for `text`, most likely first.
    fn rank(&self, text: &str) -> Vec<LanguageGuess>;
}

/// Outcome of asking the oracle about a single text.
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    Resolved { language: String, probability: f64 },
    Unresolved(UnresolvedReason),
}

/// Why a text produced no language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// Empty, whitespace, or shorter than the minimum length.
    TooShort,
    /// The oracle returned no ranking.
    NoRanking,
}

impl Detection {
    /// Language and probability, with `unknown`/0.0 for unresolved texts.
    pub fn into_parts(self) -> (String, f64) {
        match self {
            Detection::Resolved {
                language,
                probability,
            } => (language, probability),
            Detection::Unresolved(_) => (crate::catalog::UNKNOWN.to_string(), 0.0),
        }
    }
}

/// Ask the oracle about `text` and keep only its top-ranked candidate.
pub fn detect_top(oracle: &dyn LanguageOracle, text: &str, min_text_len: usize) -> Detection {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().count() < min_text_len {
        return Detection::Unresolved(UnresolvedReason::TooShort);
    }

    match oracle.rank(trimmed).into_iter().next() {
        Some(top) if !top.language.is_empty() && top.probability.is_finite() => {
            Detection::Resolved {
                language: top.language,
                probability: top.probability.clamp(0.0, 1.0),
            }
        }
        _ => Detection::Unresolved(UnresolvedReason::NoRanking),
    }
}

/// Run the metadata stage for one track: instrumental short-circuit, then weighted scoring.
pub fn label_track(
    scorer: &WeightedLanguageScorer,
    classifier: &InstrumentalClassifier,
    track: Track,
) -> ScoredTrack {
    let instrumental = classifier.classify(&track);
    let mut track = track;
    track.instrumental = Some(instrumental);

    if instrumental {
        return ScoredTrack {
            track,
            final_language: INSTRUMENTAL.to_string(),
            confidence: 1.0,
            details: BTreeMap::new(),
        };
    }

    let decision = scorer.score(&track);
    ScoredTrack {
        track,
        final_language: decision.language,
        confidence: round_confidence(decision.confidence),
        details: decision.details,
    }
}

/// Test oracle answering from a fixed text → ranking table.
#[cfg(test)]
pub(crate) mod testing {
    use super::{LanguageGuess, LanguageOracle};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    pub struct TableOracle {
        answers: HashMap<String, Vec<LanguageGuess>>,
        calls: AtomicUsize,
    }

    impl TableOracle {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, text: &str, language: &str, probability: f64) -> Self {
            self.answers
                .entry(text.to_string())
                .or_default()
                .push(LanguageGuess::new(language, probability));
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl LanguageOracle for TableOracle {
        fn rank(&self, text: &str) -> Vec<LanguageGuess> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answers.get(text).cloned().unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::TableOracle;
    use super::*;
    use crate::config::{DetectionSettings, InstrumentalSettings};
    use std::sync::Arc;

    #[test]
    fn test_detect_top_skips_short_text() {
        let oracle = TableOracle::new().with("ab", "eng", 0.99);
        assert_eq!(
            detect_top(&oracle, "  ab ", 3),
            Detection::Unresolved(UnresolvedReason::TooShort)
        );
        assert_eq!(
            detect_top(&oracle, "   ", 3),
            Detection::Unresolved(UnresolvedReason::TooShort)
        );
        assert_eq!(oracle.calls(), 0);
    }

    #[test]
    fn test_detect_top_takes_first_candidate() {
        let oracle = TableOracle::new()
            .with("Bonjour", "fra", 0.7)
            .with("Bonjour", "ita", 0.3);
        assert_eq!(
            detect_top(&oracle, "Bonjour", 3),
            Detection::Resolved {
                language: "fra".to_string(),
                probability: 0.7
            }
        );
    }

    #[test]
    fn test_detect_top_empty_ranking() {
        let oracle = TableOracle::new();
        assert_eq!(
            detect_top(&oracle, "Bonjour", 3),
            Detection::Unresolved(UnresolvedReason::NoRanking)
        );
    }

    #[test]
    fn test_instrumental_short_circuit() {
        let oracle = Arc::new(TableOracle::new().with("Bonjour", "fra", 0.99));
        let scorer = WeightedLanguageScorer::new(oracle.clone(), DetectionSettings::default());
        let classifier = InstrumentalClassifier::new(&InstrumentalSettings::default());

        let mut track = Track::new("1", "Bonjour", "Bonjour", "Bonjour");
        track.instrumental = Some(true);

        let scored = label_track(&scorer, &classifier, track);
        assert_eq!(scored.final_language, INSTRUMENTAL);
        assert_eq!(scored.confidence, 1.0);
        assert!(scored.details.is_empty());
        assert_eq!(oracle.calls(), 0);
    }

    #[test]
    fn test_label_track_records_effective_flag() {
        let oracle = Arc::new(TableOracle::new());
        let scorer = WeightedLanguageScorer::new(oracle, DetectionSettings::default());
        let classifier = InstrumentalClassifier::new(&InstrumentalSettings::default());

        let mut track = Track::new("1", "Interlude", "Band", "Record");
        track.instrumentalness = Some(0.95);

        let scored = label_track(&scorer, &classifier, track);
        assert_eq!(scored.track.instrumental, Some(true));
        assert!(scored.is_instrumental());

        let plain = label_track(&scorer, &classifier, Track::new("2", "", "", ""));
        assert_eq!(plain.track.instrumental, Some(false));
        assert!(plain.is_unknown());
    }
}

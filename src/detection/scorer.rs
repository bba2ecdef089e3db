//! Weighted multi-field language scoring.

use super::{detect_top, Detection, LanguageOracle};
use crate::catalog::{Field, FieldDetail, Track, UNKNOWN};
use crate::config::DetectionSettings;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::trace;

/// Track-level language decision.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageDecision {
    /// Winning language code, or `unknown`.
    pub language: String,
    /// Accumulated weighted score of the winning language, kept even when
    /// the label was rejected by the threshold.
    pub confidence: f64,
    /// Top oracle result per field.
    pub details: BTreeMap<String, FieldDetail>,
}

/// Combines per-field oracle results into one decision.
///
/// Fields are visited in the fixed order name, artist, album. Each resolved
/// field adds `probability * weight` to its language; the highest total wins
/// and equal totals go to the language seen first.
pub struct WeightedLanguageScorer {
    oracle: Arc<dyn LanguageOracle>,
    settings: DetectionSettings,
}

impl WeightedLanguageScorer {
    pub fn new(oracle: Arc<dyn LanguageOracle>, settings: DetectionSettings) -> Self {
        Self { oracle, settings }
    }

    fn weight(&self, field: Field) -> f64 {
        let weights = &self.settings.field_weights;
        match field {
            Field::Name => weights.name,
            Field::Artist => weights.artist,
            Field::Album => weights.album,
        }
    }

    pub fn score(&self, track: &Track) -> LanguageDecision {
        let mut details = BTreeMap::new();
        // Insertion-ordered accumulator.
        let mut scores: Vec<(String, f64)> = Vec::new();

        for field in Field::ALL {
            let detection = detect_top(
                self.oracle.as_ref(),
                track.field(field),
                self.settings.min_text_len,
            );

            let detail = match detection {
                Detection::Resolved {
                    language,
                    probability,
                } => {
                    let weighted = probability * self.weight(field);
                    match scores.iter_mut().find(|(lang, _)| *lang == language) {
                        Some((_, total)) => *total += weighted,
                        None => scores.push((language.clone(), weighted)),
                    }
                    FieldDetail {
                        language,
                        probability,
                    }
                }
                Detection::Unresolved(reason) => {
                    trace!(track = %track.id, %field, ?reason, "field unresolved");
                    FieldDetail::unknown()
                }
            };
            details.insert(field.as_str().to_string(), detail);
        }

        let mut best: Option<(String, f64)> = None;
        for (language, total) in scores {
            match &best {
                Some((_, best_total)) if total <= *best_total => {}
                _ => best = Some((language, total)),
            }
        }

        let Some((language, total)) = best else {
            return LanguageDecision {
                language: UNKNOWN.to_string(),
                confidence: 0.0,
                details,
            };
        };

        let confidence = if self.settings.clamp_confidence {
            total.min(1.0)
        } else {
            total
        };

        let language = if total >= self.settings.confidence_threshold {
            language
        } else {
            UNKNOWN.to_string()
        };

        LanguageDecision {
            language,
            confidence,
            details,
        }
    }
}

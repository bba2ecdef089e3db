//! Data models for catalog tracks at each pipeline stage.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Language label for tracks no stage could classify.
pub const UNKNOWN: &str = "unknown";

/// Language label for tracks flagged as instrumental.
pub const INSTRUMENTAL: &str = "instrumental";

/// A track as exported from the catalog source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    /// Stable catalog identifier.
    pub id: String,
    /// Track title.
    pub name: String,
    /// Primary artist name.
    pub artist: String,
    /// Album title.
    pub album: String,
    /// Precomputed instrumental flag, if the export carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrumental: Option<bool>,
    /// Raw audio-feature instrumentalness in [0, 1], if the export carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrumentalness: Option<f64>,
    /// Every other key of the export, carried through each stage unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Track {
    pub fn new(id: &str, name: &str, artist: &str, album: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            artist: artist.to_string(),
            album: album.to_string(),
            instrumental: None,
            instrumentalness: None,
            extra: Map::new(),
        }
    }

    /// Instrumental flag under either of the names exports use.
    pub fn instrumental_flag(&self) -> Option<bool> {
        self.instrumental
            .or_else(|| self.extra.get("is_instrumental").and_then(Value::as_bool))
    }

    /// Text of a metadata field.
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Artist => &self.artist,
            Field::Album => &self.album,
        }
    }
}

/// Metadata fields fed to the language scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Name,
    Artist,
    Album,
}

impl Field {
    /// Fixed processing order; ties in the scorer resolve to the earliest field's language.
    pub const ALL: [Field; 3] = [Field::Name, Field::Artist, Field::Album];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Artist => "artist",
            Field::Album => "album",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top oracle result for one metadata field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDetail {
    #[serde(rename = "lang")]
    pub language: String,
    #[serde(rename = "prob")]
    pub probability: f64,
}

impl FieldDetail {
    pub fn unknown() -> Self {
        Self {
            language: UNKNOWN.to_string(),
            probability: 0.0,
        }
    }
}

/// A track after metadata language detection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredTrack {
    #[serde(flatten)]
    pub track: Track,
    /// Language code, `unknown`, or `instrumental`.
    pub final_language: String,
    /// Score that produced `final_language`.
    pub confidence: f64,
    /// Per-field oracle results keyed by field name; empty for instrumentals.
    #[serde(default)]
    pub details: BTreeMap<String, FieldDetail>,
}

impl ScoredTrack {
    pub fn id(&self) -> &str {
        &self.track.id
    }

    pub fn is_unknown(&self) -> bool {
        self.final_language == UNKNOWN
    }

    pub fn is_instrumental(&self) -> bool {
        self.final_language == INSTRUMENTAL
    }
}

/// Which signal resolved an augmented record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    /// Resolved from track metadata alone.
    Metadata,
    /// The lyrics provider knew the track.
    Genius,
    /// The lyrics provider had no match.
    GeniusNotFound,
}

impl std::fmt::Display for RecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordSource::Metadata => write!(f, "metadata"),
            RecordSource::Genius => write!(f, "genius"),
            RecordSource::GeniusNotFound => write!(f, "genius_not_found"),
        }
    }
}

/// A scored track after the lyrics augmentation stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AugmentationRecord {
    #[serde(flatten)]
    pub scored: ScoredTrack,
    pub source: RecordSource,
    /// Whether the lyrics provider knew the track; `None` when it was never asked.
    #[serde(default)]
    pub genius_known: Option<bool>,
    #[serde(default)]
    pub lyrics_snippet: Option<String>,
}

impl AugmentationRecord {
    /// Record for a track that metadata already resolved.
    pub fn from_metadata(scored: ScoredTrack) -> Self {
        Self {
            scored,
            source: RecordSource::Metadata,
            genius_known: None,
            lyrics_snippet: None,
        }
    }

    pub fn id(&self) -> &str {
        self.scored.id()
    }

    pub fn final_language(&self) -> &str {
        &self.scored.final_language
    }
}

/// Anything that carries a resolved language label.
pub trait Labeled {
    fn track_id(&self) -> &str;
    fn language(&self) -> &str;
}

impl Labeled for ScoredTrack {
    fn track_id(&self) -> &str {
        self.id()
    }

    fn language(&self) -> &str {
        &self.final_language
    }
}

impl Labeled for AugmentationRecord {
    fn track_id(&self) -> &str {
        self.id()
    }

    fn language(&self) -> &str {
        self.final_language()
    }
}

/// Round a confidence to four decimals for output.
pub fn round_confidence(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_optional_fields() {
        let track: Track = serde_json::from_str(
            r#"{"id": "1", "name": "Bonjour", "artist": "Edith Piaf", "album": "La Vie"}"#,
        )
        .unwrap();

        assert_eq!(track.instrumental, None);
        assert_eq!(track.field(Field::Artist), "Edith Piaf");

        let json = serde_json::to_value(&track).unwrap();
        assert!(json.get("instrumental").is_none());
    }

    #[test]
    fn test_unknown_export_fields_pass_through() {
        let input = serde_json::json!({
            "id": "1",
            "name": "Bonjour",
            "artist": "Edith Piaf",
            "album": "La Vie",
            "uri": "spotify:track:1",
            "is_instrumental": false,
            "instrumentalness": 0.01,
            "popularity": 61
        });
        let track: Track = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(track.instrumental, None);
        assert_eq!(track.instrumental_flag(), Some(false));
        assert_eq!(track.extra["uri"], "spotify:track:1");

        let scored = ScoredTrack {
            track,
            final_language: "fra".to_string(),
            confidence: 0.952,
            details: BTreeMap::new(),
        };
        let record = AugmentationRecord::from_metadata(scored);
        let json = serde_json::to_value(&record).unwrap();
        for (key, value) in input.as_object().unwrap() {
            assert_eq!(&json[key.as_str()], value, "field {} changed", key);
        }
        assert_eq!(json["final_language"], "fra");

        let back: AugmentationRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
        assert!(!back.scored.track.extra.contains_key("final_language"));
        assert!(!back.scored.track.extra.contains_key("source"));
    }

    #[test]
    fn test_missing_required_field_is_error() {
        let result: std::result::Result<Track, _> =
            serde_json::from_str(r#"{"id": "1", "name": "Bonjour", "artist": "Edith Piaf"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_augmentation_record_shape() {
        let scored = ScoredTrack {
            track: Track::new("42", "Hola", "Artista", "Disco"),
            final_language: UNKNOWN.to_string(),
            confidence: 0.0,
            details: BTreeMap::new(),
        };
        let record = AugmentationRecord {
            scored,
            source: RecordSource::GeniusNotFound,
            genius_known: Some(false),
            lyrics_snippet: None,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "42");
        assert_eq!(json["final_language"], "unknown");
        assert_eq!(json["source"], "genius_not_found");
        assert_eq!(json["genius_known"], false);
        assert!(json["lyrics_snippet"].is_null());

        let back: AugmentationRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_metadata_record_has_null_lookup_fields() {
        let scored = ScoredTrack {
            track: Track::new("7", "Bonjour", "Edith Piaf", "La Vie"),
            final_language: "fra".to_string(),
            confidence: 0.952,
            details: BTreeMap::new(),
        };
        let json = serde_json::to_value(AugmentationRecord::from_metadata(scored)).unwrap();
        assert_eq!(json["source"], "metadata");
        assert!(json["genius_known"].is_null());
    }

    #[test]
    fn test_round_confidence() {
        assert_eq!(round_confidence(0.95219), 0.9522);
        assert_eq!(round_confidence(1.0), 1.0);
    }
}

//! Language distribution reports.

use crate::catalog::{read_records, Labeled, INSTRUMENTAL, UNKNOWN};
use crate::detection::language_name;
use crate::error::Result;
use std::path::Path;

/// One row of a language distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryEntry {
    pub language: String,
    pub count: usize,
}

impl SummaryEntry {
    /// Human-readable language name, falling back to the code.
    pub fn display_name(&self) -> String {
        match self.language.as_str() {
            UNKNOWN => "Unknown".to_string(),
            INSTRUMENTAL => "Instrumental".to_string(),
            code => language_name(code)
                .map(str::to_string)
                .unwrap_or_else(|| code.to_string()),
        }
    }
}

/// Track counts per language, most common first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageSummary {
    pub total: usize,
    pub entries: Vec<SummaryEntry>,
}

impl LanguageSummary {
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut entries: Vec<SummaryEntry> = Vec::new();
        let mut total = 0;

        for label in labels {
            total += 1;
            match entries.iter_mut().find(|e| e.language == label) {
                Some(entry) => entry.count += 1,
                None => entries.push(SummaryEntry {
                    language: label.to_string(),
                    count: 1,
                }),
            }
        }

        // Stable sort keeps first-seen order among equal counts.
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        Self { total, entries }
    }

    pub fn from_tracks<T: Labeled>(tracks: &[T]) -> Self {
        Self::from_labels(tracks.iter().map(|t| t.language()))
    }

    /// Summarize any stage's output file.
    ///
    /// Reads `final_language`, falling back to `language`, and counts
    /// records with neither as `unknown`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let records: Vec<serde_json::Value> = read_records(path)?;
        let labels: Vec<&str> = records
            .iter()
            .map(|r| {
                r.get("final_language")
                    .or_else(|| r.get("language"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(UNKNOWN)
            })
            .collect();
        Ok(Self::from_labels(labels))
    }

    pub fn percent(&self, entry: &SummaryEntry) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            entry.count as f64 / self.total as f64 * 100.0
        }
    }

    pub fn count(&self, language: &str) -> usize {
        self.entries
            .iter()
            .find(|e| e.language == language)
            .map(|e| e.count)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_most_common_first() {
        let summary = LanguageSummary::from_labels(["fra", "spa", "spa", UNKNOWN, "fra", "spa"]);
        assert_eq!(summary.total, 6);
        assert_eq!(summary.entries[0].language, "spa");
        assert_eq!(summary.entries[1].language, "fra");
        assert_eq!(summary.count(UNKNOWN), 1);
        assert!((summary.percent(&summary.entries[0]) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_display_names() {
        let entry = |language: &str| SummaryEntry {
            language: language.to_string(),
            count: 1,
        };
        assert_eq!(entry("spa").display_name(), "Spanish");
        assert_eq!(entry(UNKNOWN).display_name(), "Unknown");
        assert_eq!(entry("xx").display_name(), "xx");
    }

    #[test]
    fn test_from_file_reads_either_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tracks.json");
        std::fs::write(
            &path,
            r#"[{"id": "1", "final_language": "fra"}, {"id": "2", "language": "fra"}, {"id": "3"}]"#,
        )
        .unwrap();

        let summary = LanguageSummary::from_file(&path).unwrap();
        assert_eq!(summary.count("fra"), 2);
        assert_eq!(summary.count(UNKNOWN), 1);
    }
}

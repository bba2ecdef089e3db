//! Projection of resolved tracks into per-language groups.

use crate::catalog::Labeled;

/// Language → track ids, in first-seen order for both languages and ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageGroups {
    groups: Vec<(String, Vec<String>)>,
}

impl LanguageGroups {
    /// Track ids for a language.
    pub fn get(&self, language: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(lang, _)| lang == language)
            .map(|(_, ids)| ids.as_slice())
    }

    /// Languages in first-seen order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(lang, _)| lang.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(lang, ids)| (lang.as_str(), ids.as_slice()))
    }

    /// Number of languages.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of grouped track ids.
    pub fn track_count(&self) -> usize {
        self.groups.iter().map(|(_, ids)| ids.len()).sum()
    }

    fn push(&mut self, language: &str, id: &str) {
        match self.groups.iter_mut().find(|(lang, _)| lang == language) {
            Some((_, ids)) => ids.push(id.to_string()),
            None => self
                .groups
                .push((language.to_string(), vec![id.to_string()])),
        }
    }
}

/// Groups resolved tracks by their final language. No filtering.
pub struct LanguageGrouper;

impl LanguageGrouper {
    pub fn group<T: Labeled>(tracks: &[T]) -> LanguageGroups {
        let mut groups = LanguageGroups::default();
        for track in tracks {
            groups.push(track.language(), track.track_id());
        }
        groups
    }
}

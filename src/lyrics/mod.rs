//! Lyrics provider abstraction.
//!
//! A provider answers two questions: which page best matches a free-text
//! query, and what raw document lives at that page. Lyrics extraction from
//! the document is provider-agnostic and lives in [`extract`].

mod extract;
mod genius;

pub use extract::{extract_lyrics, truncate_snippet};
pub use genius::GeniusClient;

use crate::http::HttpFailure;
use async_trait::async_trait;

/// Trait for lyrics providers.
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Search by free text; returns the best match's page URL, if any.
    async fn search(&self, query: &str) -> Result<Option<String>, HttpFailure>;

    /// Fetch the raw document behind a page URL.
    async fn fetch_page(&self, url: &str) -> Result<String, HttpFailure>;
}

/// Build the search query for a track.
pub fn search_query(name: &str, artist: &str) -> String {
    format!("{} {}", name.trim(), artist.trim()).trim().to_string()
}

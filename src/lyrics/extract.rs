//! Lyrics text extraction from provider pages.

use scraper::{Html, Selector};

const LYRICS_CONTAINER: &str = r#"div[data-lyrics-container="true"]"#;

/// Pull the text of every lyrics container, in document order.
///
/// Text nodes inside a container are joined with newlines, containers are
/// joined with newlines, and the result is trimmed. Returns `None` when the
/// page has no lyrics containers or they hold no text.
pub fn extract_lyrics(html: &str) -> Option<String> {
    let selector = Selector::parse(LYRICS_CONTAINER).ok()?;
    let document = Html::parse_document(html);

    let blocks: Vec<String> = document
        .select(&selector)
        .map(|container| container.text().collect::<Vec<_>>().join("\n"))
        .collect();

    let text = blocks.join("\n");
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Keep at most `max_chars` characters.
pub fn truncate_snippet(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

//! Genius lyrics provider.

use super::LyricsProvider;
use crate::config::LyricsSettings;
use crate::error::{LingoError, Result};
use crate::http::{check_status, create_client, HttpFailure};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Client for the Genius search API and song pages.
pub struct GeniusClient {
    client: reqwest::Client,
    search_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    response: SearchBody,
}

#[derive(Debug, Default, Deserialize)]
struct SearchBody {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    result: HitResult,
}

#[derive(Debug, Deserialize)]
struct HitResult {
    url: String,
}

impl GeniusClient {
    /// Create a client with an explicit access token.
    pub fn new(settings: &LyricsSettings, token: String) -> Result<Self> {
        Ok(Self {
            client: create_client(settings.request_timeout())?,
            search_url: settings.search_url.clone(),
            token,
        })
    }

    /// Create a client reading the token from the configured environment variable.
    pub fn from_env(settings: &LyricsSettings) -> Result<Self> {
        let token = match std::env::var(&settings.token_env) {
            Ok(token) if !token.trim().is_empty() => token,
            _ => {
                return Err(LingoError::Lyrics(format!(
                    "{} not set. Set it with: export {}='...'",
                    settings.token_env, settings.token_env
                )))
            }
        };
        Self::new(settings, token)
    }
}

#[async_trait]
impl LyricsProvider for GeniusClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> std::result::Result<Option<String>, HttpFailure> {
        let response = self
            .client
            .get(&self.search_url)
            .bearer_auth(&self.token)
            .query(&[("q", query)])
            .send()
            .await?;
        let body: SearchResponse = check_status(response)?.json().await?;

        let url = body.response.hits.into_iter().next().map(|hit| hit.result.url);
        debug!("Best match: {:?}", url);
        Ok(url)
    }

    #[instrument(skip(self))]
    async fn fetch_page(&self, url: &str) -> std::result::Result<String, HttpFailure> {
        let response = self.client.get(url).send().await?;
        Ok(check_status(response)?.text().await?)
    }
}

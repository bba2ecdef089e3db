//! Spotify Web API playlist client.
//!
//! Authentication is out of scope: the client expects a ready OAuth access
//! token with the playlist-modify scopes.

use super::PlaylistSink;
use crate::config::PlaylistSettings;
use crate::error::{LingoError, Result};
use crate::http::{check_status, create_client, HttpFailure};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Playlist writer backed by the Spotify Web API.
pub struct SpotifyPlaylistClient {
    client: reqwest::Client,
    api_base: Url,
    token: String,
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Debug, Serialize)]
struct CreatePlaylistRequest<'a> {
    name: &'a str,
    public: bool,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct AddTracksRequest {
    uris: Vec<String>,
}

impl SpotifyPlaylistClient {
    /// Create a client with an explicit access token.
    pub fn new(settings: &PlaylistSettings, token: String) -> Result<Self> {
        let api_base = Url::parse(&settings.api_base)
            .map_err(|e| LingoError::Config(format!("playlist.api_base: {}", e)))?;
        if api_base.cannot_be_a_base() {
            return Err(LingoError::Config(format!(
                "playlist.api_base is not a base URL: {}",
                settings.api_base
            )));
        }

        Ok(Self {
            client: create_client(REQUEST_TIMEOUT)?,
            api_base,
            token,
        })
    }

    /// Create a client reading the token from the configured environment variable.
    pub fn from_env(settings: &PlaylistSettings) -> Result<Self> {
        let token = match std::env::var(&settings.token_env) {
            Ok(token) if !token.trim().is_empty() => token,
            _ => {
                return Err(LingoError::Playlist(format!(
                    "{} not set. Provide an access token with playlist-modify scopes.",
                    settings.token_env
                )))
            }
        };
        Self::new(settings, token)
    }

    /// Append path segments to the API base, escaping each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Catalog ids become track URIs; full URIs pass through.
fn track_uri(id: &str) -> String {
    if id.starts_with("spotify:") {
        id.to_string()
    } else {
        format!("spotify:track:{}", id)
    }
}

#[async_trait]
impl PlaylistSink for SpotifyPlaylistClient {
    async fn current_user(&self) -> std::result::Result<String, HttpFailure> {
        let response = self
            .client
            .get(self.endpoint(&["me"]))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let body: IdResponse = check_status(response)?.json().await?;
        Ok(body.id)
    }

    #[instrument(skip(self))]
    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
    ) -> std::result::Result<String, HttpFailure> {
        let request = CreatePlaylistRequest {
            name,
            public,
            description: "Created by lingo",
        };
        let response = self
            .client
            .post(self.endpoint(&["users", user_id, "playlists"]))
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;
        let body: IdResponse = check_status(response)?.json().await?;
        debug!("Created playlist {}", body.id);
        Ok(body.id)
    }

    #[instrument(skip(self, track_ids), fields(count = track_ids.len()))]
    async fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> std::result::Result<(), HttpFailure> {
        let request = AddTracksRequest {
            uris: track_ids.iter().map(|id| track_uri(id)).collect(),
        };
        let response = self
            .client
            .post(self.endpoint(&["playlists", playlist_id, "tracks"]))
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_escapes_segments() {
        let client =
            SpotifyPlaylistClient::new(&PlaylistSettings::default(), "token".to_string()).unwrap();

        assert_eq!(
            client.endpoint(&["users", "jo smith", "playlists"]).as_str(),
            "https://api.spotify.com/v1/users/jo%20smith/playlists"
        );
        assert_eq!(client.endpoint(&["me"]).as_str(), "https://api.spotify.com/v1/me");
    }

    #[test]
    fn test_track_uri() {
        assert_eq!(track_uri("4uLU6hMCjMI75M1A2tKUQC"), "spotify:track:4uLU6hMCjMI75M1A2tKUQC");
        assert_eq!(track_uri("spotify:track:abc"), "spotify:track:abc");
    }

    #[test]
    fn test_rejects_bad_base() {
        let settings = PlaylistSettings {
            api_base: "not a url".to_string(),
            ..PlaylistSettings::default()
        };
        assert!(SpotifyPlaylistClient::new(&settings, "t".to_string()).is_err());
    }
}

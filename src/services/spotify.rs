//! Mood-based playlist search against the Spotify Web API.
//!
//! Uses the client-credentials flow: an app token is fetched from the
//! accounts service and reused until shortly before it expires.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{ensure_success, MusicRecommender, ServiceError};
use crate::config::SpotifyConfig;
use crate::models::{MoodCategory, PlaylistRef};

const SERVICE: &str = "spotify";

/// Playlists requested per search.
pub const SEARCH_LIMIT: u32 = 2;

/// Refresh the token this long before Spotify says it expires.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

// ── Mood profile table ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodProfile {
    pub query: &'static str,
    /// Genre hints for the mood. Not sent with the search.
    pub genres: &'static [&'static str],
}

impl MoodProfile {
    pub fn for_mood(mood: MoodCategory) -> Self {
        match mood {
            MoodCategory::Happy => MoodProfile {
                query: "happy mood playlist",
                genres: &["pop", "dance", "happy"],
            },
            MoodCategory::Sad => MoodProfile {
                query: "sad mood playlist",
                genres: &["acoustic", "sad", "rainy-day"],
            },
            MoodCategory::Neutral => MoodProfile {
                query: "chill mood playlist",
                genres: &["ambient", "chill", "relaxative"],
            },
        }
    }
}

// ── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    playlists: Option<PlaylistPage>,
}

#[derive(Debug, Default, Deserialize)]
struct PlaylistPage {
    #[serde(default)]
    items: Vec<Option<RawPlaylist>>,
}

#[derive(Debug, Deserialize)]
struct RawPlaylist {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Deserialize)]
struct ExternalUrls {
    #[serde(default)]
    spotify: Option<String>,
}

impl SearchResponse {
    /// Keep only entries that carry both a display name and a public URL.
    pub(crate) fn into_playlists(self) -> Vec<PlaylistRef> {
        let items = self.playlists.map(|p| p.items).unwrap_or_default();
        items
            .into_iter()
            .flatten()
            .filter_map(|raw| {
                let name = raw.name.filter(|n| !n.is_empty())?;
                let url = raw
                    .external_urls
                    .and_then(|u| u.spotify)
                    .filter(|u| !u.is_empty())?;
                Some(PlaylistRef { name, url })
            })
            .collect()
    }
}

// ── Client ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    /// Expiry for a token issued at `now`. A lifetime too large to represent
    /// counts as already expired, so the next call refreshes it.
    fn expiry(now: Instant, expires_in: u64) -> Instant {
        now.checked_add(Duration::from_secs(expires_in)).unwrap_or(now)
    }

    fn is_fresh(&self, now: Instant) -> bool {
        now + TOKEN_EXPIRY_MARGIN < self.expires_at
    }
}

pub struct SpotifyRecommender {
    client: Client,
    credentials: Option<(String, String)>,
    market: String,
    api_url: String,
    token_url: String,
    token: RwLock<Option<CachedToken>>,
}

impl SpotifyRecommender {
    pub fn new(client: Client, config: &SpotifyConfig) -> Self {
        if config.credentials.is_none() {
            tracing::warn!(
                "spotify: SPOTIFY_CLIENT_ID / SPOTIFY_CLIENT_SECRET not set, recommendations disabled"
            );
        }
        Self {
            client,
            credentials: config.credentials.clone(),
            market: config.market.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token_url: config.token_url.clone(),
            token: RwLock::new(None),
        }
    }

    async fn access_token(&self) -> Result<String, ServiceError> {
        let (client_id, client_secret) = self
            .credentials
            .as_ref()
            .ok_or(ServiceError::NotConfigured(SERVICE))?;

        if let Some(cached) = self.token.read().await.as_ref()
            && cached.is_fresh(Instant::now())
        {
            return Ok(cached.value.clone());
        }

        let resp = self
            .client
            .post(&self.token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(ServiceError::http(SERVICE))?;
        let token: TokenResponse = ensure_success(SERVICE, resp)
            .await?
            .json()
            .await
            .map_err(ServiceError::decode(SERVICE))?;

        let cached = CachedToken {
            value: token.access_token,
            expires_at: CachedToken::expiry(Instant::now(), token.expires_in),
        };
        let value = cached.value.clone();
        *self.token.write().await = Some(cached);
        tracing::debug!("spotify: refreshed access token");
        Ok(value)
    }

    fn search_request(&self, token: &str, mood: MoodCategory) -> reqwest::RequestBuilder {
        let profile = MoodProfile::for_mood(mood);
        let limit = SEARCH_LIMIT.to_string();
        self.client
            .get(format!("{}/search", self.api_url))
            .bearer_auth(token)
            .query(&[
                ("q", profile.query),
                ("type", "playlist"),
                ("limit", limit.as_str()),
                ("market", self.market.as_str()),
            ])
    }
}

#[async_trait]
impl MusicRecommender for SpotifyRecommender {
    async fn recommend(&self, mood: MoodCategory) -> Result<Vec<PlaylistRef>, ServiceError> {
        let token = self.access_token().await?;
        let profile = MoodProfile::for_mood(mood);

        let resp = self
            .search_request(&token, mood)
            .send()
            .await
            .map_err(ServiceError::http(SERVICE))?;
        let body: SearchResponse = ensure_success(SERVICE, resp)
            .await?
            .json()
            .await
            .map_err(ServiceError::decode(SERVICE))?;

        let playlists = body.into_playlists();
        if playlists.is_empty() {
            tracing::info!(query = profile.query, "spotify: no playlist results found");
        }
        Ok(playlists)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn decode(raw: &str) -> SearchResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn incomplete_entries_are_dropped() {
        let body = decode(
            r#"{
                "playlists": {
                    "items": [
                        {"name": "Rainy Day Acoustic",
                         "external_urls": {"spotify": "https://open.spotify.com/playlist/abc"}},
                        {"name": "No Link Here", "external_urls": {}},
                        null
                    ]
                }
            }"#,
        );
        assert_eq!(
            body.into_playlists(),
            vec![PlaylistRef {
                name: "Rainy Day Acoustic".to_string(),
                url: "https://open.spotify.com/playlist/abc".to_string(),
            }]
        );
    }

    #[test]
    fn empty_name_or_url_is_dropped() {
        let body = decode(
            r#"{"playlists": {"items": [
                {"name": "", "external_urls": {"spotify": "https://open.spotify.com/playlist/x"}},
                {"name": "Chill", "external_urls": {"spotify": ""}},
                {"external_urls": {"spotify": "https://open.spotify.com/playlist/y"}}
            ]}}"#,
        );
        assert!(body.into_playlists().is_empty());
    }

    #[test]
    fn missing_playlists_section_yields_nothing() {
        assert!(decode("{}").into_playlists().is_empty());
        assert!(decode(r#"{"playlists": {}}"#).into_playlists().is_empty());
    }

    #[test]
    fn every_mood_has_a_query() {
        assert_eq!(MoodProfile::for_mood(MoodCategory::Happy).query, "happy mood playlist");
        assert_eq!(MoodProfile::for_mood(MoodCategory::Sad).query, "sad mood playlist");
        assert_eq!(MoodProfile::for_mood(MoodCategory::Neutral).query, "chill mood playlist");
        assert!(MoodProfile::for_mood(MoodCategory::Sad).genres.contains(&"rainy-day"));
    }

    #[test]
    fn token_is_refreshed_before_expiry() {
        let now = Instant::now();
        let fresh = CachedToken {
            value: "t".to_string(),
            expires_at: now + Duration::from_secs(3600),
        };
        assert!(fresh.is_fresh(now));

        let nearly_expired = CachedToken {
            value: "t".to_string(),
            expires_at: now + Duration::from_secs(30),
        };
        assert!(!nearly_expired.is_fresh(now));
    }

    #[test]
    fn oversized_token_lifetime_does_not_overflow() {
        let now = Instant::now();
        let token = CachedToken {
            value: "t".to_string(),
            expires_at: CachedToken::expiry(now, u64::MAX),
        };
        assert!(!token.is_fresh(now));
        assert_eq!(
            CachedToken::expiry(now, 3600),
            now + Duration::from_secs(3600)
        );
    }

    fn test_config(market: &str) -> SpotifyConfig {
        SpotifyConfig {
            credentials: None,
            market: market.to_string(),
            api_url: "http://127.0.0.1:9/v1/".to_string(),
            token_url: "http://127.0.0.1:9/token".to_string(),
        }
    }

    #[test]
    fn search_request_is_scoped_playlist_query() {
        let recommender = SpotifyRecommender::new(Client::new(), &test_config("SE"));
        let request = recommender
            .search_request("tok", MoodCategory::Sad)
            .build()
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().path(), "/v1/search");
        let pairs: HashMap<String, String> = request.url().query_pairs().into_owned().collect();
        assert_eq!(pairs["q"], "sad mood playlist");
        assert_eq!(pairs["type"], "playlist");
        assert_eq!(pairs["limit"], "2");
        assert_eq!(pairs["market"], "SE");
        assert_eq!(request.headers()["authorization"], "Bearer tok");
    }

    #[test]
    fn search_query_follows_mood() {
        let recommender = SpotifyRecommender::new(Client::new(), &test_config("US"));
        let request = recommender
            .search_request("tok", MoodCategory::Neutral)
            .build()
            .unwrap();
        let pairs: HashMap<String, String> = request.url().query_pairs().into_owned().collect();
        assert_eq!(pairs["q"], "chill mood playlist");
    }

    #[tokio::test]
    async fn missing_credentials_fail_without_network() {
        let recommender = SpotifyRecommender::new(Client::new(), &test_config("US"));
        let err = recommender.recommend(MoodCategory::Sad).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotConfigured("spotify")));
    }
}

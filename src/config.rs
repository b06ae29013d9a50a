//! Process configuration, read once from the environment at startup.
//!
//! `.env` is loaded by `main` through `dotenvy` before `Config::from_env`
//! runs, so every value here may come from either source.

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_MARKET: &str = "US";
pub const DEFAULT_SENTIMENT_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";
pub const DEFAULT_HF_INFERENCE_URL: &str = "https://router.huggingface.co/hf-inference/models";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:5500",
    "http://127.0.0.1:5500",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    /// `(client_id, client_secret)`; `None` unless both are set.
    pub credentials: Option<(String, String)>,
    pub market: String,
    pub api_url: String,
    pub token_url: String,
}

#[derive(Debug, Clone)]
pub struct SentimentConfig {
    pub api_token: Option<String>,
    pub model: String,
    pub inference_url: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub openai: OpenAiConfig,
    pub spotify: SpotifyConfig,
    pub sentiment: SentimentConfig,
    pub upstream_timeout: Duration,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let or = |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());

        let port: u16 = match get("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                name: "PORT",
                value: v.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs: u64 = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                name: "UPSTREAM_TIMEOUT_SECS",
                value: v.clone(),
            })?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        let credentials = match (get("SPOTIFY_CLIENT_ID"), get("SPOTIFY_CLIENT_SECRET")) {
            (Some(id), Some(secret)) => Some((id, secret)),
            _ => None,
        };

        let cors_origins = match get("CORS_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            port,
            openai: OpenAiConfig {
                api_key: get("OPENAI_API_KEY"),
                model: or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
                base_url: or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            },
            spotify: SpotifyConfig {
                credentials,
                market: or("SPOTIFY_MARKET", DEFAULT_SPOTIFY_MARKET),
                api_url: or("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL),
                token_url: or("SPOTIFY_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL),
            },
            sentiment: SentimentConfig {
                api_token: get("HF_API_TOKEN"),
                model: or("SENTIMENT_MODEL", DEFAULT_SENTIMENT_MODEL),
                inference_url: or("HF_INFERENCE_URL", DEFAULT_HF_INFERENCE_URL),
            },
            upstream_timeout: Duration::from_secs(timeout_secs),
            cors_origins,
        })
    }
}

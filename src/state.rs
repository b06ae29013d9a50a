// Application state: long-lived, read-only collaborator handles shared by
// every request.

use std::sync::Arc;

use reqwest::Client;

use crate::config::Config;
use crate::services::{
    HuggingFaceClassifier, MessageGenerator, MusicRecommender, OpenAiClient, SentimentClassifier,
    SpotifyRecommender, SupportResponseGenerator,
};

/// Central application state. Clone-friendly; every field is an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn SentimentClassifier>,
    pub music: Arc<dyn MusicRecommender>,
    pub messages: Arc<dyn MessageGenerator>,
    pub support: Arc<dyn SupportResponseGenerator>,
}

impl AppState {
    /// Build the production collaborators from config. One HTTP client is
    /// shared across all of them.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .pool_max_idle_per_host(10)
            .timeout(config.upstream_timeout)
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()?;

        let openai = Arc::new(OpenAiClient::new(client.clone(), &config.openai));

        tracing::info!(
            sentiment_model = %config.sentiment.model,
            openai_model = %config.openai.model,
            spotify = config.spotify.credentials.is_some(),
            timeout_secs = config.upstream_timeout.as_secs(),
            "AppState initialised"
        );

        Ok(Self::from_services(
            Arc::new(HuggingFaceClassifier::new(client.clone(), &config.sentiment)),
            Arc::new(SpotifyRecommender::new(client, &config.spotify)),
            openai.clone(),
            openai,
        ))
    }

    /// Assemble state from arbitrary collaborator implementations.
    pub fn from_services(
        classifier: Arc<dyn SentimentClassifier>,
        music: Arc<dyn MusicRecommender>,
        messages: Arc<dyn MessageGenerator>,
        support: Arc<dyn SupportResponseGenerator>,
    ) -> Self {
        Self {
            classifier,
            music,
            messages,
            support,
        }
    }
}

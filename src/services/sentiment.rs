//! Sentiment classification through the Hugging Face inference API.
//!
//! The hosted SST-2 model answers with a list of `{label, score}` pairs,
//! sometimes nested one level deeper when a batch of one is echoed back.
//! The top-scoring label decides the mood.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{ensure_success, SentimentClassifier, ServiceError};
use crate::config::SentimentConfig;
use crate::models::Sentiment;

const SERVICE: &str = "sentiment";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub(crate) struct LabelScore {
    pub label: String,
    pub score: f32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl InferenceResponse {
    /// Highest-scoring label across the response.
    pub(crate) fn top(self) -> Option<LabelScore> {
        let scores = match self {
            InferenceResponse::Nested(batches) => batches.into_iter().flatten().collect(),
            InferenceResponse::Flat(scores) => scores,
        };
        scores.into_iter().max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

pub struct HuggingFaceClassifier {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl HuggingFaceClassifier {
    pub fn new(client: Client, config: &SentimentConfig) -> Self {
        Self {
            client,
            endpoint: format!(
                "{}/{}",
                config.inference_url.trim_end_matches('/'),
                config.model
            ),
            api_token: config.api_token.clone(),
        }
    }
}

#[async_trait]
impl SentimentClassifier for HuggingFaceClassifier {
    async fn classify(&self, text: &str) -> Result<Sentiment, ServiceError> {
        let mut req = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "inputs": text }));
        if let Some(token) = &self.api_token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(ServiceError::http(SERVICE))?;
        let body: InferenceResponse = ensure_success(SERVICE, resp)
            .await?
            .json()
            .await
            .map_err(ServiceError::decode(SERVICE))?;

        let top = body.top().ok_or(ServiceError::EmptyResponse(SERVICE))?;
        tracing::debug!(label = %top.label, score = top.score, "sentiment: classified entry");
        Ok(Sentiment::from_label(&top.label, top.score))
    }
}

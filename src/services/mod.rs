// ---------------------------------------------------------------------------
// services/ -- external collaborators behind the mood-analysis pipeline
// ---------------------------------------------------------------------------
//
// Each collaborator is a trait so the handler can be exercised with fakes.
// Every call returns `Result`; choosing a fallback is the caller's job.

pub mod message;
pub mod openai;
pub mod sentiment;
pub mod spotify;
pub mod support;

use async_trait::async_trait;

use crate::models::{MoodCategory, PlaylistRef, Sentiment, SupportPayload};

pub use openai::OpenAiClient;
pub use sentiment::HuggingFaceClassifier;
pub use spotify::SpotifyRecommender;
pub use support::SupportParseError;

/// Maximum number of upstream error-body bytes kept in an error message.
const ERROR_BODY_LIMIT: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("{service} response could not be decoded: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0} returned an empty response")]
    EmptyResponse(&'static str),

    #[error("malformed support payload: {0}")]
    MalformedSupport(#[from] SupportParseError),
}

impl ServiceError {
    pub(crate) fn http(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| ServiceError::Http { service, source }
    }

    pub(crate) fn decode(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| ServiceError::Decode { service, source }
    }
}

/// Pass successful responses through; turn anything else into
/// `ServiceError::Status` with a truncated copy of the body.
pub(crate) async fn ensure_success(
    service: &'static str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ServiceError::Status {
        service,
        status,
        body: truncate_on_char_boundary(&body, ERROR_BODY_LIMIT).to_string(),
    })
}

pub(crate) fn truncate_on_char_boundary(s: &str, limit: usize) -> &str {
    let end = s
        .char_indices()
        .take_while(|(i, _)| *i < limit)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    &s[..end]
}

// ── Collaborator contracts ──────────────────────────────────────────────────

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Sentiment, ServiceError>;
}

#[async_trait]
pub trait MusicRecommender: Send + Sync {
    async fn recommend(&self, mood: MoodCategory) -> Result<Vec<PlaylistRef>, ServiceError>;
}

#[async_trait]
pub trait MessageGenerator: Send + Sync {
    async fn generate(&self, mood: MoodCategory) -> Result<String, ServiceError>;
}

#[async_trait]
pub trait SupportResponseGenerator: Send + Sync {
    async fn generate(&self, text: &str, mood: MoodCategory)
        -> Result<SupportPayload, ServiceError>;
}

//! Structured supportive response: a short validation line plus at least two
//! coping strategies, generated by the chat model as a JSON object.
//!
//! The model's output is checked against the expected shape before it is
//! accepted. Anything else is a `SupportParseError`; the handler decides what
//! to return in its place.

use async_trait::async_trait;
use serde_json::Value;

use super::openai::{ChatMessage, CompletionOptions, OpenAiClient};
use super::{ServiceError, SupportResponseGenerator};
use crate::models::{MoodCategory, SupportPayload};

const TEMPERATURE: f32 = 0.7;
pub const MIN_COPING_STRATEGIES: usize = 2;

#[derive(Debug, thiserror::Error)]
pub enum SupportParseError {
    #[error("output is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("output is not a JSON object")]
    NotAnObject,

    #[error("missing required key '{0}'")]
    MissingField(&'static str),

    #[error("key '{0}' has the wrong type")]
    WrongType(&'static str),

    #[error("expected at least two coping strategies, got {0}")]
    TooFewStrategies(usize),
}

pub(crate) fn support_prompt(text: &str, mood: MoodCategory) -> String {
    format!(
        "The user has journaled the following:\n\
         \n\
         {text}\n\
         \n\
         The user seems to be feeling {mood}. Provide a supportive response in JSON format with two keys: \n\
         'validation' (a short empathic message acknowledging their feelings) and \n\
         'coping_strategies' (a JSON array of at least two actionable coping suggestions).\n"
    )
}

/// Drop a surrounding markdown code fence (```json ... ```), if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Skip the info string ("json") on the opening line.
    match body.split_once('\n') {
        Some((_, inner)) => inner.trim(),
        None => body.trim(),
    }
}

/// Validate generated text against the two-key support shape.
pub fn parse_support_payload(raw: &str) -> Result<SupportPayload, SupportParseError> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))?;
    let obj = value.as_object().ok_or(SupportParseError::NotAnObject)?;

    let validation = obj
        .get("validation")
        .ok_or(SupportParseError::MissingField("validation"))?
        .as_str()
        .filter(|v| !v.trim().is_empty())
        .ok_or(SupportParseError::WrongType("validation"))?;

    let strategies = obj
        .get("coping_strategies")
        .ok_or(SupportParseError::MissingField("coping_strategies"))?
        .as_array()
        .ok_or(SupportParseError::WrongType("coping_strategies"))?
        .iter()
        .map(|s| s.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .ok_or(SupportParseError::WrongType("coping_strategies"))?;

    if strategies.len() < MIN_COPING_STRATEGIES {
        return Err(SupportParseError::TooFewStrategies(strategies.len()));
    }

    Ok(SupportPayload {
        validation: validation.to_string(),
        coping_strategies: strategies,
    })
}

#[async_trait]
impl SupportResponseGenerator for OpenAiClient {
    async fn generate(
        &self,
        text: &str,
        mood: MoodCategory,
    ) -> Result<SupportPayload, ServiceError> {
        let messages = [ChatMessage::user(support_prompt(text, mood))];
        let options = CompletionOptions {
            max_tokens: None,
            temperature: Some(TEMPERATURE),
        };
        let raw = self.complete(&messages, options).await?;
        Ok(parse_support_payload(&raw)?)
    }
}

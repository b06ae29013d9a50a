//! Minimal OpenAI chat-completions client shared by the message and support
//! generators.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ensure_success, ServiceError};
use crate::config::OpenAiConfig;

const SERVICE: &str = "openai";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system", content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user", content: content.into() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, if any.
    pub(crate) fn first_content(self) -> Option<String> {
        self.choices.into_iter().next()?.message.content
    }
}

pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

impl OpenAiClient {
    pub fn new(client: Client, config: &OpenAiConfig) -> Self {
        if config.api_key.is_none() {
            tracing::warn!("openai: OPENAI_API_KEY not set, generated messages will use fallbacks");
        }
        Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
        }
    }

    /// Authenticated chat-completions POST, ready to send.
    pub(crate) fn chat_request(
        &self,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<reqwest::RequestBuilder, ServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ServiceError::NotConfigured(SERVICE))?;

        let body = ChatRequest {
            model: &self.model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        Ok(self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body))
    }

    /// Run one chat completion and return the raw text of the first choice.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<String, ServiceError> {
        let resp = self
            .chat_request(messages, options)?
            .send()
            .await
            .map_err(ServiceError::http(SERVICE))?;
        let parsed: ChatResponse = ensure_success(SERVICE, resp)
            .await?
            .json()
            .await
            .map_err(ServiceError::decode(SERVICE))?;

        parsed
            .first_content()
            .ok_or(ServiceError::EmptyResponse(SERVICE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_omits_unset_options() {
        let messages = [ChatMessage::user("hi")];
        let body = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: &messages,
            max_tokens: None,
            temperature: Some(0.7),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("max_tokens").is_none());
        assert_eq!(value["messages"][0], json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn first_choice_content_is_used() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "first"}},
                {"message": {"role": "assistant", "content": "second"}}
            ]
        }))
        .unwrap();
        assert_eq!(resp.first_content().as_deref(), Some("first"));
    }

    #[test]
    fn no_choices_means_no_content() {
        let resp: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(resp.first_content().is_none());
    }

    #[test]
    fn chat_request_posts_to_completions_endpoint() {
        let cfg = OpenAiConfig {
            api_key: Some("sk-test".to_string()),
            model: "gpt-3.5-turbo".to_string(),
            base_url: "http://127.0.0.1:9/v1/".to_string(),
        };
        let client = OpenAiClient::new(Client::new(), &cfg);
        let request = client
            .chat_request(&[ChatMessage::user("hi")], CompletionOptions::default())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().path(), "/v1/chat/completions");
        assert_eq!(request.headers()["authorization"], "Bearer sk-test");
        let body: serde_json::Value =
            serde_json::from_slice(request.body().unwrap().as_bytes().unwrap()).unwrap();
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert!(body.get("temperature").is_none());
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let cfg = OpenAiConfig {
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
        };
        let client = OpenAiClient::new(Client::new(), &cfg);
        let err = client
            .complete(&[ChatMessage::user("hi")], CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotConfigured("openai")));
    }
}

use async_trait::async_trait;

use super::openai::{ChatMessage, CompletionOptions, OpenAiClient};
use super::{MessageGenerator, ServiceError};
use crate::models::MoodCategory;

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";
const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.7;

pub(crate) fn joke_prompt(mood: MoodCategory) -> String {
    format!(
        "Provide a simple joke for someone feeling {mood}. In your return response, \
         just say \"here is a Joke:\" and then tells the joke"
    )
}

fn joke_messages(mood: MoodCategory) -> [ChatMessage; 2] {
    [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(joke_prompt(mood))]
}

fn joke_options() -> CompletionOptions {
    CompletionOptions {
        max_tokens: Some(MAX_TOKENS),
        temperature: Some(TEMPERATURE),
    }
}

#[async_trait]
impl MessageGenerator for OpenAiClient {
    async fn generate(&self, mood: MoodCategory) -> Result<String, ServiceError> {
        let text = self.complete(&joke_messages(mood), joke_options()).await?;
        Ok(text.trim().to_string())
    }
}

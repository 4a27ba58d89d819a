use std::sync::Arc;

use async_openai::types::{
    ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs, ResponseFormat,
    ResponseFormatJsonSchema,
};
use async_trait::async_trait;
use common::error::AppError;
use serde::Deserialize;

use crate::{
    pipeline::SentimentClassifier,
    utils::llm_instructions::{get_sentiment_schema, SENTIMENT_SYSTEM_MESSAGE},
};

/// Classifies chat messages with a structured-output chat completion.
pub struct LlmSentimentClassifier {
    openai_client: Arc<async_openai::Client<async_openai::config::OpenAIConfig>>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct SentimentVerdict {
    is_negative: bool,
}

impl LlmSentimentClassifier {
    pub fn new(
        openai_client: Arc<async_openai::Client<async_openai::config::OpenAIConfig>>,
        model: &str,
    ) -> Self {
        Self {
            openai_client,
            model: model.to_string(),
        }
    }

    fn prepare_request(&self, message: &str) -> Result<CreateChatCompletionRequest, AppError> {
        let response_format = ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                description: Some("Sentiment verdict for a single chat message".into()),
                name: "sentiment_verdict".into(),
                schema: Some(get_sentiment_schema()),
                strict: Some(true),
            },
        };

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessage::from(SENTIMENT_SYSTEM_MESSAGE).into(),
                ChatCompletionRequestUserMessage::from(message).into(),
            ])
            .response_format(response_format)
            .build()?;

        Ok(request)
    }

    fn parse_verdict(content: &str) -> Result<bool, AppError> {
        serde_json::from_str::<SentimentVerdict>(content)
            .map(|verdict| verdict.is_negative)
            .map_err(|e| {
                AppError::Classification(format!("Failed to parse sentiment verdict: {e}"))
            })
    }
}

#[async_trait]
impl SentimentClassifier for LlmSentimentClassifier {
    async fn is_negative(&self, message: &str) -> Result<bool, AppError> {
        let request = self.prepare_request(message)?;
        let response = self.openai_client.chat().create(request).await?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
            .ok_or(AppError::Classification(
                "No content found in sentiment response".into(),
            ))?;

        Self::parse_verdict(content)
    }
}

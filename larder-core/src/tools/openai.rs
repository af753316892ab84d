//! Completion provider for OpenAI-compatible chat APIs (OpenRouter by default).

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;

use super::config::CompletionConfig;
use super::types::{ChatMessage, ChatRequest, Role};
use super::{CompletionProvider, ToolFailure};

/// Chat completion through async-openai.
pub struct OpenAiCompletion {
    client: Client<OpenAIConfig>,
    model: String,
}

impl std::fmt::Debug for OpenAiCompletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompletion")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiCompletion {
    pub fn new(config: CompletionConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(&config.base_url);

        // Retries belong to ToolPolicy; the client makes exactly one request
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        Self {
            client: Client::with_config(openai_config).with_backoff(no_retry),
            model: config.model,
        }
    }

    fn to_openai_message(msg: &ChatMessage) -> Result<ChatCompletionRequestMessage, ToolFailure> {
        let built = match msg.role {
            Role::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(msg.content.clone())
                .build()
                .map(Into::into),
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(msg.content.clone())
                .build()
                .map(Into::into),
        };
        built.map_err(|e| ToolFailure::Rejected {
            status: None,
            message: format!("Failed to build message: {}", e),
        })
    }
}

/// Map async-openai errors onto the tool failure taxonomy.
///
/// Server errors and rate limits arrive as `ApiError` and count as rejections.
fn classify(error: OpenAIError) -> ToolFailure {
    match error {
        OpenAIError::Reqwest(e) => {
            if let Some(status) = e.status() {
                ToolFailure::Rejected {
                    status: Some(status.as_u16()),
                    message: e.to_string(),
                }
            } else {
                ToolFailure::Unreachable(e.to_string())
            }
        }
        OpenAIError::ApiError(api) => ToolFailure::Rejected {
            status: None,
            message: api.message,
        },
        other @ OpenAIError::JSONDeserialize(..) => {
            ToolFailure::MalformedResponse(other.to_string())
        }
        other => ToolFailure::Rejected {
            status: None,
            message: other.to_string(),
        },
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletion {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ToolFailure> {
        let messages = request
            .messages
            .iter()
            .map(Self::to_openai_message)
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model).messages(messages);

        if let Some(max_tokens) = request.max_tokens {
            builder.max_completion_tokens(max_tokens);
        }
        if let Some(temperature) = request.temperature {
            builder.temperature(temperature);
        }
        if request.json_response {
            builder.response_format(ResponseFormat::JsonObject);
        }

        let openai_request = builder.build().map_err(|e| ToolFailure::Rejected {
            status: None,
            message: e.to_string(),
        })?;

        let response = self
            .client
            .chat()
            .create(openai_request)
            .await
            .map_err(classify)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ToolFailure::MalformedResponse("No content in completion".to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

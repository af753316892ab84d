//! External capabilities used by the pipeline.
//!
//! Two capabilities exist: chat completion (drafting the recipe) and
//! nutrition lookup. Both are trait objects so production adapters and
//! fakes are interchangeable, and both are called through [`ToolClient`],
//! which applies the timeout and retry policy.
//!
//! # Configuration
//!
//! - `OPENROUTER_API_KEY`, `LARDER_AI_MODEL`, `LARDER_AI_BASE_URL`
//! - `CALORIENINJAS_API_KEY`, `LARDER_NUTRITION_BASE_URL`
//! - `LARDER_TOOL_TIMEOUT_SECS`, `LARDER_TOOL_MAX_RETRIES`

mod calorie_ninjas;
mod config;
mod fake;
mod openai;
mod policy;
mod types;

pub use calorie_ninjas::CalorieNinjasLookup;
pub use config::{
    CompletionConfig, ConfigError, NutritionConfig, DEFAULT_AI_BASE_URL, DEFAULT_AI_MODEL,
    DEFAULT_NUTRITION_BASE_URL,
};
pub use fake::{FakeCompletion, FakeNutrition};
pub use openai::OpenAiCompletion;
pub use policy::{invoke_with_policy, ToolPolicy, MAX_RETRIES_CEILING};
pub use types::{ChatMessage, ChatRequest, Role};

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::NutritionFacts;

/// Normalized failure of a tool invocation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolFailure {
    /// Network error or timeout. The only retryable kind.
    #[error("Tool unreachable: {0}")]
    Unreachable(String),

    /// The provider answered with an error (quota, auth, bad request).
    #[error("Tool rejected the request ({}): {message}", format_status(.status))]
    Rejected {
        status: Option<u16>,
        message: String,
    },

    /// The provider answered but the result does not have the expected shape.
    #[error("Malformed tool response: {0}")]
    MalformedResponse(String),
}

fn format_status(status: &Option<u16>) -> String {
    status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "no status".to_string())
}

impl ToolFailure {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ToolFailure::Unreachable(_))
    }
}

/// Chat completion capability.
///
/// Implementations should be stateless and thread-safe. The provider is
/// responsible for making the call and returning the model's text.
#[async_trait]
pub trait CompletionProvider: Send + Sync + fmt::Debug {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ToolFailure>;

    /// Provider name (e.g., "openai", "fake").
    fn provider_name(&self) -> &'static str;

    fn model_name(&self) -> &str;
}

/// Nutrition lookup capability.
#[async_trait]
pub trait NutritionProvider: Send + Sync + fmt::Debug {
    /// Look up summed nutrition facts for a flattened ingredient list such
    /// as "2 cups rice, 1 onion".
    async fn lookup(&self, query: &str) -> Result<NutritionFacts, ToolFailure>;

    fn provider_name(&self) -> &'static str;
}

/// Operation name for nutrition lookups in logs.
pub const OP_NUTRITION_LOOKUP: &str = "nutrition_lookup";

/// The configured capabilities, injected into the pipeline at construction.
#[derive(Debug, Clone)]
pub struct ToolClient {
    completion: Arc<dyn CompletionProvider>,
    nutrition: Arc<dyn NutritionProvider>,
    policy: ToolPolicy,
}

impl ToolClient {
    pub fn new(
        completion: Arc<dyn CompletionProvider>,
        nutrition: Arc<dyn NutritionProvider>,
        policy: ToolPolicy,
    ) -> Self {
        Self {
            completion,
            nutrition,
            policy,
        }
    }

    /// Production client from environment configuration.
    pub fn from_env() -> Result<Self, ConfigError> {
        let completion = OpenAiCompletion::new(CompletionConfig::from_env()?);
        let nutrition = CalorieNinjasLookup::new(NutritionConfig::from_env()?);
        Ok(Self::new(
            Arc::new(completion),
            Arc::new(nutrition),
            ToolPolicy::from_env()?,
        ))
    }

    pub fn policy(&self) -> &ToolPolicy {
        &self.policy
    }

    /// Invoke the completion capability under the policy.
    pub async fn complete(
        &self,
        operation: &str,
        request: &ChatRequest,
    ) -> Result<String, ToolFailure> {
        tracing::debug!(
            operation,
            provider = self.completion.provider_name(),
            model = self.completion.model_name(),
            "Invoking completion"
        );
        invoke_with_policy(operation, &self.policy, |_| self.completion.complete(request)).await
    }

    /// Invoke the nutrition lookup capability under the policy.
    pub async fn lookup_nutrition(
        &self,
        operation: &str,
        query: &str,
    ) -> Result<NutritionFacts, ToolFailure> {
        tracing::debug!(
            operation,
            provider = self.nutrition.provider_name(),
            "Invoking nutrition lookup"
        );
        invoke_with_policy(operation, &self.policy, |_| self.nutrition.lookup(query)).await
    }
}

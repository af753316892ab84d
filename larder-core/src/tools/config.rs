//! Tool configuration from environment variables.

use std::env;
use thiserror::Error;

/// Default OpenRouter base URL.
pub const DEFAULT_AI_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model to use.
pub const DEFAULT_AI_MODEL: &str = "openai/gpt-4o-mini";

/// Default nutrition API base URL.
pub const DEFAULT_NUTRITION_BASE_URL: &str = "https://api.calorieninjas.com/v1";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Completion provider configuration.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_key: String,
    /// Model name (e.g., "openai/gpt-4o-mini", "google/gemini-2.5-pro").
    pub model: String,
    pub base_url: String,
}

/// Nutrition lookup configuration.
#[derive(Debug, Clone)]
pub struct NutritionConfig {
    pub api_key: String,
    pub base_url: String,
}

impl CompletionConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `OPENROUTER_API_KEY`: API key for the OpenAI-compatible endpoint
    ///
    /// Optional:
    /// - `LARDER_AI_MODEL`: Model name (default: "openai/gpt-4o-mini")
    /// - `LARDER_AI_BASE_URL`: API base URL (default: "https://openrouter.ai/api/v1")
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = required("OPENROUTER_API_KEY")?;
        let model = env::var("LARDER_AI_MODEL").unwrap_or_else(|_| DEFAULT_AI_MODEL.to_string());
        let base_url =
            env::var("LARDER_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_AI_BASE_URL.to_string());

        Ok(Self {
            api_key,
            model,
            base_url,
        })
    }
}

impl NutritionConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `CALORIENINJAS_API_KEY`
    ///
    /// Optional:
    /// - `LARDER_NUTRITION_BASE_URL` (default: "https://api.calorieninjas.com/v1")
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = required("CALORIENINJAS_API_KEY")?;
        let base_url = env::var("LARDER_NUTRITION_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_NUTRITION_BASE_URL.to_string());

        Ok(Self { api_key, base_url })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvVar(name.to_string())),
    }
}

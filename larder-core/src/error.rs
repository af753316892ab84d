use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal error that stops the pipeline before a document is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Recipe generation failed: {0}")]
    GenerationFailed(String),

    #[error("Internal consistency fault: {0}")]
    InternalConsistencyFault(String),

    #[error("Pipeline cancelled: {0}")]
    Cancelled(String),
}

/// Serializable tag for a [`PipelineError`], exposed to hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    GenerationFailed,
    InternalConsistencyFault,
    Cancelled,
}

impl PipelineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::GenerationFailed(_) => FailureKind::GenerationFailed,
            PipelineError::InternalConsistencyFault(_) => FailureKind::InternalConsistencyFault,
            PipelineError::Cancelled(_) => FailureKind::Cancelled,
        }
    }

    pub(crate) fn consistency(message: impl Into<String>) -> Self {
        PipelineError::InternalConsistencyFault(message.into())
    }
}

/// A request that fails host-side validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("Available ingredients cannot be empty")]
    EmptyIngredients,

    #[error("Servings must be between {min} and {max}, got {actual}")]
    ServingsOutOfRange { min: u32, max: u32, actual: u32 },

    #[error("Cooking time must be between {min} and {max} minutes, got {actual}")]
    CookingTimeOutOfRange { min: u32, max: u32, actual: u32 },

    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

//! Pipeline stage trait and supporting types.

use async_trait::async_trait;

use crate::error::PipelineError;
use crate::pipeline::state::{PipelinePhase, WorkflowState};

/// Metadata about a pipeline stage.
#[derive(Debug, Clone)]
pub struct StageMetadata {
    /// Unique identifier for this stage (e.g., "recipe_concept", "shopping")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Phase the state must be in before this stage runs
    pub requires: PipelinePhase,
    /// Phase the state moves to once this stage succeeds
    pub produces: PipelinePhase,
}

/// One ordered step that reads and extends the workflow state.
///
/// Degradations are recorded with [`WorkflowState::warn`] and return `Ok`.
/// An `Err` aborts the run.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Return metadata about this stage.
    fn metadata(&self) -> StageMetadata;

    /// Execute the stage.
    async fn execute(&self, state: &mut WorkflowState) -> Result<(), PipelineError>;
}

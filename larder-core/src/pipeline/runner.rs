//! Pipeline runner: owns the workflow state and drives the stages.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{info_span, Instrument};

use crate::error::{FailureKind, PipelineError};
use crate::pipeline::stage::Stage;
use crate::pipeline::stages::{RecipeConceptStage, ShoppingStage, StructuringStage};
use crate::pipeline::state::{PipelinePhase, WorkflowState};
use crate::tools::ToolClient;
use crate::types::{RecipeDocument, RecipeRequest};

/// Outcome of one pipeline run.
///
/// A success with empty `warnings` is a full success; non-empty warnings
/// mean some data (e.g. nutrition) is degraded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineResult {
    Success {
        document: Box<RecipeDocument>,
        warnings: Vec<String>,
    },
    Failure {
        kind: FailureKind,
        message: String,
        warnings: Vec<String>,
    },
}

impl PipelineResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineResult::Success { .. })
    }

    pub fn document(&self) -> Option<&RecipeDocument> {
        match self {
            PipelineResult::Success { document, .. } => Some(document.as_ref()),
            PipelineResult::Failure { .. } => None,
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            PipelineResult::Success { warnings, .. } | PipelineResult::Failure { warnings, .. } => {
                warnings
            }
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            PipelineResult::Success { .. } => None,
            PipelineResult::Failure { kind, .. } => Some(*kind),
        }
    }
}

/// Runs the stages in order over one [`WorkflowState`] per request.
///
/// The runner holds no per-request data and can be shared across tasks.
pub struct PipelineRunner {
    stages: Vec<Box<dyn Stage>>,
}

impl PipelineRunner {
    /// The standard concept → shopping → structuring pipeline.
    pub fn new(tools: ToolClient) -> Self {
        Self::with_stages(vec![
            Box::new(RecipeConceptStage::new(tools)),
            Box::new(ShoppingStage),
            Box::new(StructuringStage),
        ])
    }

    /// A runner over a custom stage list.
    pub fn with_stages(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Names of the stages in run order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.metadata().name).collect()
    }

    /// Run the pipeline to completion.
    pub async fn run(&self, request: RecipeRequest) -> PipelineResult {
        self.run_until(request, std::future::pending()).await
    }

    /// Run the pipeline until it finishes or `cancel` resolves.
    ///
    /// On cancellation the in-flight stage is dropped, no later stage runs
    /// and the result is a `Cancelled` failure.
    pub async fn run_until<C>(&self, request: RecipeRequest, cancel: C) -> PipelineResult
    where
        C: Future<Output = ()>,
    {
        let mut state = WorkflowState::new(request);

        let outcome = tokio::select! {
            result = self.drive(&mut state) => result,
            () = cancel => Err(PipelineError::Cancelled(
                "run cancelled by caller".to_string(),
            )),
        };

        // A cancelled drive never got to record its own terminal phase
        if let Err(error) = &outcome {
            if !state.phase().is_terminal() {
                tracing::warn!(phase = ?state.phase(), "{}", error);
                state.advance(PipelinePhase::Aborted);
            }
        }
        finish(state, outcome)
    }

    /// Run every stage over `state`, checking each stage's required phase.
    ///
    /// Leaves the state in `Done` on success and `Aborted` on failure.
    pub async fn drive(&self, state: &mut WorkflowState) -> Result<(), PipelineError> {
        let result = self.run_stages(state).await;
        match &result {
            Ok(()) => state.advance(PipelinePhase::Done),
            Err(error) => {
                tracing::warn!(kind = ?error.kind(), "Pipeline aborted: {}", error);
                state.advance(PipelinePhase::Aborted);
            }
        }
        result
    }

    async fn run_stages(&self, state: &mut WorkflowState) -> Result<(), PipelineError> {
        for stage in &self.stages {
            let meta = stage.metadata();

            if state.phase() != meta.requires {
                return Err(PipelineError::consistency(format!(
                    "Stage {} requires phase {:?} but state is {:?}",
                    meta.name,
                    meta.requires,
                    state.phase()
                )));
            }

            stage
                .execute(state)
                .instrument(info_span!("pipeline_stage", stage = meta.name))
                .await?;

            state.advance(meta.produces);
        }
        Ok(())
    }
}

fn finish(state: WorkflowState, outcome: Result<(), PipelineError>) -> PipelineResult {
    let (document, warnings) = state.into_parts();

    let error = match (outcome, document) {
        (Ok(()), Some(document)) => {
            tracing::info!(
                recipe = %document.name,
                warnings = warnings.len(),
                "Pipeline finished"
            );
            return PipelineResult::Success {
                document: Box::new(document),
                warnings,
            };
        }
        (Ok(()), None) => PipelineError::consistency("Pipeline finished without a document"),
        (Err(error), _) => error,
    };

    PipelineResult::Failure {
        kind: error.kind(),
        message: error.to_string(),
        warnings,
    }
}

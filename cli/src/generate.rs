use std::sync::Arc;

use anyhow::{bail, Context, Result};
use larder_core::tools::{FakeCompletion, FakeNutrition, ToolClient, ToolPolicy};
use larder_core::{PipelineResult, PipelineRunner, RecipeRequest};

/// Tools for a run: live providers from the environment, or the scripted
/// fakes when `offline` is set.
pub fn tool_client(offline: bool) -> Result<ToolClient> {
    if offline {
        tracing::info!("Offline mode: using scripted providers");
        return Ok(ToolClient::new(
            Arc::new(FakeCompletion::with_sample_recipe()),
            Arc::new(FakeNutrition::default()),
            ToolPolicy::from_env()?,
        ));
    }
    ToolClient::from_env().context("Failed to configure tools (use --offline to run without API keys)")
}

/// Run the full pipeline and print the result as JSON.
pub async fn generate(request: RecipeRequest, offline: bool) -> Result<()> {
    request.validate()?;

    let runner = PipelineRunner::new(tool_client(offline)?);
    let result = runner.run(request).await;

    println!("{}", serde_json::to_string_pretty(&result)?);

    match result {
        PipelineResult::Success { warnings, .. } => {
            for warning in &warnings {
                tracing::warn!("{}", warning);
            }
            Ok(())
        }
        PipelineResult::Failure { kind, message, .. } => {
            bail!("Recipe pipeline failed ({:?}): {}", kind, message)
        }
    }
}

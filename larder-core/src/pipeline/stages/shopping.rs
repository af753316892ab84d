//! Shopping stage - reconciles the draft's ingredients against what the
//! user already has.

use async_trait::async_trait;

use crate::error::PipelineError;
use crate::pipeline::{PipelinePhase, Stage, StageMetadata, WorkflowState};
use crate::reconcile::reconcile;

/// Stage that splits required ingredients into on-hand items and a
/// categorized shopping list. Pure; never fails on external grounds.
pub struct ShoppingStage;

impl ShoppingStage {
    /// Stage name constant.
    pub const NAME: &'static str = "shopping";
}

#[async_trait]
impl Stage for ShoppingStage {
    fn metadata(&self) -> StageMetadata {
        StageMetadata {
            name: Self::NAME,
            description: "Reconcile required ingredients with available ones",
            requires: PipelinePhase::Planned,
            produces: PipelinePhase::Shopped,
        }
    }

    async fn execute(&self, state: &mut WorkflowState) -> Result<(), PipelineError> {
        let draft = state
            .draft_recipe()
            .ok_or_else(|| PipelineError::consistency("draft_recipe missing before shopping"))?;

        let reconciliation = reconcile(&draft.ingredients, &state.request().available_ingredients);
        let summary = reconciliation.summary();
        tracing::info!(
            needed = summary.total_items_needed,
            to_buy = summary.items_to_buy,
            in_stock = summary.items_in_stock,
            "Reconciled ingredients"
        );

        state.set_reconciliation(reconciliation.available_items, reconciliation.shopping_list)
    }
}

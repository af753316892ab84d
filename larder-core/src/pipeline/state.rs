//! Per-request workflow state shared by the stages.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::types::{DraftRecipe, Nutrition, RecipeDocument, RecipeRequest, ShoppingList};

/// Where a workflow is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePhase {
    Started,
    Planned,
    Shopped,
    Structured,
    Done,
    /// Terminal; set on a fatal error or cancellation
    Aborted,
}

impl PipelinePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelinePhase::Done | PipelinePhase::Aborted)
    }
}

/// Accumulator for one pipeline run.
///
/// The request is fixed at construction. Every other field is written at
/// most once; a second write is an [`PipelineError::InternalConsistencyFault`].
/// Warnings can only be appended.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    request: RecipeRequest,
    draft_recipe: Option<DraftRecipe>,
    nutrition: Option<Nutrition>,
    shopping_list: Option<ShoppingList>,
    available_items: Option<Vec<String>>,
    document: Option<RecipeDocument>,
    warnings: Vec<String>,
    phase: PipelinePhase,
}

fn write_once<T>(slot: &mut Option<T>, value: T, field: &str) -> Result<(), PipelineError> {
    if slot.is_some() {
        return Err(PipelineError::consistency(format!("{} was already set", field)));
    }
    *slot = Some(value);
    Ok(())
}

impl WorkflowState {
    pub fn new(request: RecipeRequest) -> Self {
        Self {
            request,
            draft_recipe: None,
            nutrition: None,
            shopping_list: None,
            available_items: None,
            document: None,
            warnings: Vec::new(),
            phase: PipelinePhase::Started,
        }
    }

    pub fn request(&self) -> &RecipeRequest {
        &self.request
    }

    pub fn draft_recipe(&self) -> Option<&DraftRecipe> {
        self.draft_recipe.as_ref()
    }

    pub fn nutrition(&self) -> Option<&Nutrition> {
        self.nutrition.as_ref()
    }

    pub fn shopping_list(&self) -> Option<&ShoppingList> {
        self.shopping_list.as_ref()
    }

    /// Items already on hand; empty until the shopping stage has run.
    pub fn available_items(&self) -> &[String] {
        self.available_items.as_deref().unwrap_or_default()
    }

    pub fn document(&self) -> Option<&RecipeDocument> {
        self.document.as_ref()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn phase(&self) -> PipelinePhase {
        self.phase
    }

    pub fn set_draft_recipe(&mut self, draft: DraftRecipe) -> Result<(), PipelineError> {
        write_once(&mut self.draft_recipe, draft, "draft_recipe")
    }

    pub fn set_nutrition(&mut self, nutrition: Nutrition) -> Result<(), PipelineError> {
        write_once(&mut self.nutrition, nutrition, "nutrition")
    }

    /// Store the reconciliation outcome. Both halves are written together.
    pub fn set_reconciliation(
        &mut self,
        available_items: Vec<String>,
        shopping_list: ShoppingList,
    ) -> Result<(), PipelineError> {
        if self.available_items.is_some() || self.shopping_list.is_some() {
            return Err(PipelineError::consistency("shopping_list was already set"));
        }
        self.available_items = Some(available_items);
        self.shopping_list = Some(shopping_list);
        Ok(())
    }

    pub fn set_document(&mut self, document: RecipeDocument) -> Result<(), PipelineError> {
        write_once(&mut self.document, document, "document")
    }

    /// Record a non-fatal issue.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(phase = ?self.phase, "{}", message);
        self.warnings.push(message);
    }

    pub(crate) fn into_parts(self) -> (Option<RecipeDocument>, Vec<String>) {
        (self.document, self.warnings)
    }

    pub(crate) fn advance(&mut self, phase: PipelinePhase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "Phase transition");
        self.phase = phase;
    }
}

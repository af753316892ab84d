//! Structuring stage - merges the workflow state into the final
//! schema.org-tagged recipe document.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::PipelineError;
use crate::pipeline::{PipelinePhase, Stage, StageMetadata, WorkflowState};
use crate::types::{Nutrition, NutritionFacts, NutritionValue, RecipeDocument};

pub const SCHEMA_CONTEXT: &str = "https://schema.org";
pub const SCHEMA_TYPE: &str = "Recipe";

/// Stage that builds the [`RecipeDocument`] and stores it in the state. No I/O.
pub struct StructuringStage;

impl StructuringStage {
    /// Stage name constant.
    pub const NAME: &'static str = "structuring";
}

#[async_trait]
impl Stage for StructuringStage {
    fn metadata(&self) -> StageMetadata {
        StageMetadata {
            name: Self::NAME,
            description: "Build the final recipe document",
            requires: PipelinePhase::Shopped,
            produces: PipelinePhase::Structured,
        }
    }

    async fn execute(&self, state: &mut WorkflowState) -> Result<(), PipelineError> {
        let document = build_document(state)?;
        tracing::info!(id = %document.id, recipe = %document.name, "Structured recipe document");
        state.set_document(document)
    }
}

/// Build the recipe document from a fully populated state.
///
/// Apart from `id` and `generated_at`, the output depends only on `state`.
pub fn build_document(state: &WorkflowState) -> Result<RecipeDocument, PipelineError> {
    let draft = state
        .draft_recipe()
        .ok_or_else(|| PipelineError::consistency("draft_recipe missing before structuring"))?;
    let nutrition = state
        .nutrition()
        .ok_or_else(|| PipelineError::consistency("nutrition missing before structuring"))?;
    let shopping_list = state
        .shopping_list()
        .ok_or_else(|| PipelineError::consistency("shopping_list missing before structuring"))?;

    let request = state.request();
    let nutrition = match nutrition {
        Nutrition::Available { facts } => {
            NutritionValue::PerServing(per_serving(facts, request.servings))
        }
        Nutrition::Unavailable { .. } => NutritionValue::unavailable(),
    };

    Ok(RecipeDocument {
        context: SCHEMA_CONTEXT.to_string(),
        schema_type: SCHEMA_TYPE.to_string(),
        id: Uuid::new_v4().to_string(),
        generated_at: Utc::now().to_rfc3339(),
        name: draft.name.clone(),
        description: draft.description.clone(),
        cuisine: request.cuisine.clone(),
        difficulty: request.difficulty,
        dietary_restrictions: request.dietary_restrictions.iter().cloned().collect(),
        keywords: vec![request.cuisine.clone(), request.difficulty.to_string()],
        prep_time: iso8601_duration(draft.prep_time_minutes),
        cook_time: iso8601_duration(draft.cook_time_minutes),
        total_time: iso8601_duration(
            draft
                .prep_time_minutes
                .saturating_add(draft.cook_time_minutes),
        ),
        servings: request.servings.to_string(),
        ingredients: draft
            .ingredients
            .iter()
            .map(|ingredient| ingredient.raw_text.clone())
            .collect(),
        instructions: draft.instructions.clone(),
        nutrition,
        shopping_list: shopping_list.clone(),
        available_items: state.available_items().to_vec(),
    })
}

/// Format minutes as an ISO-8601 duration ("PT25M", "PT1H30M", "PT2H").
pub fn iso8601_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;

    match (hours, mins) {
        (0, m) => format!("PT{}M", m),
        (h, 0) => format!("PT{}H", h),
        (h, m) => format!("PT{}H{}M", h, m),
    }
}

/// Divide whole-recipe totals by servings, rounded to 2 decimals.
fn per_serving(facts: &NutritionFacts, servings: u32) -> NutritionFacts {
    let servings = f64::from(servings.max(1));
    facts
        .iter()
        .map(|(name, total)| (name.clone(), (total / servings * 100.0).round() / 100.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::ingredient_parser::parse_ingredients;
    use crate::types::{DraftRecipe, RecipeRequest, ShoppingList};

    fn shopped_state(nutrition: Nutrition) -> WorkflowState {
        let mut request = RecipeRequest::new("rice");
        request.servings = 3;
        let mut state = WorkflowState::new(request);
        state
            .set_draft_recipe(DraftRecipe {
                name: "Rice".to_string(),
                description: "Plain rice.".to_string(),
                ingredients: parse_ingredients(["1 cup rice", "2 cups water"]),
                instructions: vec!["Boil.".to_string()],
                prep_time_minutes: 5,
                cook_time_minutes: 85,
            })
            .unwrap();
        state.set_nutrition(nutrition).unwrap();
        state
            .set_reconciliation(vec!["rice".to_string()], ShoppingList::new())
            .unwrap();
        state
    }

    #[test]
    fn test_iso8601_duration() {
        assert_eq!(iso8601_duration(0), "PT0M");
        assert_eq!(iso8601_duration(25), "PT25M");
        assert_eq!(iso8601_duration(60), "PT1H");
        assert_eq!(iso8601_duration(90), "PT1H30M");
    }

    #[test]
    fn test_total_time_saturates() {
        let mut state = WorkflowState::new(RecipeRequest::new("rice"));
        state
            .set_draft_recipe(DraftRecipe {
                name: "Slow Rice".to_string(),
                description: String::new(),
                ingredients: parse_ingredients(["1 cup rice"]),
                instructions: vec!["Wait.".to_string()],
                prep_time_minutes: u32::MAX,
                cook_time_minutes: u32::MAX,
            })
            .unwrap();
        state
            .set_nutrition(Nutrition::Unavailable {
                reason: "down".to_string(),
            })
            .unwrap();
        state
            .set_reconciliation(Vec::new(), ShoppingList::new())
            .unwrap();

        let doc = build_document(&state).unwrap();
        assert_eq!(doc.total_time, iso8601_duration(u32::MAX));
    }

    #[test]
    fn test_document_fields() {
        let facts: NutritionFacts = [("calories".to_string(), 1000.0)].into_iter().collect();
        let state = shopped_state(Nutrition::Available { facts });
        let doc = build_document(&state).unwrap();

        assert_eq!(doc.context, "https://schema.org");
        assert_eq!(doc.schema_type, "Recipe");
        assert_eq!(doc.servings, "3");
        assert_eq!(doc.keywords, ["South Indian", "Medium"]);
        assert_eq!(doc.prep_time, "PT5M");
        assert_eq!(doc.total_time, "PT1H30M");
        assert_eq!(doc.ingredients, ["1 cup rice", "2 cups water"]);
        assert_eq!(doc.available_items, ["rice"]);

        match &doc.nutrition {
            NutritionValue::PerServing(per) => assert_eq!(per["calories"], 333.33),
            other => panic!("expected per-serving nutrition, got {:?}", other),
        }

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["@context"], "https://schema.org");
        assert_eq!(json["@type"], "Recipe");
    }

    #[test]
    fn test_unavailable_nutrition_marker() {
        let state = shopped_state(Nutrition::Unavailable {
            reason: "timed out".to_string(),
        });
        let doc = build_document(&state).unwrap();
        assert!(doc.nutrition.is_unavailable());
    }

    #[test]
    fn test_documents_differ_only_in_id_and_timestamp() {
        let state = shopped_state(Nutrition::Unavailable {
            reason: "down".to_string(),
        });
        let first = build_document(&state).unwrap();
        let mut second = build_document(&state).unwrap();

        assert_ne!(first.id, second.id);
        second.id = first.id.clone();
        second.generated_at = first.generated_at.clone();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_stage_stores_document_once() {
        let mut state = shopped_state(Nutrition::Unavailable {
            reason: "down".to_string(),
        });
        StructuringStage.execute(&mut state).await.unwrap();
        assert_eq!(state.document().unwrap().name, "Rice");

        let err = StructuringStage.execute(&mut state).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::InternalConsistencyFault);
    }

    #[test]
    fn test_incomplete_state_is_consistency_fault() {
        let state = WorkflowState::new(RecipeRequest::new("rice"));
        let err = build_document(&state).unwrap_err();
        assert_eq!(err.kind(), FailureKind::InternalConsistencyFault);
    }
}

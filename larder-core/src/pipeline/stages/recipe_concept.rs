//! RecipeConcept stage - drafts the recipe with the completion capability,
//! then looks up its nutrition.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::PipelineError;
use crate::ingredient_parser::parse_ingredients;
use crate::pipeline::{PipelinePhase, Stage, StageMetadata, WorkflowState};
use crate::prompts::{
    render_recipe_concept_system_prompt, render_recipe_concept_user_prompt,
    RECIPE_CONCEPT_PROMPT_NAME,
};
use crate::tools::{ChatMessage, ChatRequest, ToolClient, ToolFailure, OP_NUTRITION_LOOKUP};
use crate::types::{DraftRecipe, Nutrition, RecipeRequest, MAX_COOKING_TIME_MINUTES};

/// Longest prep or cook time accepted from a draft.
const MAX_DRAFT_TIME_MINUTES: u32 = MAX_COOKING_TIME_MINUTES * 4;

/// Stage that drafts the recipe and fetches nutrition totals.
///
/// A completion failure is fatal. A nutrition failure only degrades the
/// result: nutrition is marked unavailable and a warning is recorded.
pub struct RecipeConceptStage {
    tools: ToolClient,
}

impl RecipeConceptStage {
    /// Stage name constant.
    pub const NAME: &'static str = "recipe_concept";

    pub fn new(tools: ToolClient) -> Self {
        Self { tools }
    }

    async fn draft(&self, request: &RecipeRequest) -> Result<DraftRecipe, ToolFailure> {
        let chat = ChatRequest {
            messages: vec![
                ChatMessage::system(render_recipe_concept_system_prompt()),
                ChatMessage::user(render_recipe_concept_user_prompt(request)),
            ],
            json_response: true,
            max_tokens: Some(2048),
            temperature: Some(0.7),
        };

        let text = self.tools.complete(RECIPE_CONCEPT_PROMPT_NAME, &chat).await?;
        decode_draft(&text, request)
    }

    async fn nutrition(&self, draft: &DraftRecipe, state: &mut WorkflowState) -> Nutrition {
        let query = nutrition_query(draft);

        match self.tools.lookup_nutrition(OP_NUTRITION_LOOKUP, &query).await {
            Ok(facts) => Nutrition::Available { facts },
            Err(failure) => {
                state.warn(format!("Nutrition unavailable: {}", failure));
                Nutrition::Unavailable {
                    reason: failure.to_string(),
                }
            }
        }
    }
}

#[async_trait]
impl Stage for RecipeConceptStage {
    fn metadata(&self) -> StageMetadata {
        StageMetadata {
            name: Self::NAME,
            description: "Draft the recipe and look up its nutrition",
            requires: PipelinePhase::Started,
            produces: PipelinePhase::Planned,
        }
    }

    async fn execute(&self, state: &mut WorkflowState) -> Result<(), PipelineError> {
        let draft = self
            .draft(state.request())
            .await
            .map_err(|failure| PipelineError::GenerationFailed(failure.to_string()))?;

        tracing::info!(
            recipe = %draft.name,
            ingredients = draft.ingredients.len(),
            "Drafted recipe"
        );

        let nutrition = self.nutrition(&draft, state).await;
        state.set_draft_recipe(draft)?;
        state.set_nutrition(nutrition)?;
        Ok(())
    }
}

/// Completion output before validation.
#[derive(Debug, Deserialize)]
struct RawDraft {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    ingredients: Vec<String>,
    #[serde(default)]
    instructions: Vec<String>,
    #[serde(default)]
    prep_time_minutes: Option<Value>,
    #[serde(default)]
    cook_time_minutes: Option<Value>,
}

/// Decode and validate the completion text into a draft recipe.
fn decode_draft(text: &str, request: &RecipeRequest) -> Result<DraftRecipe, ToolFailure> {
    let json = extract_json_object(text);
    let raw: RawDraft = serde_json::from_str(json)
        .map_err(|e| ToolFailure::MalformedResponse(format!("Invalid recipe JSON: {}", e)))?;

    let name = raw.name.trim().to_string();
    if name.is_empty() {
        return Err(ToolFailure::MalformedResponse(
            "Recipe has no name".to_string(),
        ));
    }

    let ingredient_lines = non_blank(raw.ingredients);
    if ingredient_lines.is_empty() {
        return Err(ToolFailure::MalformedResponse(
            "Recipe has no ingredients".to_string(),
        ));
    }

    let instructions = non_blank(raw.instructions);
    if instructions.is_empty() {
        return Err(ToolFailure::MalformedResponse(
            "Recipe has no instructions".to_string(),
        ));
    }

    // Missing, unreadable or out-of-range times split the requested budget in half.
    let half_budget = request.cooking_time_minutes / 2;
    let prep_time_minutes = raw
        .prep_time_minutes
        .as_ref()
        .and_then(draft_minutes)
        .unwrap_or(half_budget);
    let cook_time_minutes = raw
        .cook_time_minutes
        .as_ref()
        .and_then(draft_minutes)
        .unwrap_or(half_budget);

    Ok(DraftRecipe {
        name,
        description: raw.description.trim().to_string(),
        ingredients: parse_ingredients(ingredient_lines.iter().map(String::as_str)),
        instructions,
        prep_time_minutes,
        cook_time_minutes,
    })
}

/// Read a time in minutes from a number or a numeric string ("10", "10.0", "25 minutes").
fn draft_minutes(value: &Value) -> Option<u32> {
    let minutes = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.split_whitespace().next()?.parse::<f64>().ok()?,
        _ => return None,
    };

    let minutes = minutes.round();
    if minutes >= 1.0 && minutes <= f64::from(MAX_DRAFT_TIME_MINUTES) {
        Some(minutes as u32)
    } else {
        tracing::debug!(%value, "Ignoring draft time outside 1..={}", MAX_DRAFT_TIME_MINUTES);
        None
    }
}

fn non_blank(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Strip a Markdown code fence or surrounding prose from a JSON object.
fn extract_json_object(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```") {
        // Drop the info string ("json") on the opening fence line
        body = rest.split_once('\n').map_or("", |(_, after)| after);
        body = body.trim_end().trim_end_matches("```").trim();
    }

    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => &body[start..=end],
        _ => body,
    }
}

/// Flatten the draft's ingredient lines into one lookup query.
fn nutrition_query(draft: &DraftRecipe) -> String {
    draft
        .ingredients
        .iter()
        .map(|ingredient| ingredient.raw_text.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

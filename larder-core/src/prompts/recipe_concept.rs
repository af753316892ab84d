//! Recipe concept prompt: drafts a recipe from the user's request.

use crate::types::RecipeRequest;

/// Prompt name used as the operation name in logs.
pub const RECIPE_CONCEPT_PROMPT_NAME: &str = "recipe_concept";

/// Render the system prompt for drafting a recipe.
pub fn render_recipe_concept_system_prompt() -> String {
    r#"You are a professional chef and recipe planner. Create a recipe concept that makes good use of the ingredients the user already has, and list every ingredient with its quantity.

IMPORTANT RULES:
- Return ONLY valid JSON matching the exact format below. No other text.
- Each ingredient is one line with quantity and unit first, e.g. "2 cups basmati rice".
- Instructions are ordered steps, one string per step.
- Respect every dietary restriction.

JSON format:
{
  "name": "string",
  "description": "string",
  "ingredients": ["string"],
  "instructions": ["string"],
  "prep_time_minutes": 15,
  "cook_time_minutes": 30
}

prep_time_minutes and cook_time_minutes are plain JSON integers (minutes), not strings."#
    .to_string()
}

/// Render the user message describing the request.
pub fn render_recipe_concept_user_prompt(request: &RecipeRequest) -> String {
    let dietary = if request.dietary_restrictions.is_empty() {
        "none".to_string()
    } else {
        request
            .dietary_restrictions
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        r#"Create a recipe plan:
Available: {available}
Dietary: {dietary}
Cuisine: {cuisine}
Difficulty: {difficulty}
Servings: {servings}
Time: {time} minutes"#,
        available = request.available_ingredients.trim(),
        dietary = dietary,
        cuisine = request.cuisine,
        difficulty = request.difficulty,
        servings = request.servings,
        time = request.cooking_time_minutes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Difficulty;

    #[test]
    fn test_render_system_prompt() {
        let prompt = render_recipe_concept_system_prompt();
        assert!(prompt.contains("prep_time_minutes"));
        assert!(prompt.contains("Return ONLY valid JSON"));
        assert!(prompt.contains(r#""prep_time_minutes": 15,"#));
        assert!(!prompt.contains(r#""integer""#));
    }

    #[test]
    fn test_render_user_prompt() {
        let mut request = RecipeRequest::new("rice, onions, salt");
        request.cuisine = "Italian".to_string();
        request.difficulty = Difficulty::Hard;
        request.servings = 4;
        request.cooking_time_minutes = 90;
        request.dietary_restrictions.insert("Vegan".to_string());
        request.dietary_restrictions.insert("Gluten-Free".to_string());

        let prompt = render_recipe_concept_user_prompt(&request);
        assert!(prompt.contains("Available: rice, onions, salt"));
        assert!(prompt.contains("Dietary: Gluten-Free, Vegan"));
        assert!(prompt.contains("Cuisine: Italian"));
        assert!(prompt.contains("Difficulty: Hard"));
        assert!(prompt.contains("Servings: 4"));
        assert!(prompt.contains("Time: 90 minutes"));
    }

    #[test]
    fn test_no_dietary_restrictions() {
        let prompt = render_recipe_concept_user_prompt(&RecipeRequest::new("eggs"));
        assert!(prompt.contains("Dietary: none"));
    }
}

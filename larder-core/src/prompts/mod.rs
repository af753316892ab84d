//! LLM prompt templates.

pub mod recipe_concept;

pub use recipe_concept::{
    render_recipe_concept_system_prompt, render_recipe_concept_user_prompt,
    RECIPE_CONCEPT_PROMPT_NAME,
};

pub mod error;
pub mod ingredient_categorizer;
pub mod ingredient_parser;
pub mod pipeline;
pub mod prompts;
pub mod reconcile;
pub mod tools;
pub mod types;

pub use error::{FailureKind, PipelineError, RequestError};
pub use ingredient_categorizer::categorize;
pub use ingredient_parser::{parse_ingredient, parse_ingredients, RecipeIngredient};
pub use pipeline::stages::build_document;
pub use pipeline::{PipelinePhase, PipelineResult, PipelineRunner, WorkflowState};
pub use reconcile::{reconcile, Reconciliation, ReconciliationSummary};
pub use tools::{
    CompletionProvider, FakeCompletion, FakeNutrition, NutritionProvider, ToolClient,
    ToolFailure, ToolPolicy,
};
pub use types::{
    Difficulty, DraftRecipe, Nutrition, NutritionFacts, NutritionValue, RecipeDocument,
    RecipeRequest, ShoppingItem, ShoppingList,
};

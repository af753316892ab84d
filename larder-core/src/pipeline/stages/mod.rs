//! Stage implementations, in run order.

mod recipe_concept;
mod shopping;
mod structuring;

pub use recipe_concept::RecipeConceptStage;
pub use shopping::ShoppingStage;
pub use structuring::{build_document, iso8601_duration, StructuringStage, SCHEMA_CONTEXT, SCHEMA_TYPE};

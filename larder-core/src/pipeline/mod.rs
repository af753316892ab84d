//! Staged recipe pipeline.
//!
//! This module provides a trait-based pipeline where:
//! - Stages are defined via the `Stage` trait and declare the phase they
//!   require and produce
//! - One `WorkflowState` per request accumulates stage outputs, write-once
//! - `PipelineRunner` drives the stages in order and decides abort vs continue

mod runner;
mod stage;
mod state;
pub mod stages;

pub use runner::{PipelineResult, PipelineRunner};
pub use stage::{Stage, StageMetadata};
pub use state::{PipelinePhase, WorkflowState};

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::stages::{RecipeConceptStage, ShoppingStage, StructuringStage};

    #[test]
    fn stage_names_are_unique() {
        let names = [
            RecipeConceptStage::NAME,
            ShoppingStage::NAME,
            StructuringStage::NAME,
        ];

        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(
            names.len(),
            unique.len(),
            "Duplicate stage names detected! Names: {:?}",
            names
        );
    }
}

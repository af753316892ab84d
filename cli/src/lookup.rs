//! Standalone nutrition lookup and shopping-list commands.

use std::sync::Arc;

use anyhow::{Context, Result};
use larder_core::ingredient_parser::parse_ingredients;
use larder_core::reconcile::reconcile;
use larder_core::tools::{
    invoke_with_policy, CalorieNinjasLookup, FakeNutrition, NutritionConfig, NutritionProvider,
    ToolPolicy, OP_NUTRITION_LOOKUP,
};
use serde_json::json;

/// Look up summed nutrition for a list of ingredient lines.
pub async fn nutrition(ingredients: &[String], offline: bool) -> Result<()> {
    let provider: Arc<dyn NutritionProvider> = if offline {
        Arc::new(FakeNutrition::default())
    } else {
        let config = NutritionConfig::from_env().context("Failed to configure nutrition lookup")?;
        Arc::new(CalorieNinjasLookup::new(config))
    };
    let policy = ToolPolicy::from_env()?;

    let query = ingredients.join(", ");
    let facts = invoke_with_policy(OP_NUTRITION_LOOKUP, &policy, |_| provider.lookup(&query))
        .await
        .with_context(|| format!("Nutrition lookup failed for {:?}", query))?;

    let output = json!({
        "query": query,
        "nutrition": facts,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Reconcile recipe ingredient lines against the ingredients on hand.
pub fn shopping_list(ingredients: &[String], available: &str) -> Result<()> {
    let required = parse_ingredients(ingredients.iter().map(String::as_str));
    let reconciliation = reconcile(&required, available);

    let output = json!({
        "shopping_list": reconciliation.shopping_list,
        "available_items": reconciliation.available_items,
        "summary": reconciliation.summary(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

//! Nutrition lookup against the CalorieNinjas API.

use async_trait::async_trait;
use serde::Deserialize;

use super::config::NutritionConfig;
use super::{NutritionProvider, ToolFailure};
use crate::types::NutritionFacts;

/// Nutrients summed across all items the API recognizes.
pub const TRACKED_NUTRIENTS: &[&str] = &[
    "calories",
    "protein_g",
    "fat_total_g",
    "carbohydrates_total_g",
    "fiber_g",
    "sugar_g",
    "sodium_mg",
];

/// CalorieNinjas nutrition lookup.
#[derive(Debug)]
pub struct CalorieNinjasLookup {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl CalorieNinjasLookup {
    pub fn new(config: NutritionConfig) -> Self {
        Self {
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

/// API response format.
#[derive(Debug, Deserialize)]
struct NutritionResponse {
    items: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Sum the tracked nutrients over every item in a response body.
fn sum_items(body: &str) -> Result<NutritionFacts, ToolFailure> {
    let response: NutritionResponse = serde_json::from_str(body)
        .map_err(|e| ToolFailure::MalformedResponse(format!("Invalid nutrition body: {}", e)))?;

    let mut facts: NutritionFacts = TRACKED_NUTRIENTS
        .iter()
        .map(|name| (name.to_string(), 0.0))
        .collect();

    for item in &response.items {
        for name in TRACKED_NUTRIENTS {
            if let Some(value) = item.get(*name).and_then(|v| v.as_f64()) {
                if let Some(total) = facts.get_mut(*name) {
                    *total += value;
                }
            }
        }
    }

    Ok(facts)
}

#[async_trait]
impl NutritionProvider for CalorieNinjasLookup {
    async fn lookup(&self, query: &str) -> Result<NutritionFacts, ToolFailure> {
        let response = self
            .client
            .get(format!("{}/nutrition", self.base_url))
            .query(&[("query", query)])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| ToolFailure::Unreachable(e.to_string()))?;

        let status = response.status().as_u16();

        let body = response
            .text()
            .await
            .map_err(|e| ToolFailure::Unreachable(e.to_string()))?;

        if status != 200 {
            return Err(ToolFailure::Rejected {
                status: Some(status),
                message: body,
            });
        }

        sum_items(&body)
    }

    fn provider_name(&self) -> &'static str {
        "calorieninjas"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_items() {
        let body = r#"{"items": [
            {"name": "rice", "calories": 260.5, "protein_g": 5.4, "sodium_mg": 2},
            {"name": "onion", "calories": 44.2, "protein_g": 1.2, "fiber_g": 1.9}
        ]}"#;

        let facts = sum_items(body).unwrap();
        assert!((facts["calories"] - 304.7).abs() < 1e-9);
        assert!((facts["protein_g"] - 6.6).abs() < 1e-9);
        assert_eq!(facts["sodium_mg"], 2.0);
        assert_eq!(facts["sugar_g"], 0.0);
        assert_eq!(facts.len(), TRACKED_NUTRIENTS.len());
    }

    #[test]
    fn test_empty_items_is_all_zero() {
        let facts = sum_items(r#"{"items": []}"#).unwrap();
        assert!(facts.values().all(|v| *v == 0.0));
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            sum_items("<html>oops</html>"),
            Err(ToolFailure::MalformedResponse(_))
        ));
        assert!(matches!(
            sum_items(r#"{"results": []}"#),
            Err(ToolFailure::MalformedResponse(_))
        ));
    }
}

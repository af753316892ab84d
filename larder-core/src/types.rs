use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::ingredient_parser::RecipeIngredient;

pub const MIN_SERVINGS: u32 = 1;
pub const MAX_SERVINGS: u32 = 12;
pub const MIN_COOKING_TIME_MINUTES: u32 = 10;
pub const MAX_COOKING_TIME_MINUTES: u32 = 240;

/// Cuisines offered to users. The pipeline accepts any string; this list
/// only backs reference output and prompts in the CLI.
pub const KNOWN_CUISINES: &[&str] = &[
    "South Indian",
    "North Indian",
    "Italian",
    "Chinese",
    "Mexican",
    "Thai",
    "Japanese",
    "Mediterranean",
    "American",
    "French",
];

pub const KNOWN_DIETARY_RESTRICTIONS: &[&str] = &[
    "Vegetarian",
    "Vegan",
    "Gluten-free",
    "Dairy-free",
    "Nut-free",
    "Diabetic",
    "Halal",
    "Kosher",
    "Low-calorie",
    "Low-fat",
    "Low-sodium",
];

/// Recipe difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: &'static [Difficulty] = &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(RequestError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// User inputs for one generation run. Set once when the pipeline starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRequest {
    /// Free text, comma or newline separated
    pub available_ingredients: String,
    #[serde(default)]
    pub dietary_restrictions: BTreeSet<String>,
    pub cuisine: String,
    pub difficulty: Difficulty,
    pub servings: u32,
    pub cooking_time_minutes: u32,
}

impl Default for RecipeRequest {
    fn default() -> Self {
        Self {
            available_ingredients: String::new(),
            dietary_restrictions: BTreeSet::new(),
            cuisine: "South Indian".to_string(),
            difficulty: Difficulty::Medium,
            servings: 2,
            cooking_time_minutes: 50,
        }
    }
}

impl RecipeRequest {
    pub fn new(available_ingredients: impl Into<String>) -> Self {
        Self {
            available_ingredients: available_ingredients.into(),
            ..Default::default()
        }
    }

    /// Range and emptiness checks a host should run before the pipeline.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.available_ingredients.trim().is_empty() {
            return Err(RequestError::EmptyIngredients);
        }
        if !(MIN_SERVINGS..=MAX_SERVINGS).contains(&self.servings) {
            return Err(RequestError::ServingsOutOfRange {
                min: MIN_SERVINGS,
                max: MAX_SERVINGS,
                actual: self.servings,
            });
        }
        if !(MIN_COOKING_TIME_MINUTES..=MAX_COOKING_TIME_MINUTES)
            .contains(&self.cooking_time_minutes)
        {
            return Err(RequestError::CookingTimeOutOfRange {
                min: MIN_COOKING_TIME_MINUTES,
                max: MAX_COOKING_TIME_MINUTES,
                actual: self.cooking_time_minutes,
            });
        }
        Ok(())
    }
}

/// Recipe drafted by the concept stage, before structuring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftRecipe {
    pub name: String,
    pub description: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<String>,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
}

/// Nutrient name -> summed value (e.g. "calories", "protein_g")
pub type NutritionFacts = BTreeMap<String, f64>;

/// Nutrition data for a draft, or the reason it is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Nutrition {
    Available { facts: NutritionFacts },
    Unavailable { reason: String },
}

impl Nutrition {
    pub fn is_available(&self) -> bool {
        matches!(self, Nutrition::Available { .. })
    }
}

/// One entry on the shopping list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Store section -> items to buy, in recipe order within each section
pub type ShoppingList = BTreeMap<String, Vec<ShoppingItem>>;

pub const NUTRITION_UNAVAILABLE: &str = "unavailable";

/// Nutrition as it appears in the output document: a per-serving map or
/// the literal string "unavailable".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NutritionValue {
    PerServing(NutritionFacts),
    Marker(String),
}

impl NutritionValue {
    pub fn unavailable() -> Self {
        NutritionValue::Marker(NUTRITION_UNAVAILABLE.to_string())
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, NutritionValue::Marker(m) if m == NUTRITION_UNAVAILABLE)
    }
}

/// Final, schema.org-tagged recipe document returned to hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDocument {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub schema_type: String,
    pub id: String,
    pub generated_at: String,
    pub name: String,
    pub description: String,
    pub cuisine: String,
    pub difficulty: Difficulty,
    pub dietary_restrictions: Vec<String>,
    pub keywords: Vec<String>,
    /// ISO-8601 duration, e.g. "PT25M"
    pub prep_time: String,
    pub cook_time: String,
    pub total_time: String,
    pub servings: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub nutrition: NutritionValue,
    pub shopping_list: ShoppingList,
    pub available_items: Vec<String>,
}

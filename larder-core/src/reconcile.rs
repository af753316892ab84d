//! Ingredient reconciliation.
//!
//! Matches the user's free-text list of ingredients on hand against the
//! structured ingredients a recipe needs. Every required ingredient ends up
//! in exactly one of `available_items` or the categorized shopping list.
//!
//! Matching is deliberately tolerant because the available list is typed by
//! a person: "tomato" matches "tomatoes" and "2 onions" matches "onion". A
//! required ingredient counts as available when its normalized name is a
//! substring of an available token, or when the two share a significant
//! word (3+ letters, plural stripped, not a stop word).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ingredient_categorizer::categorize;
use crate::ingredient_parser::{is_quantity_token, RecipeIngredient, UNITS};
use crate::types::{ShoppingItem, ShoppingList};

const MIN_SIGNIFICANT_LEN: usize = 3;

/// Descriptors that never identify an ingredient on their own.
const FILLER_WORDS: &[&str] = &[
    "of", "a", "an", "fresh", "dried", "chopped", "diced", "minced", "sliced", "grated", "large",
    "medium", "small", "whole", "ripe", "raw", "cooked", "frozen", "some", "few",
];

/// Words too common in free text to count as a shared ingredient word.
const STOP_WORDS: &[&str] = &[
    "and", "the", "with", "have", "got", "for", "any", "also", "plus", "some", "few", "lot", "lots",
    "bit", "left", "over", "about",
];

/// Outcome of reconciling one recipe against the ingredients on hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Canonical required-ingredient names already on hand, in recipe order
    pub available_items: Vec<String>,
    pub shopping_list: ShoppingList,
}

/// Counts mirroring what a shopper sees at a glance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub total_items_needed: usize,
    pub items_to_buy: usize,
    pub items_in_stock: usize,
}

impl Reconciliation {
    pub fn summary(&self) -> ReconciliationSummary {
        let items_to_buy: usize = self.shopping_list.values().map(Vec::len).sum();
        ReconciliationSummary {
            total_items_needed: items_to_buy + self.available_items.len(),
            items_to_buy,
            items_in_stock: self.available_items.len(),
        }
    }

    /// Names on the shopping list across all sections.
    pub fn shopping_names(&self) -> impl Iterator<Item = &str> {
        self.shopping_list
            .values()
            .flat_map(|items| items.iter().map(|item| item.name.as_str()))
    }
}

/// An available-ingredients token after normalization.
#[derive(Debug)]
struct AvailableToken {
    phrase: String,
    words: BTreeSet<String>,
}

/// Reconcile required ingredients against the free-text available list.
pub fn reconcile(required: &[RecipeIngredient], available_text: &str) -> Reconciliation {
    let tokens = tokenize_available(available_text);
    let mut result = Reconciliation::default();

    for ingredient in required {
        let canonical = canonical_name(ingredient);

        if is_available(&canonical, &tokens) {
            tracing::debug!(ingredient = %canonical, "Ingredient already on hand");
            result.available_items.push(canonical);
        } else {
            let section = categorize(&canonical);
            result
                .shopping_list
                .entry(section.to_string())
                .or_default()
                .push(ShoppingItem {
                    name: canonical,
                    quantity: ingredient.quantity.clone(),
                    unit: ingredient.unit.clone(),
                });
        }
    }

    result
}

/// The name stored in `available_items` and on the shopping list.
pub fn canonical_name(ingredient: &RecipeIngredient) -> String {
    let name = ingredient.name.trim();
    if name.is_empty() {
        ingredient.raw_text.trim().to_lowercase()
    } else {
        name.to_lowercase()
    }
}

/// Split free text on commas, semicolons and newlines, normalizing each
/// piece and dropping pieces that normalize to nothing.
fn tokenize_available(text: &str) -> Vec<AvailableToken> {
    text.split([',', ';', '\n'])
        .filter_map(|piece| {
            let phrase = normalize_phrase(piece);
            if phrase.is_empty() {
                return None;
            }
            let words = significant_words(&phrase);
            Some(AvailableToken { phrase, words })
        })
        .collect()
}

fn is_available(canonical: &str, tokens: &[AvailableToken]) -> bool {
    let phrase = normalize_phrase(canonical);
    if phrase.is_empty() {
        return false;
    }
    let words = significant_words(&phrase);

    tokens
        .iter()
        .any(|token| token.phrase.contains(&phrase) || !token.words.is_disjoint(&words))
}

/// Lowercase, replace punctuation with spaces, and drop quantity, unit and
/// filler words.
pub(crate) fn normalize_phrase(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '/' || c == '.' || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| !is_quantity_token(word))
        .map(|word| word.trim_matches(['.', '-', '/']))
        .filter(|word| !word.is_empty())
        .filter(|word| !UNITS.contains(word) && !FILLER_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn significant_words(phrase: &str) -> BTreeSet<String> {
    phrase
        .split_whitespace()
        .filter(|word| !STOP_WORDS.contains(word))
        .map(singularize)
        .filter(|word| word.chars().count() >= MIN_SIGNIFICANT_LEN)
        .collect()
}

/// Plurals the suffix rules get wrong.
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("chilies", "chili"),
    ("chillies", "chilli"),
    ("halves", "half"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("loaves", "loaf"),
];

/// Strip common English plural endings.
fn singularize(word: &str) -> String {
    if let Some((_, singular)) = IRREGULAR_PLURALS.iter().find(|(plural, _)| *plural == word) {
        return singular.to_string();
    }
    if word.len() > 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{}y", stem);
        }
        if let Some(stem) = word.strip_suffix("oes") {
            return format!("{}o", stem);
        }
        for suffix in ["ches", "shes", "sses", "xes"] {
            if word.ends_with(suffix) {
                return word[..word.len() - 2].to_string();
            }
        }
    }
    if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

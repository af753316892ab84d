//! Golden file tests for ingredient reconciliation.
//!
//! Each JSON file in `fixtures/reconcile/` pairs a free-text available
//! list and recipe ingredient lines with the expected split into on-hand
//! items and a categorized shopping list.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use glob::glob;
use larder_core::ingredient_parser::parse_ingredients;
use larder_core::reconcile::{canonical_name, reconcile};
use larder_core::types::ShoppingList;
use serde::Deserialize;

/// A test case loaded from a JSON fixture file
#[derive(Debug, Deserialize)]
struct TestCase {
    available: String,
    ingredients: Vec<String>,
    expected: Expected,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Expected {
    available_items: Vec<String>,
    shopping_list: ShoppingList,
}

fn load_test_cases() -> Vec<(String, TestCase)> {
    let pattern = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/reconcile")
        .join("*.json");
    let pattern_str = pattern.to_string_lossy();

    let mut cases = Vec::new();
    for entry in glob(&pattern_str).expect("Failed to read glob pattern") {
        let path = entry.expect("Failed to read directory entry");
        let name = path.file_stem().unwrap().to_string_lossy().into_owned();
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
        let case: TestCase = serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e));
        cases.push((name, case));
    }

    cases.sort_by(|a, b| a.0.cmp(&b.0));
    cases
}

#[test]
fn test_reconcile_golden_files() {
    let cases = load_test_cases();
    assert!(!cases.is_empty(), "No reconcile fixtures found");

    let mut failures = Vec::new();

    for (name, case) in &cases {
        let required = parse_ingredients(case.ingredients.iter().map(String::as_str));
        let result = reconcile(&required, &case.available);

        let actual = Expected {
            available_items: result.available_items,
            shopping_list: result.shopping_list,
        };
        if actual != case.expected {
            failures.push(format!(
                "\n=== {} ===\nExpected: {:#?}\nActual:   {:#?}\n",
                name, case.expected, actual
            ));
        }
    }

    if !failures.is_empty() {
        panic!(
            "\n{} failures across {} tests:\n{}",
            failures.len(),
            cases.len(),
            failures.concat()
        );
    }
}

/// Every required ingredient lands in exactly one of the two outputs.
#[test]
fn test_reconcile_partitions_every_fixture() {
    for (name, case) in load_test_cases() {
        let required = parse_ingredients(case.ingredients.iter().map(String::as_str));
        let result = reconcile(&required, &case.available);

        let required_names: Vec<String> = required.iter().map(canonical_name).collect();
        let mut seen: Vec<&str> = result
            .available_items
            .iter()
            .map(String::as_str)
            .chain(result.shopping_names())
            .collect();
        seen.sort_unstable();
        let mut expected: Vec<&str> = required_names.iter().map(String::as_str).collect();
        expected.sort_unstable();

        assert_eq!(seen, expected, "{}: partition mismatch", name);

        let available: BTreeSet<&str> = result.available_items.iter().map(String::as_str).collect();
        assert!(
            result.shopping_names().all(|n| !available.contains(n)),
            "{}: item both on hand and on the list",
            name
        );
    }
}

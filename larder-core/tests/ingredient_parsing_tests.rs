//! Golden file tests for ingredient line parsing.
//!
//! Test cases are individual JSON files in `fixtures/ingredient_parsing/`.
//!
//! Test format:
//! ```json
//! {
//!   "raw": "2 cloves garlic, minced",
//!   "expected": { "name": "garlic", "quantity": "2", "unit": "cloves" }
//! }
//! ```

use glob::glob;
use larder_core::ingredient_parser::{parse_ingredient, RecipeIngredient};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// A test case loaded from a JSON fixture file
#[derive(Debug, Deserialize)]
struct TestCase {
    /// Raw ingredient line to parse
    raw: String,
    /// Expected output from parsing
    expected: Expected,
}

/// Expected output from parsing
#[derive(Debug, Deserialize, PartialEq, Clone)]
struct Expected {
    name: String,
    quantity: Option<String>,
    unit: Option<String>,
}

impl From<RecipeIngredient> for Expected {
    fn from(parsed: RecipeIngredient) -> Self {
        Self {
            name: parsed.name,
            quantity: parsed.quantity,
            unit: parsed.unit,
        }
    }
}

fn load_test_cases() -> Vec<(String, TestCase)> {
    let pattern = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/ingredient_parsing")
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

    // Sort by name for deterministic ordering
    cases.sort_by(|a, b| a.0.cmp(&b.0));
    cases
}

#[test]
fn test_ingredient_parsing_golden_files() {
    let cases = load_test_cases();
    assert!(!cases.is_empty(), "No ingredient parsing fixtures found");

    let mut failures = Vec::new();

    for (name, case) in &cases {
        let parsed = parse_ingredient(&case.raw);
        assert_eq!(parsed.raw_text, case.raw.trim(), "{}: raw text must be kept", name);

        let actual = Expected::from(parsed);
        if actual != case.expected {
            failures.push((name.clone(), case.raw.clone(), case.expected.clone(), actual));
        }
    }

    if !failures.is_empty() {
        let mut msg = format!(
            "\n{} failures across {} tests:\n",
            failures.len(),
            cases.len()
        );

        for (name, raw, expected, actual) in &failures {
            msg.push_str(&format!("\n=== {} ===\n", name));
            msg.push_str(&format!("Input: {:?}\n", raw));
            msg.push_str(&format!("Expected: {:#?}\n", expected));
            msg.push_str(&format!("Actual:   {:#?}\n", actual));
        }

        panic!("{}", msg);
    }

    println!("All {} ingredient parsing tests passed!", cases.len());
}

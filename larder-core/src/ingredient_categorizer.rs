//! Store-section lookup for shopping list grouping.
//!
//! Maps ingredient names to grocery store sections by keyword containment.
//! The keyword table lives in `data/store_sections.json` and is embedded at
//! compile time.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Section used when no keyword matches.
pub const DEFAULT_SECTION: &str = "Pantry";

#[derive(Deserialize)]
struct StoreSectionsData {
    sections: HashMap<String, String>,
}

/// Keyword table sorted by keyword length (longest first), then
/// alphabetically, so "coconut milk" is tried before "milk" and ties are
/// resolved the same way on every run.
static SECTION_MAP: LazyLock<Vec<(String, String)>> = LazyLock::new(|| {
    let json = include_str!("../data/store_sections.json");
    let data: StoreSectionsData =
        serde_json::from_str(json).expect("Failed to parse store_sections.json");

    let mut map: Vec<(String, String)> = data.sections.into_iter().collect();
    map.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
    map
});

/// Store section for an ingredient name, or [`DEFAULT_SECTION`].
pub fn categorize(name: &str) -> &'static str {
    let lower = name.to_lowercase();

    SECTION_MAP
        .iter()
        .find(|(keyword, _)| lower.contains(keyword.as_str()))
        .map(|(_, section)| section_to_static(section))
        .unwrap_or(DEFAULT_SECTION)
}

fn section_to_static(section: &str) -> &'static str {
    match section {
        "Produce" => "Produce",
        "Grains" => "Grains",
        "Dairy" => "Dairy",
        "Proteins" => "Proteins",
        "Spices" => "Spices",
        "Oils & Condiments" => "Oils & Condiments",
        "Baking" => "Baking",
        _ => DEFAULT_SECTION,
    }
}

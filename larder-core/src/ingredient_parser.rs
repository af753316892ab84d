//! Ingredient line parsing.
//!
//! Splits a recipe line such as "2 cups basmati rice, rinsed" into
//! quantity, unit and ingredient name. Parsing is best-effort: anything
//! that cannot be recognized stays in the name and quantity/unit are left
//! empty.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// One ingredient line of a drafted recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// The line exactly as the model wrote it
    pub raw_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub name: String,
}

/// Units, longest first so "tablespoons" wins over "tb".
static UNITS_SORTED: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut units = UNITS.to_vec();
    units.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    units
});

pub(crate) const UNITS: &[&str] = &[
    // Volume
    "fluid ounces",
    "fluid ounce",
    "tablespoons",
    "tablespoon",
    "teaspoons",
    "teaspoon",
    "cups",
    "cup",
    "tbsp",
    "tsp",
    "fl oz",
    "quarts",
    "quart",
    "pints",
    "pint",
    "milliliters",
    "milliliter",
    "liters",
    "liter",
    "litres",
    "litre",
    "ml",
    "l",
    // Weight
    "ounces",
    "ounce",
    "pounds",
    "pound",
    "lbs",
    "lb",
    "oz",
    "kilograms",
    "kilogram",
    "grams",
    "gram",
    "kg",
    "g",
    // Count
    "packages",
    "package",
    "bunches",
    "bunch",
    "pinches",
    "pinch",
    "slices",
    "slice",
    "sprigs",
    "sprig",
    "stalks",
    "stalk",
    "pieces",
    "piece",
    "cloves",
    "clove",
    "heads",
    "head",
    "sticks",
    "stick",
    "cans",
    "can",
    "jars",
    "jar",
    "dashes",
    "dash",
    "handfuls",
    "handful",
    "pcs",
];

/// Size words that precede a name without being a unit ("2 large onions").
const SIZE_WORDS: &[&str] = &["extra-large", "large", "medium", "small"];

/// Trailing notes after a comma that describe preparation, not the item.
const PREP_NOTES: &[&str] = &[
    "to taste",
    "as needed",
    "optional",
    "for garnish",
    "for serving",
    "divided",
    "chopped",
    "diced",
    "minced",
    "sliced",
    "grated",
    "rinsed",
    "drained",
    "peeled",
    "crushed",
    "softened",
    "melted",
    "beaten",
    "soaked",
    "cubed",
    "julienned",
];

const VULGAR_FRACTIONS: &[char] = &['½', '⅓', '⅔', '¼', '¾', '⅛', '⅜', '⅝', '⅞'];

/// Parse a single ingredient line.
pub fn parse_ingredient(raw: &str) -> RecipeIngredient {
    let raw_text = raw.trim().to_string();
    let mut remaining = strip_parentheticals(&raw_text);

    let (quantity, after_amount) = extract_amount(&remaining);
    remaining = after_amount;

    let (unit, after_unit) = if quantity.is_some() {
        extract_unit(&remaining)
    } else {
        // "cup of tea" style lines without a number rarely carry a real unit
        (None, remaining.clone())
    };
    remaining = after_unit;

    remaining = strip_prep_note(&remaining);
    remaining = strip_leading_words(&remaining);

    let name = if remaining.is_empty() {
        raw_text.clone()
    } else {
        remaining
    };

    RecipeIngredient {
        raw_text,
        quantity,
        unit,
        name,
    }
}

/// Parse one ingredient per non-blank line.
pub fn parse_ingredients<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<RecipeIngredient> {
    lines
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .map(parse_ingredient)
        .collect()
}

/// Whether a whitespace token is a number, fraction or vulgar fraction.
pub(crate) fn is_quantity_token(token: &str) -> bool {
    let token = token.trim_matches(|c: char| c == ',' || c == '.');
    if token.is_empty() {
        return false;
    }
    if is_fraction(token) {
        return true;
    }
    if token.chars().all(|c| VULGAR_FRACTIONS.contains(&c)) {
        return true;
    }
    // "1½", "2-3", "1.5"
    token.chars().any(|c| c.is_ascii_digit())
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == '-' || VULGAR_FRACTIONS.contains(&c))
}

fn strip_parentheticals(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract a leading amount ("1 1/2", "1/2", "2.5", "½", "2-3").
/// Returns (amount, remaining).
fn extract_amount(s: &str) -> (Option<String>, String) {
    let words: Vec<&str> = s.split_whitespace().collect();
    let Some(first) = words.first() else {
        return (None, String::new());
    };

    if !is_quantity_token(first) {
        // Glued amount and unit: "200g rice"
        let digits: String = first
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        if !digits.is_empty() && digits != "." {
            let rest = first[digits.len()..].to_string();
            let remaining = std::iter::once(rest.as_str())
                .chain(words[1..].iter().copied())
                .filter(|w| !w.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            return (Some(digits), remaining);
        }
        return (None, words.join(" "));
    }

    let mut amount = first.trim_end_matches(',').to_string();
    let mut consumed = 1;

    // Mixed number: whole followed by a fraction
    if let Some(second) = words.get(1) {
        if first.chars().all(|c| c.is_ascii_digit())
            && (is_fraction(second) || second.chars().all(|c| VULGAR_FRACTIONS.contains(&c)))
        {
            amount = format!("{} {}", first, second);
            consumed = 2;
        }
    }

    (Some(amount), words[consumed..].join(" "))
}

fn is_fraction(s: &str) -> bool {
    match s.split_once('/') {
        Some((before, after)) => {
            !before.is_empty()
                && !after.is_empty()
                && before.chars().all(|c| c.is_ascii_digit())
                && after.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Extract a leading unit at a word boundary. Returns (unit, remaining).
fn extract_unit(s: &str) -> (Option<String>, String) {
    let lower = s.to_lowercase();

    for &unit in UNITS_SORTED.iter() {
        if !lower.starts_with(unit) {
            continue;
        }
        let Some(after) = s.get(unit.len()..) else {
            continue;
        };
        if after.is_empty() || after.starts_with(|c: char| c.is_whitespace() || c == '.' || c == ',')
        {
            let remaining = after.trim_start_matches(['.', ',']).trim();
            let remaining = remaining
                .strip_prefix("of ")
                .unwrap_or(remaining)
                .to_string();
            return (Some(unit.to_string()), remaining);
        }
    }

    (None, s.to_string())
}

fn strip_prep_note(s: &str) -> String {
    if let Some((item, note)) = s.rsplit_once(',') {
        let note = note.trim().to_lowercase();
        if PREP_NOTES.iter().any(|p| note.contains(p)) {
            return item.trim().to_string();
        }
    }
    s.trim().to_string()
}

fn strip_leading_words(s: &str) -> String {
    let mut words: Vec<&str> = s.split_whitespace().collect();
    while let Some(first) = words.first() {
        let lower = first.to_lowercase();
        if SIZE_WORDS.contains(&lower.as_str()) || lower == "of" {
            words.remove(0);
        } else {
            break;
        }
    }
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_ingredient() {
        let result = parse_ingredient("2 cups basmati rice");
        assert_eq!(result.name, "basmati rice");
        assert_eq!(result.quantity, Some("2".to_string()));
        assert_eq!(result.unit, Some("cups".to_string()));
    }

    #[test]
    fn test_ingredient_with_note() {
        let result = parse_ingredient("1 cup butter, softened");
        assert_eq!(result.name, "butter");
        assert_eq!(result.unit, Some("cup".to_string()));
    }

    #[test]
    fn test_mixed_number() {
        let result = parse_ingredient("1 1/2 cups water");
        assert_eq!(result.name, "water");
        assert_eq!(result.quantity, Some("1 1/2".to_string()));
    }

    #[test]
    fn test_vulgar_fraction() {
        let result = parse_ingredient("½ tsp turmeric");
        assert_eq!(result.quantity, Some("½".to_string()));
        assert_eq!(result.unit, Some("tsp".to_string()));
        assert_eq!(result.name, "turmeric");
    }

    #[test]
    fn test_count_with_size_word() {
        let result = parse_ingredient("2 large onions, diced");
        assert_eq!(result.name, "onions");
        assert_eq!(result.quantity, Some("2".to_string()));
        assert_eq!(result.unit, None);
    }

    #[test]
    fn test_glued_metric_amount() {
        let result = parse_ingredient("200g paneer");
        assert_eq!(result.quantity, Some("200".to_string()));
        assert_eq!(result.unit, Some("g".to_string()));
        assert_eq!(result.name, "paneer");
    }

    #[test]
    fn test_parenthetical_is_dropped() {
        let result = parse_ingredient("1 can (400g) coconut milk");
        assert_eq!(result.unit, Some("can".to_string()));
        assert_eq!(result.name, "coconut milk");
    }

    #[test]
    fn test_unparsed_line_keeps_name_only() {
        let result = parse_ingredient("Salt to taste");
        assert_eq!(result.name, "Salt to taste");
        assert_eq!(result.quantity, None);
        assert_eq!(result.unit, None);
    }

    #[test]
    fn test_unit_of() {
        let result = parse_ingredient("2 tbsp of olive oil");
        assert_eq!(result.name, "olive oil");
        assert_eq!(result.unit, Some("tbsp".to_string()));
    }

    #[test]
    fn test_garlic_cloves_not_confused_with_unit_prefix() {
        let result = parse_ingredient("3 garlic cloves");
        assert_eq!(result.unit, None);
        assert_eq!(result.name, "garlic cloves");
    }

    #[test]
    fn test_quantity_only_line_falls_back_to_raw() {
        let result = parse_ingredient("2 cups");
        assert_eq!(result.name, "2 cups");
    }

    #[test]
    fn test_parse_many_skips_blank() {
        let results = parse_ingredients(["2 cups flour", "  ", "3 eggs"]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].name, "eggs");
    }

    #[test]
    fn test_quantity_tokens() {
        assert!(is_quantity_token("2"));
        assert!(is_quantity_token("1/2"));
        assert!(is_quantity_token("2-3"));
        assert!(is_quantity_token("¾"));
        assert!(!is_quantity_token("onion"));
        assert!(!is_quantity_token("-"));
    }
}

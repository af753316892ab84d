mod generate;
mod lookup;

use std::collections::BTreeSet;

use anyhow::Result;
use clap::{Parser, Subcommand};
use larder_core::types::{
    KNOWN_CUISINES, KNOWN_DIETARY_RESTRICTIONS, MAX_COOKING_TIME_MINUTES, MAX_SERVINGS,
    MIN_COOKING_TIME_MINUTES, MIN_SERVINGS,
};
use larder_core::{Difficulty, RecipeRequest};
use serde_json::json;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "larder")]
#[command(about = "Generate recipes from the ingredients you have", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draft a recipe, reconcile it against what you have and print the document
    Generate {
        /// Ingredients on hand, comma or newline separated
        #[arg(long, short)]
        ingredients: String,
        #[arg(long, default_value = "South Indian")]
        cuisine: String,
        /// Easy, Medium or Hard
        #[arg(long, default_value = "Medium")]
        difficulty: Difficulty,
        #[arg(long, default_value_t = 2)]
        servings: u32,
        /// Cooking time budget in minutes
        #[arg(long, default_value_t = 50)]
        time: u32,
        /// Dietary restriction (repeatable)
        #[arg(long = "diet")]
        diets: Vec<String>,
        /// Use scripted providers instead of the network
        #[arg(long)]
        offline: bool,
    },
    /// Look up summed nutrition facts for ingredient lines
    Nutrition {
        /// Ingredient lines, e.g. "2 cups rice"
        #[arg(required = true)]
        ingredients: Vec<String>,
        /// Use scripted providers instead of the network
        #[arg(long)]
        offline: bool,
    },
    /// Build a categorized shopping list for recipe ingredient lines
    ShoppingList {
        /// Ingredients on hand, comma or newline separated
        #[arg(long, short, default_value = "")]
        available: String,
        /// Recipe ingredient lines
        #[arg(required = true)]
        ingredients: Vec<String>,
    },
    /// Print the supported cuisines, diets, difficulties and ranges
    Options,
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            ingredients,
            cuisine,
            difficulty,
            servings,
            time,
            diets,
            offline,
        } => {
            let request = RecipeRequest {
                available_ingredients: ingredients,
                dietary_restrictions: diets.into_iter().collect::<BTreeSet<_>>(),
                cuisine,
                difficulty,
                servings,
                cooking_time_minutes: time,
            };
            generate::generate(request, offline).await?;
        }
        Commands::Nutrition {
            ingredients,
            offline,
        } => {
            lookup::nutrition(&ingredients, offline).await?;
        }
        Commands::ShoppingList {
            available,
            ingredients,
        } => {
            lookup::shopping_list(&ingredients, &available)?;
        }
        Commands::Options => {
            print_options()?;
        }
    }

    Ok(())
}

fn print_options() -> Result<()> {
    let options = json!({
        "cuisines": KNOWN_CUISINES,
        "dietary_restrictions": KNOWN_DIETARY_RESTRICTIONS,
        "difficulties": Difficulty::ALL,
        "servings": { "min": MIN_SERVINGS, "max": MAX_SERVINGS },
        "cooking_time_minutes": { "min": MIN_COOKING_TIME_MINUTES, "max": MAX_COOKING_TIME_MINUTES },
    });
    println!("{}", serde_json::to_string_pretty(&options)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::parse_from(["larder", "generate", "-i", "rice, onions", "--diet", "Vegan"]);
        match cli.command {
            Commands::Generate {
                ingredients,
                cuisine,
                difficulty,
                servings,
                time,
                diets,
                offline,
            } => {
                assert_eq!(ingredients, "rice, onions");
                assert_eq!(cuisine, "South Indian");
                assert_eq!(difficulty, Difficulty::Medium);
                assert_eq!(servings, 2);
                assert_eq!(time, 50);
                assert_eq!(diets, ["Vegan"]);
                assert!(!offline);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_difficulty_is_case_insensitive() {
        let cli = Cli::parse_from(["larder", "generate", "-i", "eggs", "--difficulty", "hard"]);
        assert!(matches!(
            cli.command,
            Commands::Generate {
                difficulty: Difficulty::Hard,
                ..
            }
        ));
    }
}

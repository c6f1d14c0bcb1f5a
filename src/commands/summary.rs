use clap::Args;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use foodcost_core::{Collection, DemoState, DemoStore, IngredientStatus, Recipe};

use super::{truncate, OutputFormat};

#[derive(Args)]
pub struct SummaryArgs {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

/// Statistics derived from the current demo data.
#[derive(Debug, Serialize)]
struct Summary {
    business: Option<String>,
    records: BTreeMap<&'static str, usize>,
    inventory_value: f64,
    low_stock: Vec<String>,
    out_of_stock: Vec<String>,
    unread_notifications: usize,
    active_alerts: usize,
    recipes: Vec<RecipeCost>,
}

/// Cost of a recipe at current ingredient prices.
#[derive(Debug, Serialize)]
struct RecipeCost {
    id: String,
    name: String,
    servings: u32,
    cost_per_serving: f64,
    listed_cost_per_serving: f64,
    /// Ingredient ids referenced by the recipe but no longer present
    missing_ingredients: Vec<String>,
}

impl Summary {
    fn from_state(state: &DemoState) -> Self {
        let records = Collection::ALL
            .iter()
            .map(|c| (c.name(), state.count(*c)))
            .collect();

        let names_with = |status: IngredientStatus| -> Vec<String> {
            state
                .ingredients
                .iter()
                .filter(|i| i.status == status)
                .map(|i| i.name.clone())
                .collect()
        };

        let prices: HashMap<&str, f64> = state
            .ingredients
            .iter()
            .map(|i| (i.id.as_str(), i.current_price))
            .collect();

        Self {
            business: state.current_user.business_name.clone(),
            records,
            inventory_value: state.ingredients.iter().map(|i| i.stock_value()).sum(),
            low_stock: names_with(IngredientStatus::LowStock),
            out_of_stock: names_with(IngredientStatus::OutOfStock),
            unread_notifications: state.notifications.iter().filter(|n| !n.read).count(),
            active_alerts: state.price_alerts.iter().filter(|a| a.is_active).count(),
            recipes: state
                .recipes
                .iter()
                .map(|r| RecipeCost::at_prices(r, &prices))
                .collect(),
        }
    }
}

impl RecipeCost {
    fn at_prices(recipe: &Recipe, prices: &HashMap<&str, f64>) -> Self {
        let mut total = 0.0;
        let mut missing_ingredients = Vec::new();

        for line in &recipe.ingredients {
            match prices.get(line.ingredient_id.as_str()) {
                Some(price) => total += line.quantity * price,
                None => missing_ingredients.push(line.ingredient_id.to_string()),
            }
        }

        let servings = recipe.servings.max(1);
        Self {
            id: recipe.id.to_string(),
            name: recipe.name.clone(),
            servings: recipe.servings,
            cost_per_serving: total / f64::from(servings),
            listed_cost_per_serving: recipe.cost_per_serving,
            missing_ingredients,
        }
    }
}

impl SummaryArgs {
    pub fn run(&self, store: &DemoStore) -> Result<(), Box<dyn std::error::Error>> {
        let summary = Summary::from_state(store.snapshot());

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            OutputFormat::Text => print_summary(&summary),
        }
        Ok(())
    }
}

fn print_summary(summary: &Summary) {
    let title = match &summary.business {
        Some(business) => format!("Summary for {}", business),
        None => "Summary".to_string(),
    };
    println!("{}", title);
    println!("{}\n", "=".repeat(title.len()));

    println!("Records:");
    for (name, count) in &summary.records {
        println!("  {:<20} {}", name, count);
    }

    println!("\nInventory value: {:.2}", summary.inventory_value);
    if !summary.low_stock.is_empty() {
        println!("Low stock: {}", summary.low_stock.join(", "));
    }
    if !summary.out_of_stock.is_empty() {
        println!("Out of stock: {}", summary.out_of_stock.join(", "));
    }
    println!("Unread notifications: {}", summary.unread_notifications);
    println!("Active price alerts: {}", summary.active_alerts);

    if !summary.recipes.is_empty() {
        println!("\n{:<30}  {:>8}  {:>8}", "RECIPE", "COST", "LISTED");
        println!("{}", "-".repeat(50));
        for recipe in &summary.recipes {
            println!(
                "{:<30}  {:>8.2}  {:>8.2}",
                truncate(&recipe.name, 30),
                recipe.cost_per_serving,
                recipe.listed_cost_per_serving
            );
            if !recipe.missing_ingredients.is_empty() {
                println!("  missing: {}", recipe.missing_ingredients.join(", "));
            }
        }
    }
}

use chrono::Utc;
use clap::{Args, Subcommand};

use foodcost_core::{
    DemoStore, Ingredient, IngredientCategory, IngredientStatus, Patch, PricePoint, PriceRecord,
};

#[derive(Args)]
pub struct IngredientCommand {
    #[command(subcommand)]
    pub command: IngredientSubcommand,
}

#[derive(Subcommand)]
pub enum IngredientSubcommand {
    /// Add a new ingredient
    Add {
        /// Name of the ingredient
        name: String,

        /// Category (vegetables, fruits, meat, seafood, dairy, grains, spices, oils, beverages, other)
        #[arg(long)]
        category: IngredientCategory,

        /// Unit of measurement (e.g. kg, l, bunch)
        #[arg(long)]
        unit: String,

        /// Current price per unit
        #[arg(long)]
        price: Option<f64>,

        /// Units in stock
        #[arg(long)]
        stock: Option<f64>,

        /// Description
        #[arg(long)]
        description: Option<String>,
    },

    /// Set the stock level of an ingredient
    Stock {
        /// Ingredient ID
        id: String,

        /// Units in stock
        level: f64,
    },

    /// Record a new price for an ingredient
    Price {
        /// Ingredient ID
        id: String,

        /// Price per unit
        price: f64,

        /// Supplier quoting the price
        #[arg(long)]
        supplier: Option<String>,
    },
}

impl IngredientCommand {
    pub fn run(&self, store: &mut DemoStore) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            IngredientSubcommand::Add {
                name,
                category,
                unit,
                price,
                stock,
                description,
            } => {
                if name.trim().is_empty() {
                    return Err("Ingredient name cannot be empty".into());
                }
                if unit.trim().is_empty() {
                    return Err("Unit cannot be empty".into());
                }

                let threshold = store.options().low_stock_threshold;
                let ingredient = build_ingredient(
                    name.trim(),
                    *category,
                    unit.trim(),
                    *price,
                    *stock,
                    description.as_deref(),
                    threshold,
                )?;

                let id = store.add(ingredient)?;
                println!("Added ingredient:");
                if let Some(added) = store.get::<Ingredient>(id.as_str()) {
                    println!("{}", added);
                }
                Ok(())
            }

            IngredientSubcommand::Stock { id, level } => {
                if !is_quantity(*level) {
                    return Err("Stock level must be a finite, non-negative number".into());
                }

                let patch = Patch::new().set("stock_level", *level);
                if !store.update::<Ingredient>(id, &patch)?.is_applied() {
                    return Err(format!("Ingredient not found: {}", id).into());
                }

                if let Some(ingredient) = store.get::<Ingredient>(id) {
                    println!(
                        "{}: {} {} in stock ({})",
                        ingredient.name, level, ingredient.unit, ingredient.status
                    );
                }
                Ok(())
            }

            IngredientSubcommand::Price {
                id,
                price,
                supplier,
            } => {
                if !is_quantity(*price) {
                    return Err("Price must be a finite, non-negative number".into());
                }

                let ingredient = store
                    .get::<Ingredient>(id)
                    .ok_or_else(|| format!("Ingredient not found: {}", id))?;
                let unit = ingredient.unit.clone();
                let patch = price_patch(ingredient, *price, supplier.as_deref())?;

                store.update::<Ingredient>(id, &patch)?;
                if let Some(supplier) = supplier {
                    store.add(PriceRecord::new(id.as_str(), supplier.as_str(), *price, unit))?;
                }

                if let Some(ingredient) = store.get::<Ingredient>(id) {
                    match ingredient.price_change() {
                        Some(change) => println!(
                            "{}: {:.2}/{} ({:+.1}%)",
                            ingredient.name,
                            ingredient.current_price,
                            ingredient.unit,
                            change * 100.0
                        ),
                        None => println!(
                            "{}: {:.2}/{}",
                            ingredient.name, ingredient.current_price, ingredient.unit
                        ),
                    }
                }
                Ok(())
            }
        }
    }
}

/// Prices and stock levels must be finite and at least zero.
fn is_quantity(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn build_ingredient(
    name: &str,
    category: IngredientCategory,
    unit: &str,
    price: Option<f64>,
    stock: Option<f64>,
    description: Option<&str>,
    low_stock_threshold: f64,
) -> Result<Ingredient, String> {
    let mut ingredient = Ingredient::new(name, category, unit);

    if let Some(price) = price {
        if !is_quantity(price) {
            return Err("Price must be a finite, non-negative number".to_string());
        }
        ingredient = ingredient
            .with_price(price)
            .with_price_history(vec![PricePoint::new(price, Utc::now())]);
    }
    if let Some(stock) = stock {
        if !is_quantity(stock) {
            return Err("Stock level must be a finite, non-negative number".to_string());
        }
        ingredient = ingredient
            .with_stock_level(stock)
            .with_status(IngredientStatus::from_stock_level(
                Some(stock),
                low_stock_threshold,
            ));
    }
    if let Some(description) = description {
        ingredient = ingredient.with_description(description);
    }

    Ok(ingredient)
}

/// Patch setting a new current price and appending it to the history.
fn price_patch(
    ingredient: &Ingredient,
    price: f64,
    supplier: Option<&str>,
) -> Result<Patch, serde_json::Error> {
    let mut point = PricePoint::new(price, Utc::now());
    if let Some(supplier) = supplier {
        point = point.from_supplier(supplier);
    }

    let mut history = ingredient.price_history.clone();
    history.push(point);

    Ok(Patch::new()
        .set("current_price", price)
        .set("price_history", serde_json::to_value(history)?))
}

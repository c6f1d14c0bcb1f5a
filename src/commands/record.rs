use clap::Args;
use serde_json::Value;
use std::io::{self, Write};

use foodcost_core::{
    Collection, DemoStore, Entity, Ingredient, Mutation, Notification, Patch, PriceAlert,
    PriceRecord, Recipe, RecipeIngredient, Supplier, User,
};

use super::{truncate, OutputFormat};

#[derive(Args)]
pub struct ListArgs {
    /// Collection name (e.g. ingredients, price_alerts)
    collection: Collection,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Collection name
    collection: Collection,

    /// Record ID
    id: String,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Args)]
pub struct AddArgs {
    /// Collection name
    collection: Collection,

    /// Record fields as a JSON object
    #[arg(long)]
    data: String,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Collection name
    collection: Collection,

    /// Record ID
    id: String,

    /// Field assignment (can be repeated); the value is parsed as JSON,
    /// falling back to a plain string
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Fields to change as a JSON object
    #[arg(long, conflicts_with = "set")]
    data: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Collection name
    collection: Collection,

    /// Record ID
    id: String,

    /// Skip confirmation prompt
    #[arg(long, short)]
    force: bool,
}

impl ListArgs {
    pub fn run(&self, store: &DemoStore) -> Result<(), Box<dyn std::error::Error>> {
        match self.format {
            OutputFormat::Json => {
                let records = store.list_value(self.collection)?;
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
            OutputFormat::Text => {
                let rows = rows(store, self.collection);
                if rows.is_empty() {
                    println!("No {} found", self.collection);
                    return Ok(());
                }

                println!("{:<30}  DESCRIPTION", "ID");
                println!("{}", "-".repeat(80));
                for (id, description) in &rows {
                    println!("{:<30}  {}", id, truncate(description, 48));
                }
                println!("\nTotal: {} record(s)", rows.len());
            }
        }
        Ok(())
    }
}

impl ShowArgs {
    pub fn run(&self, store: &DemoStore) -> Result<(), Box<dyn std::error::Error>> {
        let not_found = || format!("Record not found in {}: {}", self.collection, self.id);

        match self.format {
            OutputFormat::Json => {
                let record = store
                    .get_value(self.collection, &self.id)?
                    .ok_or_else(not_found)?;
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
            OutputFormat::Text => {
                let record = store
                    .describe(self.collection, &self.id)
                    .ok_or_else(not_found)?;
                println!("{}", record);
            }
        }
        Ok(())
    }
}

impl AddArgs {
    pub fn run(&self, store: &mut DemoStore) -> Result<(), Box<dyn std::error::Error>> {
        let data = parse_object(&self.data)?;
        let id = store.add_value(self.collection, Value::Object(data))?;

        println!("Added to {}: {}", self.collection, id);
        Ok(())
    }
}

impl UpdateArgs {
    pub fn run(&self, store: &mut DemoStore) -> Result<(), Box<dyn std::error::Error>> {
        let patch = build_patch(&self.set, self.data.as_deref())?;

        match store.update_value(self.collection, &self.id, &patch)? {
            Mutation::Applied => {
                println!("Updated {}:", self.id);
                if let Some(record) = store.describe(self.collection, &self.id) {
                    println!("{}", record);
                }
                Ok(())
            }
            Mutation::NotFound => {
                Err(format!("Record not found in {}: {}", self.collection, self.id).into())
            }
        }
    }
}

impl DeleteArgs {
    pub fn run(&self, store: &mut DemoStore) -> Result<(), Box<dyn std::error::Error>> {
        if store.get_value(self.collection, &self.id)?.is_none() {
            return Err(format!("Record not found in {}: {}", self.collection, self.id).into());
        }

        // Confirm deletion unless --force is used
        if !self.force {
            print!("Delete {} from {}? [y/N] ", self.id, self.collection);
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        store.delete_value(self.collection, &self.id);
        println!("Deleted {} from {}", self.id, self.collection);
        Ok(())
    }
}

/// One `(id, description)` row per record, in store order.
fn rows(store: &DemoStore, collection: Collection) -> Vec<(String, String)> {
    match collection {
        Collection::Users => store
            .list::<User>()
            .iter()
            .map(|u| (u.id.to_string(), format!("{} <{}>", u.name, u.email)))
            .collect(),
        Collection::Ingredients => store
            .list::<Ingredient>()
            .iter()
            .map(|i| {
                (
                    i.id.to_string(),
                    format!("{} {:.2}/{} [{}]", i.name, i.current_price, i.unit, i.status),
                )
            })
            .collect(),
        Collection::Recipes => store
            .list::<Recipe>()
            .iter()
            .map(|r| {
                (
                    r.id.to_string(),
                    format!("{} {:.2}/serving", r.name, r.cost_per_serving),
                )
            })
            .collect(),
        Collection::Suppliers => store
            .list::<Supplier>()
            .iter()
            .map(|s| (s.id.to_string(), s.name.clone()))
            .collect(),
        Collection::PriceAlerts => describe_all::<PriceAlert>(store),
        Collection::Notifications => describe_all::<Notification>(store),
        Collection::PriceRecords => describe_all::<PriceRecord>(store),
        Collection::RecipeIngredients => store
            .list::<RecipeIngredient>()
            .iter()
            .map(|line| (line.id.to_string(), format!("{}: {}", line.recipe_id, line)))
            .collect(),
    }
}

fn describe_all<E: Entity>(store: &DemoStore) -> Vec<(String, String)> {
    store
        .list::<E>()
        .iter()
        .map(|e| (e.id().to_string(), e.to_string()))
        .collect()
}

fn parse_object(data: &str) -> Result<serde_json::Map<String, Value>, String> {
    match serde_json::from_str::<Value>(data) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err("Data must be a JSON object".to_string()),
        Err(e) => Err(format!("Invalid JSON data: {}", e)),
    }
}

/// Splits `key=value`; the value is JSON if it parses, otherwise a string.
fn parse_assignment(assignment: &str) -> Result<(String, Value), String> {
    let (key, raw) = assignment
        .split_once('=')
        .ok_or_else(|| format!("Invalid assignment '{}'. Expected KEY=VALUE", assignment))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Missing field name in '{}'", assignment));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

fn build_patch(assignments: &[String], data: Option<&str>) -> Result<Patch, String> {
    let patch = match data {
        Some(data) => Patch::from(parse_object(data)?),
        None => {
            let mut patch = Patch::new();
            for assignment in assignments {
                let (key, value) = parse_assignment(assignment)?;
                patch.insert(key, value);
            }
            patch
        }
    };

    if patch.is_empty() {
        return Err("Nothing to update. Provide --set KEY=VALUE or --data.".to_string());
    }
    Ok(patch)
}

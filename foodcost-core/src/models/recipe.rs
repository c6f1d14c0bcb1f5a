use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::{active_by_default, impl_entity, Collection, EntityId};

/// Join record between a recipe and one of its ingredients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeIngredient {
    pub id: EntityId,
    pub recipe_id: EntityId,
    pub ingredient_id: EntityId,
    pub quantity: f64,
    pub unit: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecipeIngredient {
    pub fn new(
        recipe_id: impl Into<EntityId>,
        ingredient_id: impl Into<EntityId>,
        quantity: f64,
        unit: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::generate(Collection::RecipeIngredients),
            recipe_id: recipe_id.into(),
            ingredient_id: ingredient_id.into(),
            quantity,
            unit: unit.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl_entity!(RecipeIngredient, Collection::RecipeIngredients, recipe_ingredients);

impl fmt::Display for RecipeIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{} {}", self.quantity, self.ingredient_id)
        } else {
            write!(f, "{} {} {}", self.quantity, self.unit, self.ingredient_id)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "one_serving")]
    pub servings: u32,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub cost_per_serving: f64,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn one_serving() -> u32 {
    1
}

impl Recipe {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::generate(Collection::Recipes),
            name: name.into(),
            category: category.into(),
            description: None,
            servings: 1,
            ingredients: Vec::new(),
            cost_per_serving: 0.0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_servings(mut self, servings: u32) -> Self {
        self.servings = servings;
        self
    }

    pub fn with_ingredients(mut self, ingredients: Vec<RecipeIngredient>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_cost_per_serving(mut self, cost: f64) -> Self {
        self.cost_per_serving = cost;
        self
    }

    pub fn total_cost(&self) -> f64 {
        self.cost_per_serving * f64::from(self.servings)
    }
}

impl_entity!(Recipe, Collection::Recipes, recipes);

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;
        writeln!(f, "ID: {}", self.id)?;
        if !self.category.is_empty() {
            writeln!(f, "Category: {}", self.category)?;
        }
        writeln!(f, "Servings: {}", self.servings)?;
        writeln!(
            f,
            "Cost: {:.2} per serving ({:.2} total)",
            self.cost_per_serving,
            self.total_cost()
        )?;

        if let Some(description) = &self.description {
            writeln!(f, "\n{}", description)?;
        }

        if !self.ingredients.is_empty() {
            writeln!(f, "\nIngredients:")?;
            for line in &self.ingredients {
                writeln!(f, "  - {}", line)?;
            }
        }

        Ok(())
    }
}

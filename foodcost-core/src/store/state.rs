use serde::{Deserialize, Serialize};

use crate::entity::Collection;
use crate::models::{
    Ingredient, Notification, PriceAlert, PriceRecord, Recipe, RecipeIngredient, Supplier, User,
};

/// The complete value held by the demo store at a point in time.
///
/// Every collection keeps insertion order. This is also the JSON document
/// written to the persistent slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoState {
    pub current_user: User,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    #[serde(default)]
    pub price_alerts: Vec<PriceAlert>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub price_records: Vec<PriceRecord>,
    #[serde(default)]
    pub recipe_ingredients: Vec<RecipeIngredient>,
}

impl DemoState {
    /// An empty state owned by `current_user`.
    pub fn empty(current_user: User) -> Self {
        Self {
            current_user,
            users: Vec::new(),
            ingredients: Vec::new(),
            recipes: Vec::new(),
            suppliers: Vec::new(),
            price_alerts: Vec::new(),
            notifications: Vec::new(),
            price_records: Vec::new(),
            recipe_ingredients: Vec::new(),
        }
    }

    /// Number of records in one collection.
    pub fn count(&self, collection: Collection) -> usize {
        match collection {
            Collection::Users => self.users.len(),
            Collection::Ingredients => self.ingredients.len(),
            Collection::Recipes => self.recipes.len(),
            Collection::Suppliers => self.suppliers.len(),
            Collection::PriceAlerts => self.price_alerts.len(),
            Collection::Notifications => self.notifications.len(),
            Collection::PriceRecords => self.price_records.len(),
            Collection::RecipeIngredients => self.recipe_ingredients.len(),
        }
    }

    /// Number of records across all collections.
    pub fn len(&self) -> usize {
        Collection::ALL.iter().map(|c| self.count(*c)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

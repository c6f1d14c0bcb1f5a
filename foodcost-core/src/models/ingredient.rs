use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::price_point::PricePoint;
use crate::entity::{active_by_default, impl_entity, Collection, EntityId, Patch};
use crate::store::StoreOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientCategory {
    Vegetables,
    Fruits,
    Meat,
    Seafood,
    Dairy,
    Grains,
    Spices,
    Oils,
    Beverages,
    Other,
}

impl IngredientCategory {
    pub const ALL: [IngredientCategory; 10] = [
        IngredientCategory::Vegetables,
        IngredientCategory::Fruits,
        IngredientCategory::Meat,
        IngredientCategory::Seafood,
        IngredientCategory::Dairy,
        IngredientCategory::Grains,
        IngredientCategory::Spices,
        IngredientCategory::Oils,
        IngredientCategory::Beverages,
        IngredientCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientCategory::Vegetables => "vegetables",
            IngredientCategory::Fruits => "fruits",
            IngredientCategory::Meat => "meat",
            IngredientCategory::Seafood => "seafood",
            IngredientCategory::Dairy => "dairy",
            IngredientCategory::Grains => "grains",
            IngredientCategory::Spices => "spices",
            IngredientCategory::Oils => "oils",
            IngredientCategory::Beverages => "beverages",
            IngredientCategory::Other => "other",
        }
    }
}

impl fmt::Display for IngredientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IngredientCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        IngredientCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| {
                format!(
                    "Invalid category '{}'. Valid options: vegetables, fruits, meat, seafood, \
                     dairy, grains, spices, oils, beverages, other",
                    s
                )
            })
    }
}

/// Availability of an ingredient, derived from its stock level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientStatus {
    #[default]
    Available,
    LowStock,
    OutOfStock,
}

impl IngredientStatus {
    /// Untracked stock counts as available.
    pub fn from_stock_level(stock_level: Option<f64>, low_stock_threshold: f64) -> Self {
        match stock_level {
            None => IngredientStatus::Available,
            Some(level) if level <= 0.0 => IngredientStatus::OutOfStock,
            Some(level) if level <= low_stock_threshold => IngredientStatus::LowStock,
            Some(_) => IngredientStatus::Available,
        }
    }
}

impl fmt::Display for IngredientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngredientStatus::Available => write!(f, "available"),
            IngredientStatus::LowStock => write!(f, "low_stock"),
            IngredientStatus::OutOfStock => write!(f, "out_of_stock"),
        }
    }
}

impl FromStr for IngredientStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "available" => Ok(IngredientStatus::Available),
            "low_stock" => Ok(IngredientStatus::LowStock),
            "out_of_stock" => Ok(IngredientStatus::OutOfStock),
            _ => Err(format!(
                "Invalid status '{}'. Valid options: available, low_stock, out_of_stock",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub id: EntityId,
    pub name: String,
    pub category: IngredientCategory,
    pub unit: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub current_price: f64,
    /// Oldest first.
    #[serde(default)]
    pub price_history: Vec<PricePoint>,
    #[serde(default)]
    pub suppliers: Vec<EntityId>,
    #[serde(default)]
    pub stock_level: Option<f64>,
    #[serde(default)]
    pub status: IngredientStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, category: IngredientCategory, unit: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::generate(Collection::Ingredients),
            name: name.into(),
            category,
            unit: unit.into(),
            description: None,
            is_active: true,
            current_price: 0.0,
            price_history: Vec::new(),
            suppliers: Vec::new(),
            stock_level: None,
            status: IngredientStatus::Available,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.current_price = price;
        self
    }

    pub fn with_price_history(mut self, history: Vec<PricePoint>) -> Self {
        self.price_history = history;
        self
    }

    pub fn with_suppliers(mut self, suppliers: Vec<EntityId>) -> Self {
        self.suppliers = suppliers;
        self
    }

    /// Sets the stock level without touching `status`.
    pub fn with_stock_level(mut self, stock_level: f64) -> Self {
        self.stock_level = Some(stock_level);
        self
    }

    pub fn with_status(mut self, status: IngredientStatus) -> Self {
        self.status = status;
        self
    }

    /// Value of the stock on hand at the current price.
    pub fn stock_value(&self) -> f64 {
        self.stock_level.unwrap_or(0.0).max(0.0) * self.current_price
    }

    /// Relative change between the last two price history entries.
    pub fn price_change(&self) -> Option<f64> {
        match self.price_history.as_slice() {
            [.., previous, latest] if previous.price != 0.0 => {
                Some((latest.price - previous.price) / previous.price)
            }
            _ => None,
        }
    }
}

impl_entity!(Ingredient, Collection::Ingredients, ingredients {
    fn after_patch(&mut self, patch: &Patch, options: &StoreOptions) {
        // An explicit status in the same patch is a manual override.
        if patch.contains("stock_level") && !patch.contains("status") {
            self.status =
                IngredientStatus::from_stock_level(self.stock_level, options.low_stock_threshold);
        }
    }
});

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Category: {}", self.category)?;
        writeln!(f, "Price: {:.2} / {}", self.current_price, self.unit)?;

        match self.stock_level {
            Some(level) => writeln!(f, "Stock: {} {} ({})", level, self.unit, self.status)?,
            None => writeln!(f, "Stock: untracked ({})", self.status)?,
        }

        if !self.is_active {
            writeln!(f, "Inactive")?;
        }

        if let Some(description) = &self.description {
            writeln!(f, "\n{}", description)?;
        }

        if !self.suppliers.is_empty() {
            let suppliers: Vec<&str> = self.suppliers.iter().map(EntityId::as_str).collect();
            writeln!(f, "\nSuppliers: {}", suppliers.join(", "))?;
        }

        if !self.price_history.is_empty() {
            writeln!(f, "\nPrice history:")?;
            for point in &self.price_history {
                writeln!(f, "  - {}", point)?;
            }
        }

        Ok(())
    }
}

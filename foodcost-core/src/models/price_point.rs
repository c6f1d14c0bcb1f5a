use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::EntityId;

/// One entry of an ingredient's price history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    pub price: f64,
    pub recorded_at: DateTime<Utc>,
    #[serde(default)]
    pub supplier_id: Option<EntityId>,
}

impl PricePoint {
    pub fn new(price: f64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            price,
            recorded_at,
            supplier_id: None,
        }
    }

    pub fn from_supplier(mut self, supplier_id: impl Into<EntityId>) -> Self {
        self.supplier_id = Some(supplier_id.into());
        self
    }
}

impl fmt::Display for PricePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} on {}", self.price, self.recorded_at.format("%Y-%m-%d"))?;
        if let Some(supplier) = &self.supplier_id {
            write!(f, " ({})", supplier)?;
        }
        Ok(())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entity::{impl_entity, Collection, EntityId};

/// Where a recorded price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    #[default]
    Manual,
    Scraping,
    Ocr,
    Api,
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceSource::Manual => write!(f, "manual"),
            PriceSource::Scraping => write!(f, "scraping"),
            PriceSource::Ocr => write!(f, "ocr"),
            PriceSource::Api => write!(f, "api"),
        }
    }
}

impl FromStr for PriceSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(PriceSource::Manual),
            "scraping" => Ok(PriceSource::Scraping),
            "ocr" => Ok(PriceSource::Ocr),
            "api" => Ok(PriceSource::Api),
            _ => Err(format!(
                "Invalid price source '{}'. Valid options: manual, scraping, ocr, api",
                s
            )),
        }
    }
}

/// A price observed for an ingredient at a supplier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceRecord {
    pub id: EntityId,
    pub ingredient_id: EntityId,
    pub supplier_id: EntityId,
    pub price: f64,
    pub unit: String,
    #[serde(default)]
    pub source: PriceSource,
    #[serde(default)]
    pub quality_grade: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PriceRecord {
    pub fn new(
        ingredient_id: impl Into<EntityId>,
        supplier_id: impl Into<EntityId>,
        price: f64,
        unit: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::generate(Collection::PriceRecords),
            ingredient_id: ingredient_id.into(),
            supplier_id: supplier_id.into(),
            price,
            unit: unit.into(),
            source: PriceSource::Manual,
            quality_grade: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_quality_grade(mut self, grade: impl Into<String>) -> Self {
        self.quality_grade = Some(grade.into());
        self
    }
}

impl_entity!(PriceRecord, Collection::PriceRecords, price_records);

impl fmt::Display for PriceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {}: {:.2} / {} [{}]",
            self.ingredient_id, self.supplier_id, self.price, self.unit, self.source
        )?;
        if let Some(grade) = &self.quality_grade {
            write!(f, " grade {}", grade)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_record_defaults_to_manual() {
        let record = PriceRecord::new("ingredient-1", "supplier-1", 2.4, "kg");
        assert_eq!(record.source, PriceSource::Manual);
        assert!(record.quality_grade.is_none());
    }

    #[test]
    fn test_price_source_from_str() {
        assert_eq!("OCR".parse::<PriceSource>().unwrap(), PriceSource::Ocr);
        assert!("fax".parse::<PriceSource>().is_err());
    }

    #[test]
    fn test_price_record_display() {
        let record = PriceRecord::new("ingredient-1", "supplier-2", 2.4, "kg")
            .with_source(PriceSource::Scraping)
            .with_quality_grade("A");
        assert_eq!(
            format!("{}", record),
            "ingredient-1 @ supplier-2: 2.40 / kg [scraping] grade A"
        );
    }
}

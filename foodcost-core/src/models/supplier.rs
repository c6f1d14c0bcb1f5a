use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::{active_by_default, impl_entity, Collection, EntityId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supplier {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    /// 0 to 5
    #[serde(default)]
    pub rating: Option<f64>,
    /// Free text, e.g. "1-2 days"
    #[serde(default)]
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub minimum_order: Option<f64>,
    #[serde(default)]
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Supplier {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::generate(Collection::Suppliers),
            name: name.into(),
            contact_person: None,
            phone: None,
            email: None,
            address: None,
            is_active: true,
            rating: None,
            delivery_time: None,
            minimum_order: None,
            payment_terms: None,
            specialties: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_contact(
        mut self,
        person: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        self.contact_person = Some(person.into());
        self.phone = Some(phone.into());
        self.email = Some(email.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_terms(
        mut self,
        delivery_time: impl Into<String>,
        minimum_order: f64,
        payment_terms: impl Into<String>,
    ) -> Self {
        self.delivery_time = Some(delivery_time.into());
        self.minimum_order = Some(minimum_order);
        self.payment_terms = Some(payment_terms.into());
        self
    }

    pub fn with_specialties(mut self, specialties: Vec<String>) -> Self {
        self.specialties = specialties;
        self
    }
}

impl_entity!(Supplier, Collection::Suppliers, suppliers);

impl fmt::Display for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;
        writeln!(f, "ID: {}", self.id)?;

        if let Some(person) = &self.contact_person {
            writeln!(f, "Contact: {}", person)?;
        }
        let reach: Vec<&str> = [self.phone.as_deref(), self.email.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !reach.is_empty() {
            writeln!(f, "Reach: {}", reach.join(", "))?;
        }
        if let Some(address) = &self.address {
            writeln!(f, "Address: {}", address)?;
        }
        if let Some(rating) = self.rating {
            writeln!(f, "Rating: {:.1}/5", rating)?;
        }
        if let Some(delivery) = &self.delivery_time {
            writeln!(f, "Delivery: {}", delivery)?;
        }
        if let Some(minimum) = self.minimum_order {
            writeln!(f, "Minimum order: {:.2}", minimum)?;
        }
        if let Some(terms) = &self.payment_terms {
            writeln!(f, "Payment terms: {}", terms)?;
        }
        if !self.specialties.is_empty() {
            writeln!(f, "Specialties: {}", self.specialties.join(", "))?;
        }
        if !self.is_active {
            writeln!(f, "Inactive")?;
        }
        Ok(())
    }
}

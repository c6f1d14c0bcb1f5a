use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::{active_by_default, impl_entity, Collection, EntityId};

/// A dashboard account: the owner of alerts and notifications.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: EntityId,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::generate(Collection::Users),
            email: email.into(),
            name: name.into(),
            business_name: None,
            business_type: None,
            phone: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_business(
        mut self,
        business_name: impl Into<String>,
        business_type: impl Into<String>,
    ) -> Self {
        self.business_name = Some(business_name.into());
        self.business_type = Some(business_type.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

impl_entity!(User, Collection::Users, users);

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} <{}>", self.name, self.email)?;
        writeln!(f, "ID: {}", self.id)?;
        match (&self.business_name, &self.business_type) {
            (Some(name), Some(kind)) => writeln!(f, "Business: {} ({})", name, kind)?,
            (Some(name), None) => writeln!(f, "Business: {}", name)?,
            _ => {}
        }
        if let Some(phone) = &self.phone {
            writeln!(f, "Phone: {}", phone)?;
        }
        if !self.is_active {
            writeln!(f, "Inactive")?;
        }
        Ok(())
    }
}

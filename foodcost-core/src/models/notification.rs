use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::entity::{impl_entity, Collection, EntityId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    PriceAlert,
    NewSupplier,
    RecipeCost,
    System,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationType::PriceAlert => write!(f, "price_alert"),
            NotificationType::NewSupplier => write!(f, "new_supplier"),
            NotificationType::RecipeCost => write!(f, "recipe_cost"),
            NotificationType::System => write!(f, "system"),
        }
    }
}

/// An in-app message shown to a user. Nothing delivers these anywhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: EntityId,
    pub user_id: EntityId,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    /// Arbitrary payload for the consumer.
    #[serde(default)]
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: impl Into<EntityId>,
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::generate(Collection::Notifications),
            user_id: user_id.into(),
            kind,
            title: title.into(),
            message: message.into(),
            read: false,
            data: Value::Null,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

impl_entity!(Notification, Collection::Notifications, notifications);

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.read { " " } else { "*" };
        write!(f, "{} [{}] {}: {}", marker, self.kind, self.title, self.message)
    }
}

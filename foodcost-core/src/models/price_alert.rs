use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entity::{active_by_default, impl_entity, Collection, EntityId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    PriceDrop,
    PriceIncrease,
    NewSupplier,
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertType::PriceDrop => write!(f, "price_drop"),
            AlertType::PriceIncrease => write!(f, "price_increase"),
            AlertType::NewSupplier => write!(f, "new_supplier"),
        }
    }
}

impl FromStr for AlertType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "price_drop" => Ok(AlertType::PriceDrop),
            "price_increase" => Ok(AlertType::PriceIncrease),
            "new_supplier" => Ok(AlertType::NewSupplier),
            _ => Err(format!(
                "Invalid alert type '{}'. Valid options: price_drop, price_increase, new_supplier",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationMethod {
    Email,
    Sms,
    Push,
    InApp,
}

impl fmt::Display for NotificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationMethod::Email => write!(f, "email"),
            NotificationMethod::Sms => write!(f, "sms"),
            NotificationMethod::Push => write!(f, "push"),
            NotificationMethod::InApp => write!(f, "in_app"),
        }
    }
}

/// A user's standing request to be told about an ingredient's price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceAlert {
    pub id: EntityId,
    pub user_id: EntityId,
    pub ingredient_id: EntityId,
    pub alert_type: AlertType,
    /// Percentage for price changes, ignored for `new_supplier`.
    #[serde(default)]
    pub threshold: f64,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub notification_methods: Vec<NotificationMethod>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PriceAlert {
    pub fn new(
        user_id: impl Into<EntityId>,
        ingredient_id: impl Into<EntityId>,
        alert_type: AlertType,
        threshold: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::generate(Collection::PriceAlerts),
            user_id: user_id.into(),
            ingredient_id: ingredient_id.into(),
            alert_type,
            threshold,
            is_active: true,
            notification_methods: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_methods(mut self, methods: Vec<NotificationMethod>) -> Self {
        self.notification_methods = methods;
        self
    }
}

impl_entity!(PriceAlert, Collection::PriceAlerts, price_alerts);

impl fmt::Display for PriceAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.alert_type, self.ingredient_id)?;
        if self.alert_type != AlertType::NewSupplier {
            write!(f, " at {}%", self.threshold)?;
        }
        if !self.notification_methods.is_empty() {
            let methods: Vec<String> = self
                .notification_methods
                .iter()
                .map(|m| m.to_string())
                .collect();
            write!(f, " via {}", methods.join(", "))?;
        }
        if !self.is_active {
            write!(f, " (paused)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_type_json_roundtrip() {
        let json = serde_json::to_string(&AlertType::PriceIncrease).unwrap();
        assert_eq!(json, "\"price_increase\"");
        let parsed: AlertType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, AlertType::PriceIncrease);
    }

    #[test]
    fn test_alert_type_from_str() {
        assert_eq!(
            "price-drop".parse::<AlertType>().unwrap(),
            AlertType::PriceDrop
        );
        assert!("price_spike".parse::<AlertType>().is_err());
    }

    #[test]
    fn test_price_alert_display() {
        let alert = PriceAlert::new("user-1", "ingredient-2", AlertType::PriceIncrease, 10.0)
            .with_methods(vec![NotificationMethod::Email, NotificationMethod::InApp]);
        assert_eq!(
            format!("{}", alert),
            "price_increase on ingredient-2 at 10% via email, in_app"
        );

        let mut alert = PriceAlert::new("user-1", "ingredient-2", AlertType::NewSupplier, 0.0);
        alert.is_active = false;
        assert_eq!(format!("{}", alert), "new_supplier on ingredient-2 (paused)");
    }
}

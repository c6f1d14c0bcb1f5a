//! Entity identity and the shared contract of every stored record.
//!
//! Identifiers are strings of the form `<prefix>-<suffix>`. Records created
//! at runtime get a random UUID suffix (`ingredient-3f2b…`); seed records use
//! short numeric suffixes (`ingredient-1`).

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::store::{DemoState, StoreError, StoreOptions};

/// Fields a patch is never allowed to touch.
pub const IMMUTABLE_FIELDS: [&str; 3] = ["id", "created_at", "updated_at"];

/// Identifier of a single record, unique within its collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generate a new random identifier namespaced to a collection.
    pub fn generate(collection: Collection) -> Self {
        Self(format!("{}-{}", collection.id_prefix(), Uuid::new_v4()))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for EntityId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EntityId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The named collections held by the demo store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Ingredients,
    Recipes,
    Suppliers,
    PriceAlerts,
    Notifications,
    PriceRecords,
    RecipeIngredients,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Collection::Users,
        Collection::Ingredients,
        Collection::Recipes,
        Collection::Suppliers,
        Collection::PriceAlerts,
        Collection::Notifications,
        Collection::PriceRecords,
        Collection::RecipeIngredients,
    ];

    /// Returns the collection's field name in the persisted snapshot.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Ingredients => "ingredients",
            Collection::Recipes => "recipes",
            Collection::Suppliers => "suppliers",
            Collection::PriceAlerts => "price_alerts",
            Collection::Notifications => "notifications",
            Collection::PriceRecords => "price_records",
            Collection::RecipeIngredients => "recipe_ingredients",
        }
    }

    /// Returns the prefix used for identifiers of this collection.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Collection::Users => "user",
            Collection::Ingredients => "ingredient",
            Collection::Recipes => "recipe",
            Collection::Suppliers => "supplier",
            Collection::PriceAlerts => "price-alert",
            Collection::Notifications => "notification",
            Collection::PriceRecords => "price-record",
            Collection::RecipeIngredients => "recipe-ingredient",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Collection::ALL
            .into_iter()
            .find(|c| c.name() == normalized)
            .ok_or_else(|| {
                let valid: Vec<&str> = Collection::ALL.iter().map(|c| c.name()).collect();
                format!(
                    "Invalid collection '{}'. Valid options: {}",
                    s,
                    valid.join(", ")
                )
            })
    }
}

/// A record type held in one of the store's collections.
///
/// Implemented for every model through `impl_entity!`.
pub trait Entity:
    Clone + fmt::Debug + fmt::Display + PartialEq + Serialize + DeserializeOwned
{
    const COLLECTION: Collection;

    fn id(&self) -> &EntityId;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;

    /// Assigns identity and both timestamps for a newly inserted record.
    fn stamp(&mut self, id: EntityId, now: DateTime<Utc>);

    /// Refreshes `updated_at`.
    fn touch(&mut self, now: DateTime<Utc>);

    fn items(state: &DemoState) -> &Vec<Self>;
    fn items_mut(state: &mut DemoState) -> &mut Vec<Self>;

    /// Hook run on the merged record after a patch, before it is stored.
    fn after_patch(&mut self, _patch: &Patch, _options: &StoreOptions) {}
}

macro_rules! impl_entity {
    ($ty:ty, $collection:expr, $field:ident { $($extra:tt)* }) => {
        impl $crate::entity::Entity for $ty {
            const COLLECTION: $crate::entity::Collection = $collection;

            fn id(&self) -> &$crate::entity::EntityId {
                &self.id
            }

            fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> chrono::DateTime<chrono::Utc> {
                self.updated_at
            }

            fn stamp(&mut self, id: $crate::entity::EntityId, now: chrono::DateTime<chrono::Utc>) {
                self.id = id;
                self.created_at = now;
                self.updated_at = now;
            }

            fn touch(&mut self, now: chrono::DateTime<chrono::Utc>) {
                self.updated_at = now;
            }

            fn items(state: &$crate::store::DemoState) -> &Vec<Self> {
                &state.$field
            }

            fn items_mut(state: &mut $crate::store::DemoState) -> &mut Vec<Self> {
                &mut state.$field
            }

            $($extra)*
        }
    };
    ($ty:ty, $collection:expr, $field:ident) => {
        impl_entity!($ty, $collection, $field {});
    };
}

pub(crate) use impl_entity;

/// Returns a timestamp strictly later than `previous`.
///
/// Two mutations inside one clock tick still produce increasing `updated_at`.
pub(crate) fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

pub(crate) fn active_by_default() -> bool {
    true
}

/// A shallow, top-level partial update of a record.
///
/// Keys use the record's JSON field names. Each key replaces the whole field;
/// nested arrays and objects are not merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch(Map<String, Value>);

impl Patch {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style `insert`.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fails on the first key naming an immutable field.
    pub fn ensure_mutable(&self) -> Result<(), StoreError> {
        match self.keys().find(|key| IMMUTABLE_FIELDS.contains(key)) {
            Some(key) => Err(StoreError::ImmutableField(key.to_string())),
            None => Ok(()),
        }
    }

    /// Merges this patch over `record` and decodes the result.
    pub(crate) fn apply_to<E: Entity>(&self, record: &E) -> Result<E, serde_json::Error> {
        let mut value = serde_json::to_value(record)?;
        if let Value::Object(fields) = &mut value {
            for (key, patched) in &self.0 {
                fields.insert(key.clone(), patched.clone());
            }
        }
        serde_json::from_value(value)
    }
}

impl From<Map<String, Value>> for Patch {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

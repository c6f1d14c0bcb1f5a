//! The demo store: in-memory entity collections mirrored to a persistent slot.
//!
//! # Lifecycle
//!
//! One store per session. The consumer constructs it with [`DemoStore::open`],
//! which starts from seed data and hydrates from the slot, then passes it by
//! reference to whatever reads or mutates demo data.
//!
//! # Persistence
//!
//! Every mutation writes the full snapshot to the slot. Writes are best
//! effort: a failed write is logged and kept in
//! [`DemoStore::last_persist_error`], and the in-memory mutation stands.

mod error;
mod state;

pub use error::StoreError;
pub use state::DemoState;

use chrono::Utc;
use serde::de::Error as _;
use serde_json::Value;

use crate::entity::{next_timestamp, Collection, Entity, EntityId, Patch};
use crate::models::{
    Ingredient, Notification, PriceAlert, PriceRecord, Recipe, RecipeIngredient, Supplier, User,
};
use crate::seed::SeedSource;
use crate::slot::{SlotError, SnapshotSlot};

/// Default stock level at or below which an ingredient counts as low stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: f64 = 10.0;

/// Tunables of the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreOptions {
    pub low_stock_threshold: f64,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

/// Result of an update or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// A record with the id existed and was changed.
    Applied,
    /// No record with the id exists; nothing changed.
    NotFound,
}

impl Mutation {
    pub fn is_applied(&self) -> bool {
        matches!(self, Mutation::Applied)
    }
}

/// Result of reading the persistent slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    /// The persisted snapshot replaced the in-memory state.
    Restored,
    /// Nothing was persisted yet.
    Missing,
    /// The slot could not be read or parsed; the state was left as is.
    Invalid,
}

/// Runs `$body` with `$E` aliased to the model type of a collection.
macro_rules! with_entity {
    ($collection:expr, $E:ident => $body:expr) => {
        match $collection {
            Collection::Users => {
                type $E = User;
                $body
            }
            Collection::Ingredients => {
                type $E = Ingredient;
                $body
            }
            Collection::Recipes => {
                type $E = Recipe;
                $body
            }
            Collection::Suppliers => {
                type $E = Supplier;
                $body
            }
            Collection::PriceAlerts => {
                type $E = PriceAlert;
                $body
            }
            Collection::Notifications => {
                type $E = Notification;
                $body
            }
            Collection::PriceRecords => {
                type $E = PriceRecord;
                $body
            }
            Collection::RecipeIngredients => {
                type $E = RecipeIngredient;
                $body
            }
        }
    };
}

pub struct DemoStore {
    state: DemoState,
    slot: Box<dyn SnapshotSlot>,
    seed: Box<dyn SeedSource>,
    options: StoreOptions,
    last_persist_error: Option<SlotError>,
}

impl DemoStore {
    /// Creates the session's store: seed state, then hydration from `slot`.
    ///
    /// When the slot is empty the seed snapshot is written to it. A slot that
    /// fails to parse is left alone until the next mutation overwrites it.
    pub fn open(
        slot: impl SnapshotSlot + 'static,
        seed: impl SeedSource + 'static,
        options: StoreOptions,
    ) -> Self {
        let state = seed.seed();
        let mut store = Self {
            state,
            slot: Box::new(slot),
            seed: Box::new(seed),
            options,
            last_persist_error: None,
        };

        if store.hydrate() == Hydration::Missing {
            store.persist();
        }

        store
    }

    /// Replaces the in-memory state with the persisted snapshot, if any.
    ///
    /// Never fails: problems are logged and reported as [`Hydration::Invalid`].
    pub fn hydrate(&mut self) -> Hydration {
        let contents = match self.slot.read() {
            Ok(Some(contents)) => contents,
            Ok(None) => {
                tracing::info!(
                    "No snapshot found under '{}', starting from seed data",
                    self.slot.key()
                );
                return Hydration::Missing;
            }
            Err(e) => {
                tracing::warn!("Failed to read snapshot '{}': {}", self.slot.key(), e);
                return Hydration::Invalid;
            }
        };

        match serde_json::from_str::<DemoState>(&contents) {
            Ok(state) => {
                self.state = state;
                tracing::info!(
                    "Restored {} record(s) from '{}'",
                    self.state.len(),
                    self.slot.key()
                );
                Hydration::Restored
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse snapshot '{}', keeping seed data: {}",
                    self.slot.key(),
                    e
                );
                Hydration::Invalid
            }
        }
    }

    /// The current full state.
    pub fn snapshot(&self) -> &DemoState {
        &self.state
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// The failure of the most recent slot write, `None` once a write succeeds.
    pub fn last_persist_error(&self) -> Option<&SlotError> {
        self.last_persist_error.as_ref()
    }

    /// All records of one type, in insertion order.
    pub fn list<E: Entity>(&self) -> &[E] {
        E::items(&self.state)
    }

    pub fn get<E: Entity>(&self, id: &str) -> Option<&E> {
        E::items(&self.state).iter().find(|e| e.id() == id)
    }

    /// Appends `entity` under a fresh id and returns that id.
    ///
    /// Whatever id and timestamps `entity` carries are replaced. A record
    /// that would not survive a save and reload (a NaN or infinite number)
    /// is rejected and the state is untouched.
    pub fn add<E: Entity>(&mut self, mut entity: E) -> Result<EntityId, StoreError> {
        let id = self.fresh_id::<E>();
        entity.stamp(id.clone(), Utc::now());
        ensure_persistable(&entity)?;

        E::items_mut(&mut self.state).push(entity);
        tracing::debug!("Added {} to {}", id, E::COLLECTION);
        self.persist();
        Ok(id)
    }

    /// Shallow-merges `patch` into the record with `id`.
    ///
    /// A missing id is not an error: the state is untouched and
    /// [`Mutation::NotFound`] is returned.
    pub fn update<E: Entity>(&mut self, id: &str, patch: &Patch) -> Result<Mutation, StoreError> {
        patch.ensure_mutable()?;

        let options = self.options;
        let Some(existing) = E::items_mut(&mut self.state)
            .iter_mut()
            .find(|e| e.id() == id)
        else {
            tracing::debug!("No {} record '{}' to update", E::COLLECTION, id);
            return Ok(Mutation::NotFound);
        };

        let merged = merge(existing, patch, &options).map_err(|source| StoreError::InvalidPatch {
            collection: E::COLLECTION,
            id: id.to_string(),
            source,
        })?;
        ensure_persistable(&merged)?;
        *existing = merged;

        if E::COLLECTION == Collection::Users {
            self.sync_current_user();
        }

        tracing::debug!("Updated {} in {}", id, E::COLLECTION);
        self.persist();
        Ok(Mutation::Applied)
    }

    /// Removes the record with `id`. Deleting twice is the same as once.
    ///
    /// Deleting the current user's entry from `users` leaves
    /// `current_user` in place.
    pub fn delete<E: Entity>(&mut self, id: &str) -> Mutation {
        let items = E::items_mut(&mut self.state);
        let before = items.len();
        items.retain(|e| e.id() != id);

        let outcome = if items.len() < before {
            tracing::debug!("Deleted {} from {}", id, E::COLLECTION);
            Mutation::Applied
        } else {
            tracing::debug!("No {} record '{}' to delete", E::COLLECTION, id);
            Mutation::NotFound
        };

        self.persist();
        outcome
    }

    /// Shallow-merges `patch` into the current user.
    ///
    /// The matching entry of `users`, if any, receives the same record.
    /// Updating that entry through [`update`](Self::update) flows back the
    /// other way.
    pub fn update_current_user(&mut self, patch: &Patch) -> Result<(), StoreError> {
        patch.ensure_mutable()?;

        let options = self.options;
        let user = &self.state.current_user;
        let merged = merge(user, patch, &options).map_err(|source| StoreError::InvalidPatch {
            collection: Collection::Users,
            id: user.id.to_string(),
            source,
        })?;
        ensure_persistable(&merged)?;

        if let Some(listed) = self.state.users.iter_mut().find(|u| u.id == merged.id) {
            *listed = merged.clone();
        }
        self.state.current_user = merged;

        self.persist();
        Ok(())
    }

    /// Discards all data and starts over from a fresh seed snapshot.
    pub fn reset(&mut self) {
        self.state = self.seed.seed();

        if let Err(e) = self.slot.clear() {
            tracing::warn!("Failed to clear snapshot '{}': {}", self.slot.key(), e);
        }

        tracing::info!("Reset demo data to seed ({} record(s))", self.state.len());
        self.persist();
    }

    /// [`add`](Self::add) for a collection chosen at runtime.
    ///
    /// `data` is a JSON object with the record's fields; `id`, `created_at`
    /// and `updated_at` are assigned by the store. Optional fields may be
    /// omitted.
    pub fn add_value(&mut self, collection: Collection, data: Value) -> Result<EntityId, StoreError> {
        with_entity!(collection, E => {
            let entity: E = draft(collection, data)?;
            self.add(entity)
        })
    }

    /// [`update`](Self::update) for a collection chosen at runtime.
    pub fn update_value(
        &mut self,
        collection: Collection,
        id: &str,
        patch: &Patch,
    ) -> Result<Mutation, StoreError> {
        with_entity!(collection, E => self.update::<E>(id, patch))
    }

    /// [`delete`](Self::delete) for a collection chosen at runtime.
    pub fn delete_value(&mut self, collection: Collection, id: &str) -> Mutation {
        with_entity!(collection, E => self.delete::<E>(id))
    }

    /// The records of a collection as a JSON array.
    pub fn list_value(&self, collection: Collection) -> Result<Value, StoreError> {
        with_entity!(collection, E => Ok(serde_json::to_value(self.list::<E>())?))
    }

    /// One record as JSON, or `None` if the id is unknown.
    pub fn get_value(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError> {
        with_entity!(collection, E => match self.get::<E>(id) {
            Some(entity) => Ok(Some(serde_json::to_value(entity)?)),
            None => Ok(None),
        })
    }

    /// Human-readable rendering of one record, or `None` if the id is unknown.
    pub fn describe(&self, collection: Collection, id: &str) -> Option<String> {
        with_entity!(collection, E => self.get::<E>(id).map(|entity| entity.to_string()))
    }

    /// Copies the `users` entry of the current user into `current_user`.
    fn sync_current_user(&mut self) {
        let current = &self.state.current_user;
        if let Some(listed) = self.state.users.iter().find(|u| u.id == current.id) {
            self.state.current_user = listed.clone();
        }
    }

    fn fresh_id<E: Entity>(&self) -> EntityId {
        loop {
            let id = EntityId::generate(E::COLLECTION);
            if !E::items(&self.state).iter().any(|e| e.id() == &id) {
                return id;
            }
        }
    }

    fn persist(&mut self) {
        let contents = match serde_json::to_string_pretty(&self.state) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Failed to serialize demo state: {}", e);
                return;
            }
        };

        match self.slot.write(&contents) {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                tracing::warn!("Failed to persist snapshot '{}': {}", self.slot.key(), e);
                self.last_persist_error = Some(e);
            }
        }
    }
}

/// Patched copy of `record` with derived fields and `updated_at` refreshed.
fn merge<E: Entity>(record: &E, patch: &Patch, options: &StoreOptions) -> Result<E, serde_json::Error> {
    let mut merged = patch.apply_to(record)?;
    merged.after_patch(patch, options);
    merged.touch(next_timestamp(record.updated_at()));
    Ok(merged)
}

/// Fails unless `record` reads back from JSON exactly as it is.
///
/// JSON has no NaN or infinity; serde_json writes them as `null`, which
/// would make the whole snapshot unreadable on the next start.
fn ensure_persistable<E: Entity>(record: &E) -> Result<(), StoreError> {
    let value = serde_json::to_value(record)?;
    match serde_json::from_value::<E>(value) {
        Ok(restored) if restored == *record => Ok(()),
        _ => Err(StoreError::NotPersistable {
            collection: E::COLLECTION,
            id: record.id().to_string(),
        }),
    }
}

/// Decodes a record payload that has no id or timestamps yet.
fn draft<E: Entity>(collection: Collection, data: Value) -> Result<E, StoreError> {
    let Value::Object(mut fields) = data else {
        return Err(StoreError::InvalidEntity {
            collection,
            source: serde_json::Error::custom("expected a JSON object"),
        });
    };

    // Placeholders, replaced by `add`
    let now = Value::String(Utc::now().to_rfc3339());
    fields.insert("id".to_string(), Value::String(String::new()));
    fields.insert("created_at".to_string(), now.clone());
    fields.insert("updated_at".to_string(), now);

    serde_json::from_value(Value::Object(fields))
        .map_err(|source| StoreError::InvalidEntity { collection, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IngredientCategory, IngredientStatus, NotificationType};
    use crate::seed::DemoSeed;
    use crate::slot::{FileSlot, MemorySlot};
    use serde_json::json;
    use tempfile::TempDir;

    fn test_store() -> (DemoStore, MemorySlot) {
        let slot = MemorySlot::new();
        let store = DemoStore::open(slot.clone(), DemoSeed, StoreOptions::default());
        (store, slot)
    }

    fn persisted(slot: &MemorySlot) -> DemoState {
        serde_json::from_str(&slot.contents().unwrap()).unwrap()
    }

    #[test]
    fn test_open_empty_slot_uses_seed_and_persists_it() {
        let (store, slot) = test_store();

        assert_eq!(store.snapshot(), &DemoSeed.seed());
        assert_eq!(persisted(&slot), DemoSeed.seed());
        assert!(store.last_persist_error().is_none());
    }

    #[test]
    fn test_add_appends_with_fresh_id() {
        let (mut store, slot) = test_store();
        let before = store.list::<Ingredient>().len();

        let onion = Ingredient::new("Onion", IngredientCategory::Vegetables, "kg");
        let original_id = onion.id.clone();
        let id = store.add(onion).unwrap();

        let ingredients = store.list::<Ingredient>();
        assert_eq!(ingredients.len(), before + 1);
        assert_eq!(ingredients.last().unwrap().id, id);
        assert_ne!(id, original_id);
        assert!(id.as_str().starts_with("ingredient-"));
        assert_eq!(
            ingredients.iter().filter(|i| i.id == id).count(),
            1,
            "id must not collide"
        );
        assert_eq!(persisted(&slot).ingredients.len(), before + 1);
    }

    #[test]
    fn test_add_value_onion_defaults_to_available() {
        let (mut store, _slot) = test_store();
        let before = store.snapshot().ingredients.len();

        let id = store
            .add_value(
                Collection::Ingredients,
                json!({
                    "name": "Onion",
                    "unit": "kg",
                    "category": "vegetables",
                    "current_price": 0
                }),
            )
            .unwrap();

        assert!(id.as_str().starts_with("ingredient-"));
        assert_eq!(store.snapshot().ingredients.len(), before + 1);

        let onion = store.get::<Ingredient>(id.as_str()).unwrap();
        assert_eq!(onion.name, "Onion");
        assert_eq!(onion.status, IngredientStatus::Available);
        assert_eq!(onion.created_at, onion.updated_at);
    }

    #[test]
    fn test_add_value_ignores_caller_id() {
        let (mut store, _slot) = test_store();

        let id = store
            .add_value(
                Collection::Suppliers,
                json!({ "id": "supplier-1", "name": "Impostor" }),
            )
            .unwrap();

        assert_ne!(id, "supplier-1");
        assert_eq!(store.get::<Supplier>("supplier-1").unwrap().name, "Green Valley Farms");
    }

    #[test]
    fn test_add_value_rejects_invalid_payload() {
        let (mut store, _slot) = test_store();
        let before = store.snapshot().clone();

        let missing_name = store.add_value(Collection::Ingredients, json!({ "unit": "kg" }));
        assert!(matches!(
            missing_name,
            Err(StoreError::InvalidEntity {
                collection: Collection::Ingredients,
                ..
            })
        ));

        let not_object = store.add_value(Collection::Recipes, json!(["Soup"]));
        assert!(matches!(not_object, Err(StoreError::InvalidEntity { .. })));

        assert_eq!(store.snapshot(), &before);
    }

    #[test]
    fn test_update_merges_shallowly() {
        let (mut store, slot) = test_store();
        let before = store.get::<Ingredient>("ingredient-3").unwrap().clone();

        let patch = Patch::new()
            .set("name", "Olive Oil")
            .set("suppliers", vec!["supplier-9"]);
        let outcome = store.update::<Ingredient>("ingredient-3", &patch).unwrap();

        assert_eq!(outcome, Mutation::Applied);
        let after = store.get::<Ingredient>("ingredient-3").unwrap();
        assert_eq!(after.name, "Olive Oil");
        assert_eq!(after.suppliers, vec![EntityId::new("supplier-9")]);
        assert_eq!(after.price_history, before.price_history);
        assert_eq!(after.current_price, before.current_price);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);

        let saved = persisted(&slot);
        assert_eq!(saved.ingredients[2].name, "Olive Oil");
    }

    #[test]
    fn test_update_twice_keeps_updated_at_increasing() {
        let (mut store, _slot) = test_store();
        let patch = Patch::new().set("read", true);

        store.update::<Notification>("notification-2", &patch).unwrap();
        let first = store.get::<Notification>("notification-2").unwrap().updated_at;
        store.update::<Notification>("notification-2", &patch).unwrap();
        let second = store.get::<Notification>("notification-2").unwrap().updated_at;

        assert!(second > first);
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let (mut store, slot) = test_store();
        let before = store.snapshot().clone();
        let saved_before = slot.contents();

        let outcome = store
            .update::<Ingredient>("nonexistent-id", &Patch::new().set("name", "X"))
            .unwrap();

        assert_eq!(outcome, Mutation::NotFound);
        assert_eq!(store.snapshot(), &before);
        assert_eq!(slot.contents(), saved_before);
    }

    #[test]
    fn test_update_rejects_immutable_fields() {
        let (mut store, _slot) = test_store();
        let before = store.snapshot().clone();

        let result = store.update::<Recipe>("recipe-1", &Patch::new().set("id", "recipe-99"));

        assert!(matches!(result, Err(StoreError::ImmutableField(field)) if field == "id"));
        assert_eq!(store.snapshot(), &before);
    }

    #[test]
    fn test_update_rejects_invalid_merge() {
        let (mut store, _slot) = test_store();
        let before = store.snapshot().clone();

        let result = store.update::<Ingredient>(
            "ingredient-1",
            &Patch::new().set("category", "candy"),
        );

        assert!(matches!(
            result,
            Err(StoreError::InvalidPatch { collection: Collection::Ingredients, ref id, .. })
                if id == "ingredient-1"
        ));
        assert_eq!(store.snapshot(), &before);
    }

    #[test]
    fn test_update_stock_level_derives_status() {
        let (mut store, _slot) = test_store();

        store
            .update::<Ingredient>("ingredient-1", &Patch::new().set("stock_level", 0.0))
            .unwrap();
        assert_eq!(
            store.get::<Ingredient>("ingredient-1").unwrap().status,
            IngredientStatus::OutOfStock
        );

        store
            .update::<Ingredient>("ingredient-1", &Patch::new().set("stock_level", 4.0))
            .unwrap();
        assert_eq!(
            store.get::<Ingredient>("ingredient-1").unwrap().status,
            IngredientStatus::LowStock
        );

        store
            .update::<Ingredient>("ingredient-1", &Patch::new().set("stock_level", Value::Null))
            .unwrap();
        assert_eq!(
            store.get::<Ingredient>("ingredient-1").unwrap().status,
            IngredientStatus::Available
        );
    }

    #[test]
    fn test_update_explicit_status_overrides_derivation() {
        let (mut store, _slot) = test_store();

        let patch = Patch::new()
            .set("stock_level", 0.0)
            .set("status", "available");
        store.update::<Ingredient>("ingredient-4", &patch).unwrap();

        let rice = store.get::<Ingredient>("ingredient-4").unwrap();
        assert_eq!(rice.stock_level, Some(0.0));
        assert_eq!(rice.status, IngredientStatus::Available);
    }

    #[test]
    fn test_low_stock_threshold_option() {
        let options = StoreOptions {
            low_stock_threshold: 50.0,
        };
        let mut store = DemoStore::open(MemorySlot::new(), DemoSeed, options);

        store
            .update::<Ingredient>("ingredient-4", &Patch::new().set("stock_level", 40.0))
            .unwrap();

        assert_eq!(
            store.get::<Ingredient>("ingredient-4").unwrap().status,
            IngredientStatus::LowStock
        );
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (mut store, slot) = test_store();
        let before = store.list::<Supplier>().len();

        assert_eq!(store.delete::<Supplier>("supplier-2"), Mutation::Applied);
        let after_first = store.snapshot().clone();
        assert_eq!(store.delete::<Supplier>("supplier-2"), Mutation::NotFound);

        assert_eq!(store.snapshot(), &after_first);
        assert_eq!(store.list::<Supplier>().len(), before - 1);
        assert!(store.get::<Supplier>("supplier-2").is_none());
        assert_eq!(persisted(&slot).suppliers.len(), before - 1);
    }

    #[test]
    fn test_delete_keeps_dangling_references() {
        let (mut store, _slot) = test_store();

        store.delete::<Ingredient>("ingredient-1");

        assert!(store
            .list::<PriceRecord>()
            .iter()
            .any(|r| r.ingredient_id == "ingredient-1"));
    }

    #[test]
    fn test_deleted_id_is_not_reused() {
        let (mut store, _slot) = test_store();
        let id = store.add(Supplier::new("Temp")).unwrap();
        store.delete::<Supplier>(id.as_str());

        let next = store.add(Supplier::new("Temp")).unwrap();
        assert_ne!(id, next);
    }

    #[test]
    fn test_reset_restores_seed_and_purges_slot() {
        let (mut store, slot) = test_store();
        let id = store.add(Supplier::new("Pop-up Market")).unwrap();
        store
            .update::<Recipe>("recipe-1", &Patch::new().set("servings", 10))
            .unwrap();
        store.delete::<Ingredient>("ingredient-2");

        store.reset();

        assert_eq!(store.snapshot(), &DemoSeed.seed());
        let saved = slot.contents().unwrap();
        assert!(!saved.contains(id.as_str()));
        assert!(!saved.contains("Pop-up Market"));
        assert_eq!(persisted(&slot), DemoSeed.seed());
    }

    #[test]
    fn test_reset_is_isolated_from_earlier_snapshots() {
        let (mut store, _slot) = test_store();

        let mut copy = store.snapshot().clone();
        copy.ingredients[0].suppliers.clear();
        copy.recipes[0].ingredients.clear();

        store
            .update::<Recipe>("recipe-1", &Patch::new().set("ingredients", json!([])))
            .unwrap();
        store.reset();

        assert_eq!(store.snapshot(), &DemoSeed.seed());
        assert!(!store.list::<Recipe>()[0].ingredients.is_empty());
    }

    #[test]
    fn test_restart_restores_state() {
        let (mut store, slot) = test_store();
        store
            .add(Ingredient::new("Garlic", IngredientCategory::Vegetables, "kg").with_price(6.25))
            .unwrap();
        store
            .update::<Supplier>("supplier-1", &Patch::new().set("rating", 3.9))
            .unwrap();
        store.delete::<Notification>("notification-1");
        let expected = store.snapshot().clone();

        let restarted = DemoStore::open(slot.clone(), DemoSeed, StoreOptions::default());

        assert_eq!(restarted.snapshot(), &expected);
    }

    #[test]
    fn test_add_rejects_non_finite_numbers() {
        let (mut store, slot) = test_store();
        let keep = store.add(Supplier::new("Keep me")).unwrap();
        let before = store.snapshot().clone();
        let saved = slot.contents();

        let ghost = Ingredient::new("Ghost", IngredientCategory::Other, "kg");
        let nan_price = ghost.clone().with_price(f64::NAN);
        let infinite_stock = ghost.with_stock_level(f64::INFINITY);
        let nan_rating = Supplier::new("Ghost").with_rating(f64::NAN);

        for result in [
            store.add(nan_price),
            store.add(infinite_stock),
            store.add(nan_rating),
        ] {
            assert!(matches!(result, Err(StoreError::NotPersistable { .. })));
        }
        assert_eq!(store.snapshot(), &before);
        assert_eq!(slot.contents(), saved);

        let restarted = DemoStore::open(slot.clone(), DemoSeed, StoreOptions::default());
        assert_eq!(restarted.snapshot(), &before);
        assert!(restarted.get::<Supplier>(keep.as_str()).is_some());
    }

    #[test]
    fn test_update_rejects_non_finite_price() {
        let (mut store, _slot) = test_store();
        let before = store.snapshot().clone();

        let result = store.update::<Ingredient>(
            "ingredient-1",
            &Patch::new().set("current_price", f64::NAN),
        );

        assert!(result.is_err());
        assert_eq!(store.snapshot(), &before);
    }

    #[test]
    fn test_update_users_entry_syncs_current_user() {
        let (mut store, slot) = test_store();

        store
            .update::<User>("user-1", &Patch::new().set("business_name", "Renamed"))
            .unwrap();

        let state = store.snapshot();
        assert_eq!(state.current_user.business_name.as_deref(), Some("Renamed"));
        assert_eq!(state.users[0], state.current_user);
        assert_eq!(persisted(&slot).current_user, state.current_user);
    }

    #[test]
    fn test_update_other_user_keeps_current_user() {
        let (mut store, _slot) = test_store();
        let current = store.snapshot().current_user.clone();
        let id = store.add(User::new("sous@example.com", "Sous Chef")).unwrap();

        store
            .update::<User>(id.as_str(), &Patch::new().set("name", "Head Chef"))
            .unwrap();

        assert_eq!(store.snapshot().current_user, current);
    }

    #[test]
    fn test_delete_current_user_entry_keeps_current_user() {
        let (mut store, _slot) = test_store();
        let current = store.snapshot().current_user.clone();

        assert_eq!(store.delete::<User>("user-1"), Mutation::Applied);

        assert!(store.list::<User>().is_empty());
        assert_eq!(store.snapshot().current_user, current);
    }

    #[test]
    fn test_hydrate_replaces_state_wholesale() {
        let (mut store, slot) = test_store();
        let mut other = DemoSeed.seed();
        other.ingredients.truncate(1);
        slot.write(&serde_json::to_string(&other).unwrap()).unwrap();

        assert_eq!(store.hydrate(), Hydration::Restored);
        assert_eq!(store.snapshot(), &other);
    }

    #[test]
    fn test_corrupt_slot_falls_back_to_seed() {
        let slot = MemorySlot::new();
        slot.write("{ not json").unwrap();

        let store = DemoStore::open(slot.clone(), DemoSeed, StoreOptions::default());

        assert_eq!(store.snapshot(), &DemoSeed.seed());
        // Left alone until the next mutation
        assert_eq!(slot.contents().as_deref(), Some("{ not json"));
    }

    #[test]
    fn test_write_failure_keeps_mutation() {
        let (_store, slot) = test_store();
        let saved = slot.contents().unwrap();

        // Limit the quota to the current size so any growth fails
        let full = slot.clone().with_quota(saved.len());
        let mut store = DemoStore::open(full, DemoSeed, StoreOptions::default());
        let id = store.add(Supplier::new("Overflow Foods")).unwrap();

        assert!(store.get::<Supplier>(id.as_str()).is_some());
        assert!(matches!(
            store.last_persist_error(),
            Some(SlotError::QuotaExceeded { .. })
        ));
        assert_eq!(slot.contents().unwrap(), saved);

        // Shrinking back fits again and clears the error
        store.delete::<Supplier>(id.as_str());
        assert!(store.last_persist_error().is_none());
        assert_eq!(slot.contents().unwrap(), saved);
    }

    #[test]
    fn test_update_current_user_syncs_users_list() {
        let (mut store, _slot) = test_store();
        let created = store.snapshot().current_user.created_at;

        store
            .update_current_user(&Patch::new().set("business_name", "Bistro Nuevo"))
            .unwrap();

        let state = store.snapshot();
        assert_eq!(state.current_user.business_name.as_deref(), Some("Bistro Nuevo"));
        assert_eq!(state.current_user.created_at, created);
        assert_eq!(state.users[0], state.current_user);
    }

    #[test]
    fn test_dynamic_operations() {
        let (mut store, _slot) = test_store();

        let list = store.list_value(Collection::PriceAlerts).unwrap();
        assert_eq!(list.as_array().unwrap().len(), 2);

        let outcome = store
            .update_value(
                Collection::Notifications,
                "notification-3",
                &Patch::new().set("read", true),
            )
            .unwrap();
        assert!(outcome.is_applied());
        let value = store
            .get_value(Collection::Notifications, "notification-3")
            .unwrap()
            .unwrap();
        assert_eq!(value["read"], true);

        assert_eq!(
            store.delete_value(Collection::PriceRecords, "price-record-1"),
            Mutation::Applied
        );
        assert!(store
            .get_value(Collection::PriceRecords, "price-record-1")
            .unwrap()
            .is_none());

        let text = store.describe(Collection::Recipes, "recipe-2").unwrap();
        assert!(text.contains("Chicken & Rice Bowl"));
    }

    #[test]
    fn test_add_value_notification_type_field() {
        let (mut store, _slot) = test_store();

        let id = store
            .add_value(
                Collection::Notifications,
                json!({
                    "user_id": "user-1",
                    "type": "recipe_cost",
                    "title": "Caprese cost up",
                    "message": "Cost per serving rose to 3.10"
                }),
            )
            .unwrap();

        let notification = store.get::<Notification>(id.as_str()).unwrap();
        assert_eq!(notification.kind, NotificationType::RecipeCost);
        assert!(!notification.read);
    }

    #[test]
    fn test_file_slot_restart() {
        let temp_dir = TempDir::new().unwrap();
        let slot = FileSlot::in_dir(temp_dir.path());

        let mut store = DemoStore::open(slot.clone(), DemoSeed, StoreOptions::default());
        let id = store.add(Recipe::new("Minestrone", "soups").with_servings(6)).unwrap();
        let expected = store.snapshot().clone();
        drop(store);

        let restarted = DemoStore::open(slot, DemoSeed, StoreOptions::default());
        assert_eq!(restarted.snapshot(), &expected);
        assert_eq!(restarted.get::<Recipe>(id.as_str()).unwrap().servings, 6);
    }
}

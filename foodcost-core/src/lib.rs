//! Food Cost Core Library
//!
//! Demo data store for food-cost tracking: entity models, canonical seed
//! data, and a store that mirrors every change to a persistent slot.

pub mod entity;
pub mod models;
pub mod seed;
pub mod slot;
pub mod store;

pub use entity::{Collection, Entity, EntityId, Patch};
pub use models::{
    AlertType, Ingredient, IngredientCategory, IngredientStatus, Notification, NotificationMethod,
    NotificationType, PriceAlert, PricePoint, PriceRecord, PriceSource, Recipe, RecipeIngredient,
    Supplier, User,
};
pub use seed::{DemoSeed, SeedSource};
pub use slot::{FileSlot, MemorySlot, SlotError, SnapshotSlot, SNAPSHOT_KEY};
pub use store::{
    DemoState, DemoStore, Hydration, Mutation, StoreError, StoreOptions,
    DEFAULT_LOW_STOCK_THRESHOLD,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! Canonical demo data.
//!
//! Seed records use fixed ids (`<prefix>-<n>`) and fixed timestamps, so two
//! seeds always compare equal.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use crate::entity::{Entity, EntityId};
use crate::models::{
    AlertType, Ingredient, IngredientCategory, IngredientStatus, Notification, NotificationMethod,
    NotificationType, PriceAlert, PricePoint, PriceRecord, PriceSource, Recipe, RecipeIngredient,
    Supplier, User,
};
use crate::store::DemoState;

/// 2024-01-15T09:00:00Z
const SEED_EPOCH_SECS: i64 = 1_705_309_200;

/// Supplies the initial records of a fresh or reset store.
pub trait SeedSource {
    /// Returns a new, independently owned snapshot on every call.
    fn seed(&self) -> DemoState;
}

impl<F: Fn() -> DemoState> SeedSource for F {
    fn seed(&self) -> DemoState {
        self()
    }
}

/// The built-in demo restaurant.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoSeed;

impl SeedSource for DemoSeed {
    fn seed(&self) -> DemoState {
        let current_user = fixed(
            User::new("demo@foodcost.example", "Demo Chef")
                .with_business("Bistro Demo", "restaurant")
                .with_phone("+1 555 0100"),
            "user-1",
            0,
        );

        let mut state = DemoState::empty(current_user.clone());
        state.users = vec![current_user];
        state.suppliers = suppliers();
        state.ingredients = ingredients();
        state.recipe_ingredients = recipe_lines();
        state.recipes = recipes(&state.recipe_ingredients);
        state.price_records = price_records();
        state.price_alerts = price_alerts();
        state.notifications = notifications();
        state
    }
}

fn at(hours: i64) -> DateTime<Utc> {
    DateTime::<Utc>::default() + Duration::seconds(SEED_EPOCH_SECS) + Duration::hours(hours)
}

fn fixed<E: Entity>(mut entity: E, id: &str, hours: i64) -> E {
    entity.stamp(EntityId::new(id), at(hours));
    entity
}

fn ids(raw: &[&str]) -> Vec<EntityId> {
    raw.iter().map(|id| EntityId::new(*id)).collect()
}

fn history(prices: &[f64], supplier: &str) -> Vec<PricePoint> {
    let weeks = prices.len() as i64;
    prices
        .iter()
        .enumerate()
        .map(|(i, price)| {
            PricePoint::new(*price, at(-24 * 7 * (weeks - 1 - i as i64))).from_supplier(supplier)
        })
        .collect()
}

fn suppliers() -> Vec<Supplier> {
    vec![
        fixed(
            Supplier::new("Green Valley Farms")
                .with_contact("Maria Lopez", "+1 555 0101", "orders@greenvalley.example")
                .with_address("12 Orchard Lane, Springfield")
                .with_rating(4.6)
                .with_terms("1-2 days", 150.0, "Net 30")
                .with_specialties(vec!["vegetables".into(), "herbs".into()]),
            "supplier-1",
            0,
        ),
        fixed(
            Supplier::new("Prime Meats Co.")
                .with_contact("Tom Becker", "+1 555 0102", "sales@primemeats.example")
                .with_address("400 Industrial Way, Springfield")
                .with_rating(4.3)
                .with_terms("Next day", 250.0, "Net 15")
                .with_specialties(vec!["meat".into(), "poultry".into()]),
            "supplier-2",
            1,
        ),
        fixed(
            Supplier::new("Mediterranean Imports")
                .with_contact("Giulia Rossi", "+1 555 0103", "info@medimports.example")
                .with_address("8 Harbor Street, Port Town")
                .with_rating(4.8)
                .with_terms("3-5 days", 300.0, "Net 45")
                .with_specialties(vec!["oils".into(), "grains".into(), "cheese".into()]),
            "supplier-3",
            2,
        ),
    ]
}

fn ingredients() -> Vec<Ingredient> {
    vec![
        fixed(
            Ingredient::new("Roma Tomatoes", IngredientCategory::Vegetables, "kg")
                .with_description("Vine-ripened plum tomatoes")
                .with_price(3.2)
                .with_price_history(history(&[2.8, 3.0, 3.2], "supplier-1"))
                .with_suppliers(ids(&["supplier-1"]))
                .with_stock_level(25.0),
            "ingredient-1",
            3,
        ),
        fixed(
            Ingredient::new("Chicken Breast", IngredientCategory::Meat, "kg")
                .with_description("Boneless, skinless")
                .with_price(8.9)
                .with_price_history(history(&[9.4, 8.9], "supplier-2"))
                .with_suppliers(ids(&["supplier-2"]))
                .with_stock_level(8.0)
                .with_status(IngredientStatus::LowStock),
            "ingredient-2",
            4,
        ),
        fixed(
            Ingredient::new("Extra Virgin Olive Oil", IngredientCategory::Oils, "l")
                .with_price(12.5)
                .with_price_history(history(&[11.8, 12.5], "supplier-3"))
                .with_suppliers(ids(&["supplier-3"]))
                .with_stock_level(15.0),
            "ingredient-3",
            5,
        ),
        fixed(
            Ingredient::new("Basmati Rice", IngredientCategory::Grains, "kg")
                .with_price(2.4)
                .with_price_history(history(&[2.4], "supplier-3"))
                .with_suppliers(ids(&["supplier-3"]))
                .with_stock_level(40.0),
            "ingredient-4",
            6,
        ),
        fixed(
            Ingredient::new("Fresh Mozzarella", IngredientCategory::Dairy, "kg")
                .with_price(14.0)
                .with_price_history(history(&[13.5, 14.0], "supplier-3"))
                .with_suppliers(ids(&["supplier-3"]))
                .with_stock_level(0.0)
                .with_status(IngredientStatus::OutOfStock),
            "ingredient-5",
            7,
        ),
        fixed(
            Ingredient::new("Fresh Basil", IngredientCategory::Spices, "bunch")
                .with_price(1.8)
                .with_suppliers(ids(&["supplier-1"]))
                .with_stock_level(12.0),
            "ingredient-6",
            8,
        ),
    ]
}

fn recipe_lines() -> Vec<RecipeIngredient> {
    let lines = [
        ("recipe-1", "ingredient-1", 0.6, "kg"),
        ("recipe-1", "ingredient-5", 0.5, "kg"),
        ("recipe-1", "ingredient-6", 1.0, "bunch"),
        ("recipe-1", "ingredient-3", 0.05, "l"),
        ("recipe-2", "ingredient-2", 0.4, "kg"),
        ("recipe-2", "ingredient-4", 0.3, "kg"),
        ("recipe-2", "ingredient-3", 0.02, "l"),
        ("recipe-2", "ingredient-1", 0.2, "kg"),
    ];
    lines
        .iter()
        .enumerate()
        .map(|(i, (recipe, ingredient, quantity, unit))| {
            fixed(
                RecipeIngredient::new(*recipe, *ingredient, *quantity, *unit),
                &format!("recipe-ingredient-{}", i + 1),
                10,
            )
        })
        .collect()
}

fn recipes(lines: &[RecipeIngredient]) -> Vec<Recipe> {
    let lines_of = |recipe: &str| -> Vec<RecipeIngredient> {
        lines
            .iter()
            .filter(|line| line.recipe_id == recipe)
            .cloned()
            .collect()
    };

    vec![
        fixed(
            Recipe::new("Caprese Salad", "salads")
                .with_description("Tomatoes, mozzarella and basil with olive oil")
                .with_servings(4)
                .with_ingredients(lines_of("recipe-1"))
                .with_cost_per_serving(2.84),
            "recipe-1",
            10,
        ),
        fixed(
            Recipe::new("Chicken & Rice Bowl", "mains")
                .with_description("Seared chicken over basmati with roast tomatoes")
                .with_servings(2)
                .with_ingredients(lines_of("recipe-2"))
                .with_cost_per_serving(2.59),
            "recipe-2",
            11,
        ),
    ]
}

fn price_records() -> Vec<PriceRecord> {
    vec![
        fixed(
            PriceRecord::new("ingredient-1", "supplier-1", 3.2, "kg").with_quality_grade("A"),
            "price-record-1",
            12,
        ),
        fixed(
            PriceRecord::new("ingredient-2", "supplier-2", 8.9, "kg")
                .with_source(PriceSource::Scraping),
            "price-record-2",
            13,
        ),
        fixed(
            PriceRecord::new("ingredient-3", "supplier-3", 12.5, "l").with_source(PriceSource::Api),
            "price-record-3",
            14,
        ),
        fixed(
            PriceRecord::new("ingredient-5", "supplier-3", 14.0, "kg")
                .with_source(PriceSource::Ocr)
                .with_quality_grade("B"),
            "price-record-4",
            15,
        ),
    ]
}

fn price_alerts() -> Vec<PriceAlert> {
    vec![
        fixed(
            PriceAlert::new("user-1", "ingredient-1", AlertType::PriceIncrease, 10.0)
                .with_methods(vec![NotificationMethod::Email, NotificationMethod::InApp]),
            "price-alert-1",
            16,
        ),
        fixed(
            PriceAlert::new("user-1", "ingredient-2", AlertType::PriceDrop, 5.0)
                .with_methods(vec![NotificationMethod::Push]),
            "price-alert-2",
            17,
        ),
    ]
}

fn notifications() -> Vec<Notification> {
    let mut welcome = Notification::new(
        "user-1",
        NotificationType::System,
        "Welcome to foodcost",
        "Your demo kitchen is ready. Data is stored locally.",
    );
    welcome.read = true;

    vec![
        fixed(welcome, "notification-1", 0),
        fixed(
            Notification::new(
                "user-1",
                NotificationType::PriceAlert,
                "Roma Tomatoes price up",
                "Roma Tomatoes rose 6.7% at Green Valley Farms",
            )
            .with_data(json!({
                "ingredient_id": "ingredient-1",
                "supplier_id": "supplier-1",
                "previous_price": 3.0,
                "current_price": 3.2
            })),
            "notification-2",
            18,
        ),
        fixed(
            Notification::new(
                "user-1",
                NotificationType::NewSupplier,
                "New supplier available",
                "Mediterranean Imports now supplies Fresh Mozzarella",
            )
            .with_data(json!({ "supplier_id": "supplier-3" })),
            "notification-3",
            19,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Collection;
    use std::collections::HashSet;

    #[test]
    fn test_seed_is_deterministic() {
        assert_eq!(DemoSeed.seed(), DemoSeed.seed());
    }

    #[test]
    fn test_seed_epoch() {
        assert_eq!(at(0).to_rfc3339(), "2024-01-15T09:00:00+00:00");
    }

    #[test]
    fn test_seed_populates_every_collection() {
        let state = DemoSeed.seed();
        for collection in Collection::ALL {
            assert!(state.count(collection) > 0, "{} is empty", collection);
        }
        assert_eq!(state.users[0], state.current_user);
    }

    #[test]
    fn test_seed_ids_are_unique() {
        let state = DemoSeed.seed();
        let ingredient_ids: HashSet<_> = state.ingredients.iter().map(|i| &i.id).collect();
        assert_eq!(ingredient_ids.len(), state.ingredients.len());

        let line_ids: HashSet<_> = state.recipe_ingredients.iter().map(|l| &l.id).collect();
        assert_eq!(line_ids.len(), state.recipe_ingredients.len());
    }

    #[test]
    fn test_seed_recipes_embed_their_lines() {
        let state = DemoSeed.seed();
        let embedded: usize = state.recipes.iter().map(|r| r.ingredients.len()).sum();
        assert_eq!(embedded, state.recipe_ingredients.len());
    }

    #[test]
    fn test_seed_statuses_match_stock() {
        let state = DemoSeed.seed();
        for ingredient in &state.ingredients {
            assert_eq!(
                ingredient.status,
                IngredientStatus::from_stock_level(ingredient.stock_level, 10.0),
                "{}",
                ingredient.name
            );
        }
    }

    #[test]
    fn test_price_history_is_oldest_first() {
        let state = DemoSeed.seed();
        let tomatoes = &state.ingredients[0];
        let times: Vec<_> = tomatoes.price_history.iter().map(|p| p.recorded_at).collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(tomatoes.price_history.last().unwrap().price, tomatoes.current_price);
    }

    #[test]
    fn test_closure_seed_source() {
        let seed = || DemoState::empty(User::new("x@example.com", "X"));
        assert!(seed.seed().is_empty());
    }
}

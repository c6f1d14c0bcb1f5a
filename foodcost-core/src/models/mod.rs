mod ingredient;
mod notification;
mod price_alert;
mod price_point;
mod price_record;
mod recipe;
mod supplier;
mod user;

pub use ingredient::{Ingredient, IngredientCategory, IngredientStatus};
pub use notification::{Notification, NotificationType};
pub use price_alert::{AlertType, NotificationMethod, PriceAlert};
pub use price_point::PricePoint;
pub use price_record::{PriceRecord, PriceSource};
pub use recipe::{Recipe, RecipeIngredient};
pub use supplier::Supplier;
pub use user::User;

pub mod food;
pub mod plan;
pub mod preferences;
pub mod slot;

pub use food::{FoodItem, RawFoodRecord};
pub use plan::{Day, MacroTotals, Meal, MealItem, Plan, ShoppingEntry};
pub use preferences::{Diet, Language, MacroSplit, PlanMode, Preferences, Profile};
pub use slot::Slot;

mod catalog;
mod persistence;
mod presets;

pub use catalog::{Catalog, fuzzy_rank};
pub use persistence::{load_catalog, load_plan, parse_catalog, save_plan};
pub use presets::PresetStore;

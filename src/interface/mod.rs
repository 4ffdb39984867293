pub mod export;
pub mod labels;
pub mod prompts;
pub mod render;

pub use export::{write_plan_csv, write_shopping_csv};
pub use labels::{Labels, labels};
pub use prompts::{collect_preferences, prompt_choice, prompt_food, prompt_index, prompt_yes_no};
pub use render::{
    display_meal_targets, display_plan, display_shopping_list, display_swaps, display_targets,
};

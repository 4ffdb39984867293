pub mod composer;
pub mod constants;
pub mod filters;
pub mod plan;
pub mod swaps;
pub mod targets;

pub use composer::{ComposerConfig, build_meal, build_meal_for_slot, sample_meal_size, score_meal};
pub use constants::*;
pub use filters::{Exclusions, PoolOutcome, build_pool, filter_by_diet, parse_dislikes, pool_for};
pub use plan::{
    MealLocks, PlanRequest, build_day, build_slotted_day, generate_plan, regenerate_day,
    regenerate_meal, regenerate_unlocked,
};
pub use swaps::{SwapSuggestion, jaccard, suggest_swaps};
pub use targets::{MacroTarget, daily_target, macro_targets, slot_targets};

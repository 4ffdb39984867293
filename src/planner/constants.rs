/// Atwater factors (kcal per gram).
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Slack allowed when checking that a macro split sums to at most 1.0.
pub const SPLIT_EPSILON: f64 = 1e-9;

// ─────────────────────────────────────────────────────────────────────────────
// Catalog defaults
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_PORTION_G: f64 = 100.0;
pub const DEFAULT_UNIT: &str = "g";

// ─────────────────────────────────────────────────────────────────────────────
// Preferences defaults and profiles
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_DAYS: usize = 7;
pub const DEFAULT_BASE_KCAL: f64 = 2000.0;
pub const DEFAULT_MEAL_COUNT: usize = 4;
pub const DEFAULT_MAX_ITEMS: usize = 3;

pub const CUT_KCAL_FACTOR: f64 = 0.85;
pub const BULK_KCAL_FACTOR: f64 = 1.15;

/// (protein, carbs, fat) shares for the named profiles.
pub const CUT_SPLIT: (f64, f64, f64) = (0.35, 0.35, 0.30);
pub const MAINTAIN_SPLIT: (f64, f64, f64) = (0.30, 0.40, 0.30);
pub const BULK_SPLIT: (f64, f64, f64) = (0.25, 0.50, 0.25);

// ─────────────────────────────────────────────────────────────────────────────
// Filter pipeline
// ─────────────────────────────────────────────────────────────────────────────

/// Below this many items the exclusion filters are dropped.
pub const MIN_POOL_SIZE: usize = 5;

/// Groups always allowed under the vegetarian and vegan rules.
pub const PLANT_GROUPS: &[&str] = &["grains", "fruit", "vegetables", "nuts", "legumes", "fat"];

/// Groups always allowed under the gluten-free rule.
pub const GLUTEN_FREE_GROUPS: &[&str] = &[
    "protein",
    "fruit",
    "vegetables",
    "nuts",
    "legumes",
    "fat",
    "dairy",
];

/// Groups that satisfy the lunch/dinner protein guardrail.
pub const PROTEIN_GROUPS: &[&str] = &[
    "meat",
    "fish",
    "plant_protein",
    "legumes",
    "eggs",
    "prepared",
];

// ─────────────────────────────────────────────────────────────────────────────
// Slots
// ─────────────────────────────────────────────────────────────────────────────

pub const BREAKFAST_WEIGHT: f64 = 0.25;
pub const LUNCH_WEIGHT: f64 = 0.35;
pub const SNACK_WEIGHT: f64 = 0.10;
pub const DINNER_WEIGHT: f64 = 0.30;

pub const BREAKFAST_KCAL_RANGE: (f64, f64) = (300.0, 600.0);
pub const LUNCH_KCAL_RANGE: (f64, f64) = (500.0, 850.0);
pub const SNACK_KCAL_RANGE: (f64, f64) = (100.0, 300.0);
pub const DINNER_KCAL_RANGE: (f64, f64) = (500.0, 850.0);

// ─────────────────────────────────────────────────────────────────────────────
// Composer defaults (see ComposerConfig)
// ─────────────────────────────────────────────────────────────────────────────

pub const MEAL_TRIALS: usize = 300;
pub const DAY_TRIALS: usize = 400;
pub const SLOT_RETRIES: usize = 3;

/// Probability of appending one extra random item to a candidate meal.
pub const BONUS_ITEM_PROBABILITY: f64 = 0.35;

/// Probability that an item already used today stays in the candidate set.
pub const REUSE_PROBABILITY: f64 = 0.4;

/// Gaussian used to draw the meal size.
pub const MEAL_SIZE_MEAN: f64 = 2.5;
pub const MEAL_SIZE_STDDEV: f64 = 0.6;

/// Smallest meal size for single meals and for meals inside a day search.
pub const MIN_MEAL_ITEMS: usize = 1;
pub const MIN_DAY_MEAL_ITEMS: usize = 2;

/// Score weights per deviation.
pub const KCAL_WEIGHT: f64 = 1.0;
pub const PROTEIN_WEIGHT: f64 = 2.0;
pub const CARBS_WEIGHT: f64 = 1.0;
pub const FAT_WEIGHT: f64 = 2.0;

// ─────────────────────────────────────────────────────────────────────────────
// Substitutions
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_SWAP_TOPK: usize = 5;
pub const DEFAULT_SWAP_TOLERANCE: f64 = 0.30;

/// Calorie gap that costs one full point of similarity.
pub const SWAP_KCAL_SCALE: f64 = 800.0;

/// Minimum base (grams) for the relative macro tolerance.
pub const SWAP_TOLERANCE_FLOOR_G: f64 = 5.0;

/// Minimum jaro-winkler similarity for fuzzy name lookups.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.7;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::{PlannerError, Result};
use crate::models::{Diet, Language, MacroSplit, PlanMode, Preferences, Profile};
use crate::planner::ComposerConfig;
use crate::planner::constants::{DEFAULT_SWAP_TOLERANCE, DEFAULT_SWAP_TOPK};
use crate::planner::filters::parse_dislikes;
use crate::state::PresetStore;

/// MealPlanMaker: compose multi-day meal plans toward calorie and macro targets.
#[derive(Parser, Debug)]
#[command(name = "meal_plan_maker")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the food catalog JSON file.
    #[arg(short, long, global = true, default_value = "foods.json")]
    pub catalog: PathBuf,

    /// Log planner decisions to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Preference overrides shared by every planning command.
///
/// Unset flags keep the value from `--preset` (or the built-in defaults).
#[derive(Args, Debug, Clone, Default)]
pub struct PreferenceArgs {
    /// Start from a saved preset.
    #[arg(long)]
    pub preset: Option<String>,

    /// Path to the presets JSON file.
    #[arg(long, default_value = "presets.json")]
    pub presets: PathBuf,

    /// Number of days to plan.
    #[arg(short, long)]
    pub days: Option<usize>,

    /// Base daily calories.
    #[arg(short, long)]
    pub kcal: Option<f64>,

    /// Calories added after the profile adjustment (may be negative).
    #[arg(long, allow_hyphen_values = true)]
    pub adjust: Option<f64>,

    /// Meals per day.
    #[arg(short, long)]
    pub meals: Option<usize>,

    /// omnivore, vegetarian, vegan or gluten-free.
    #[arg(long)]
    pub diet: Option<String>,

    #[arg(long, value_enum)]
    pub profile: Option<Profile>,

    /// Protein percentage; switches the profile to custom.
    #[arg(long)]
    pub protein: Option<f64>,

    /// Carbs percentage; switches the profile to custom.
    #[arg(long)]
    pub carbs: Option<f64>,

    /// Fat percentage; defaults to the remainder.
    #[arg(long)]
    pub fat: Option<f64>,

    /// Max items per meal.
    #[arg(long)]
    pub max_items: Option<usize>,

    /// Tags to exclude (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub exclude_tags: Vec<String>,

    /// Food groups to exclude (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub exclude_groups: Vec<String>,

    /// Disliked name fragments (comma-separated).
    #[arg(long)]
    pub dislikes: Option<String>,

    #[arg(long, value_enum)]
    pub lang: Option<Language>,

    #[arg(long, value_enum)]
    pub mode: Option<PlanMode>,
}

impl PreferenceArgs {
    /// The preset named by `--preset`, or the defaults.
    pub fn base(&self) -> Result<Preferences> {
        match &self.preset {
            Some(name) => Ok(PresetStore::load(&self.presets)?.get(name)?.clone()),
            None => Ok(Preferences::default()),
        }
    }

    /// Overlay the flags that were given onto `base` and validate the result.
    pub fn apply_to(&self, base: Preferences) -> Result<Preferences> {
        let mut prefs = base;

        if let Some(days) = self.days {
            prefs.days = days;
        }
        if let Some(kcal) = self.kcal {
            prefs.base_kcal = kcal;
        }
        if let Some(adjust) = self.adjust {
            prefs.kcal_adjustment = adjust;
        }
        if let Some(meals) = self.meals {
            prefs.meal_count = meals;
        }
        if let Some(diet) = &self.diet {
            prefs.diet = Diet::from_name(diet);
        }
        if let Some(profile) = self.profile {
            prefs.profile = profile;
        }
        if self.protein.is_some() || self.carbs.is_some() || self.fat.is_some() {
            let current = prefs.resolved_split().unwrap_or(prefs.split);
            prefs.split = MacroSplit::from_percentages(
                self.protein.unwrap_or(current.protein * 100.0),
                self.carbs.unwrap_or(current.carbs * 100.0),
                self.fat,
            )?;
            prefs.profile = Profile::Custom;
        }
        if let Some(max_items) = self.max_items {
            prefs.max_items = max_items;
        }
        if !self.exclude_tags.is_empty() {
            prefs.exclude_tags = clean_list(&self.exclude_tags);
        }
        if !self.exclude_groups.is_empty() {
            prefs.exclude_groups = clean_list(&self.exclude_groups);
        }
        if let Some(dislikes) = &self.dislikes {
            prefs.dislikes = parse_dislikes(dislikes);
        }
        if let Some(lang) = self.lang {
            prefs.language = lang;
        }
        if let Some(mode) = self.mode {
            prefs.mode = mode;
        }

        prefs.validate()?;
        Ok(prefs)
    }

    pub fn resolve(&self) -> Result<Preferences> {
        self.apply_to(self.base()?)
    }
}

fn clean_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Parse a `day:meal` lock (1-based) into 0-based indices.
pub fn parse_lock(value: &str) -> Result<(usize, usize)> {
    let invalid = || PlannerError::InvalidInput(format!("invalid lock '{value}', expected DAY:MEAL"));
    let (day, meal) = value.split_once(':').ok_or_else(invalid)?;
    let day: usize = day.trim().parse().map_err(|_| invalid())?;
    let meal: usize = meal.trim().parse().map_err(|_| invalid())?;
    if day == 0 || meal == 0 {
        return Err(invalid());
    }
    Ok((day - 1, meal - 1))
}

#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Seed for a reproducible plan.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Trials per meal and per day search.
    #[arg(long)]
    pub trials: Option<usize>,
}

impl SearchArgs {
    pub fn config(&self) -> ComposerConfig {
        match self.trials {
            Some(trials) => ComposerConfig::default().with_trials(trials),
            None => ComposerConfig::default(),
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a meal plan.
    Plan {
        #[command(flatten)]
        prefs: PreferenceArgs,

        #[command(flatten)]
        search: SearchArgs,

        /// Collect preferences through prompts.
        #[arg(short, long)]
        interactive: bool,

        /// Save the plan as JSON.
        #[arg(long)]
        json: Option<PathBuf>,

        /// Export the plan as CSV.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Export the shopping list as CSV.
        #[arg(long)]
        shopping_csv: Option<PathBuf>,

        /// Show this many swap ideas per planned item.
        #[arg(long, default_value_t = 0)]
        swaps: usize,
    },

    /// Regenerate parts of a saved plan.
    Regenerate {
        /// Plan JSON written by `plan --json`.
        plan: PathBuf,

        #[command(flatten)]
        prefs: PreferenceArgs,

        #[command(flatten)]
        search: SearchArgs,

        /// Only this day (1-based).
        #[arg(long)]
        day: Option<usize>,

        /// Only this meal of `--day` (1-based).
        #[arg(long, requires = "day")]
        meal: Option<usize>,

        /// Meals to keep as DAY:MEAL (1-based, repeatable).
        #[arg(long = "lock")]
        locks: Vec<String>,

        /// Where to write the result (defaults to overwriting the input).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show daily and per-meal targets.
    Targets {
        #[command(flatten)]
        prefs: PreferenceArgs,
    },

    /// Suggest replacements for a food.
    Swap {
        /// Food name; prompts with fuzzy matching when omitted.
        name: Option<String>,

        #[command(flatten)]
        prefs: PreferenceArgs,

        #[arg(long, default_value_t = DEFAULT_SWAP_TOPK)]
        topk: usize,

        /// Relative macro tolerance (0.30 = 30%).
        #[arg(long, default_value_t = DEFAULT_SWAP_TOLERANCE)]
        tolerance: f64,
    },

    /// Manage saved preference presets.
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum PresetAction {
    /// Save the given preferences under a name.
    Save {
        name: String,

        #[command(flatten)]
        prefs: PreferenceArgs,

        /// Collect preferences through prompts.
        #[arg(short, long)]
        interactive: bool,
    },

    /// List saved presets.
    List {
        #[arg(long, default_value = "presets.json")]
        presets: PathBuf,
    },

    /// Print one preset as JSON.
    Show {
        name: String,

        #[arg(long, default_value = "presets.json")]
        presets: PathBuf,
    },

    /// Delete a preset.
    Delete {
        name: String,

        #[arg(long, default_value = "presets.json")]
        presets: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plan_command() {
        let cli = Cli::try_parse_from([
            "meal_plan_maker",
            "plan",
            "--days",
            "3",
            "--diet",
            "vegan",
            "--exclude-tags",
            "nuts, soy",
            "--seed",
            "7",
        ])
        .unwrap();

        match cli.command {
            Command::Plan { prefs, search, .. } => {
                let resolved = prefs.apply_to(Preferences::default()).unwrap();
                assert_eq!(resolved.days, 3);
                assert_eq!(resolved.diet, Diet::Vegan);
                assert_eq!(resolved.exclude_tags, vec!["nuts", "soy"]);
                assert_eq!(search.seed, Some(7));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_custom_split_switches_profile() {
        let args = PreferenceArgs {
            protein: Some(40.0),
            carbs: Some(30.0),
            ..PreferenceArgs::default()
        };
        let prefs = args.apply_to(Preferences::default()).unwrap();
        assert_eq!(prefs.profile, Profile::Custom);
        assert!((prefs.split.fat - 0.30).abs() < 1e-9);
    }

    #[test]
    fn test_split_over_hundred_rejected() {
        let args = PreferenceArgs {
            protein: Some(70.0),
            carbs: Some(50.0),
            ..PreferenceArgs::default()
        };
        assert!(matches!(
            args.apply_to(Preferences::default()),
            Err(PlannerError::InvalidMacroSplit { .. })
        ));
    }

    #[test]
    fn test_swap_name_is_optional() {
        let cli = Cli::try_parse_from(["meal_plan_maker", "swap", "--topk", "3"]).unwrap();
        match cli.command {
            Command::Swap { name, topk, .. } => {
                assert_eq!(name, None);
                assert_eq!(topk, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["meal_plan_maker", "swap", "Chicken Breast"]).unwrap();
        match cli.command {
            Command::Swap { name, .. } => assert_eq!(name.as_deref(), Some("Chicken Breast")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_lock() {
        assert_eq!(parse_lock("2:3").unwrap(), (1, 2));
        assert!(parse_lock("0:1").is_err());
        assert!(parse_lock("2").is_err());
    }
}

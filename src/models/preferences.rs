use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::planner::constants::*;

/// Dietary pattern. Unrecognized names behave as omnivore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Diet {
    #[default]
    Omnivore,
    Vegetarian,
    Vegan,
    GlutenFree,
}

impl Diet {
    pub const ALL: [Diet; 4] = [Diet::Omnivore, Diet::Vegetarian, Diet::Vegan, Diet::GlutenFree];

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "vegetarian" => Diet::Vegetarian,
            "vegan" => Diet::Vegan,
            "gluten-free" | "gluten_free" | "glutenfree" => Diet::GlutenFree,
            _ => Diet::Omnivore,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Diet::Omnivore => "omnivore",
            Diet::Vegetarian => "vegetarian",
            Diet::Vegan => "vegan",
            Diet::GlutenFree => "gluten-free",
        }
    }
}

impl From<String> for Diet {
    fn from(name: String) -> Self {
        Diet::from_name(&name)
    }
}

impl From<Diet> for String {
    fn from(diet: Diet) -> Self {
        diet.name().to_string()
    }
}

/// Label language for rendered output. Has no effect on composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Sr,
}

/// How daily targets are split across meals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlanMode {
    /// Every meal gets an equal share; day-level multi-restart search.
    #[default]
    Uniform,
    /// Weighted per-slot targets with protein and calorie-range guardrails.
    Slots,
}

/// Named shortcut bundling a calorie adjustment and a macro split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Custom,
    Cut,
    #[default]
    Maintain,
    Bulk,
}

impl Profile {
    pub const ALL: [Profile; 4] = [Profile::Custom, Profile::Cut, Profile::Maintain, Profile::Bulk];

    pub fn kcal_factor(self) -> f64 {
        match self {
            Profile::Custom | Profile::Maintain => 1.0,
            Profile::Cut => CUT_KCAL_FACTOR,
            Profile::Bulk => BULK_KCAL_FACTOR,
        }
    }

    /// Fixed split for named profiles; `None` for custom.
    pub fn split(self) -> Option<MacroSplit> {
        let (protein, carbs, fat) = match self {
            Profile::Custom => return None,
            Profile::Cut => CUT_SPLIT,
            Profile::Maintain => MAINTAIN_SPLIT,
            Profile::Bulk => BULK_SPLIT,
        };
        Some(MacroSplit { protein, carbs, fat })
    }

    pub fn label(self, lang: Language) -> &'static str {
        match (self, lang) {
            (Profile::Custom, Language::En) => "Custom",
            (Profile::Cut, Language::En) => "Cut (-15% kcal, higher protein)",
            (Profile::Maintain, Language::En) => "Maintain (balanced)",
            (Profile::Bulk, Language::En) => "Bulk (+15% kcal, higher carbs)",
            (Profile::Custom, Language::Sr) => "Prilagođeno",
            (Profile::Cut, Language::Sr) => "Deficit (-15% kcal, više proteina)",
            (Profile::Maintain, Language::Sr) => "Održavanje (izbalansirano)",
            (Profile::Bulk, Language::Sr) => "Suficit (+15% kcal, više UH)",
        }
    }
}

/// Macro percentage split as fractions of total kcal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroSplit {
    /// Validated split. Negative shares clamp to zero; a missing fat share
    /// takes the remainder; a total above 1.0 is rejected.
    pub fn new(protein: f64, carbs: f64, fat: Option<f64>) -> Result<Self> {
        let protein = protein.max(0.0);
        let carbs = carbs.max(0.0);
        let fat = fat.unwrap_or(1.0 - protein - carbs).max(0.0);
        let split = Self { protein, carbs, fat };
        split.validate()?;
        Ok(split)
    }

    /// Build from whole percentages, e.g. `(30, 40, None)`.
    pub fn from_percentages(protein: f64, carbs: f64, fat: Option<f64>) -> Result<Self> {
        Self::new(protein / 100.0, carbs / 100.0, fat.map(|f| f / 100.0))
    }

    pub fn total(&self) -> f64 {
        self.protein + self.carbs + self.fat
    }

    pub fn validate(&self) -> Result<()> {
        let finite = self.protein.is_finite() && self.carbs.is_finite() && self.fat.is_finite();
        if !finite || self.total() > 1.0 + SPLIT_EPSILON {
            return Err(PlannerError::InvalidMacroSplit {
                protein: self.protein,
                carbs: self.carbs,
                fat: self.fat,
            });
        }
        Ok(())
    }

    /// Copy with any negative share clamped to zero.
    pub fn clamped(&self) -> Self {
        Self {
            protein: self.protein.max(0.0),
            carbs: self.carbs.max(0.0),
            fat: self.fat.max(0.0),
        }
    }
}

impl Default for MacroSplit {
    fn default() -> Self {
        let (protein, carbs, fat) = MAINTAIN_SPLIT;
        Self { protein, carbs, fat }
    }
}

/// A configuration snapshot driving plan generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub days: usize,
    pub base_kcal: f64,
    /// Added to the profile-adjusted calories.
    pub kcal_adjustment: f64,
    pub meal_count: usize,
    pub diet: Diet,
    pub profile: Profile,
    /// Used when `profile` is custom.
    pub split: MacroSplit,
    pub max_items: usize,
    pub exclude_tags: Vec<String>,
    pub exclude_groups: Vec<String>,
    /// Lowercased name substrings to avoid.
    pub dislikes: Vec<String>,
    pub language: Language,
    pub mode: PlanMode,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS,
            base_kcal: DEFAULT_BASE_KCAL,
            kcal_adjustment: 0.0,
            meal_count: DEFAULT_MEAL_COUNT,
            diet: Diet::Omnivore,
            profile: Profile::Maintain,
            split: MacroSplit::default(),
            max_items: DEFAULT_MAX_ITEMS,
            exclude_tags: Vec::new(),
            exclude_groups: Vec::new(),
            dislikes: Vec::new(),
            language: Language::En,
            mode: PlanMode::Uniform,
        }
    }
}

impl Preferences {
    /// Daily calories after the profile factor and the adjustment offset.
    pub fn effective_kcal(&self) -> f64 {
        let scaled = (self.base_kcal * self.profile.kcal_factor()).trunc();
        (scaled + self.kcal_adjustment).max(0.0)
    }

    /// The split in force: the profile's when named, otherwise the custom one.
    pub fn resolved_split(&self) -> Result<MacroSplit> {
        let split = self.profile.split().unwrap_or(self.split).clamped();
        split.validate()?;
        Ok(split)
    }

    /// Reject values the planner cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.days == 0 {
            return Err(PlannerError::InvalidInput("days must be at least 1".to_string()));
        }
        if self.meal_count == 0 {
            return Err(PlannerError::InvalidInput(
                "meal count must be at least 1".to_string(),
            ));
        }
        if self.max_items == 0 {
            return Err(PlannerError::InvalidInput(
                "max items per meal must be at least 1".to_string(),
            ));
        }
        if !self.base_kcal.is_finite() || self.base_kcal < 0.0 {
            return Err(PlannerError::InvalidInput(format!(
                "invalid daily calories: {}",
                self.base_kcal
            )));
        }
        self.resolved_split().map(|_| ())
    }
}

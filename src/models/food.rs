use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Slot;
use crate::planner::constants::{DEFAULT_PORTION_G, DEFAULT_UNIT, PROTEIN_GROUPS};

/// A normalized catalog entry.
///
/// Built once at load time from a [`RawFoodRecord`]; macro grams and kcal are
/// always finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub group: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub kcal: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    #[serde(default = "default_portion")]
    pub portion_g: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default = "all_slots")]
    pub slots: BTreeSet<Slot>,
}

fn default_portion() -> f64 {
    DEFAULT_PORTION_G
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

fn all_slots() -> BTreeSet<Slot> {
    Slot::ALL.into_iter().collect()
}

impl FoodItem {
    /// Item with default portion, unit and slot eligibility and no tags.
    pub fn new(name: &str, group: &str, kcal: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        Self {
            name: name.to_string(),
            group: group.to_string(),
            tags: BTreeSet::new(),
            kcal: non_negative(kcal),
            protein_g: non_negative(protein_g),
            carbs_g: non_negative(carbs_g),
            fat_g: non_negative(fat_g),
            portion_g: DEFAULT_PORTION_G,
            unit: DEFAULT_UNIT.to_string(),
            slots: all_slots(),
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_slots(mut self, slots: &[Slot]) -> Self {
        self.slots = if slots.is_empty() {
            all_slots()
        } else {
            slots.iter().copied().collect()
        };
        self
    }

    /// Canonical key for lookups (lowercase name).
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_protein_source(&self) -> bool {
        PROTEIN_GROUPS.contains(&self.group.as_str())
    }

    pub fn eligible_for(&self, slot: Slot) -> bool {
        self.slots.contains(&slot)
    }

    /// Categorical signature used for similarity: `group::<g>` plus `tag::<t>` per tag.
    pub fn signature(&self) -> BTreeSet<String> {
        std::iter::once(format!("group::{}", self.group))
            .chain(self.tags.iter().map(|t| format!("tag::{t}")))
            .collect()
    }
}

/// Macros nested under a `macros` object in some catalog sources.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMacros {
    #[serde(default, alias = "protein_g")]
    pub protein: Option<Value>,
    #[serde(default, alias = "carbs_g")]
    pub carbs: Option<Value>,
    #[serde(default, alias = "fat_g")]
    pub fat: Option<Value>,
    #[serde(default, alias = "calories")]
    pub kcal: Option<Value>,
}

/// A catalog record as found in the source JSON, before normalization.
///
/// Numeric fields are kept as raw JSON so malformed values can fall back to
/// zero instead of failing the whole catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFoodRecord {
    pub name: String,
    pub group: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default, alias = "calories")]
    pub kcal: Option<Value>,
    #[serde(default, alias = "protein_g")]
    pub protein: Option<Value>,
    #[serde(default, alias = "carbs_g")]
    pub carbs: Option<Value>,
    #[serde(default, alias = "fat_g")]
    pub fat: Option<Value>,
    #[serde(default)]
    pub macros: Option<RawMacros>,
    #[serde(default)]
    pub portion_g: Option<Value>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub slots: Option<Vec<String>>,
}

impl RawFoodRecord {
    pub fn normalize(self) -> FoodItem {
        let nested = self.macros.unwrap_or_default();
        let pick = |flat: Option<Value>, nested: Option<Value>| {
            coerce_number(flat.as_ref()).or_else(|| coerce_number(nested.as_ref()))
        };

        let kcal = pick(self.kcal, nested.kcal).unwrap_or(0.0);
        let protein_g = pick(self.protein, nested.protein).unwrap_or(0.0);
        let carbs_g = pick(self.carbs, nested.carbs).unwrap_or(0.0);
        let fat_g = pick(self.fat, nested.fat).unwrap_or(0.0);

        let portion_g = coerce_number(self.portion_g.as_ref())
            .filter(|p| *p > 0.0)
            .unwrap_or(DEFAULT_PORTION_G);

        let unit = self
            .unit
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(default_unit);

        let slots: Vec<Slot> = self
            .slots
            .unwrap_or_default()
            .iter()
            .filter_map(|s| Slot::parse(s))
            .collect();

        let tags: Vec<&str> = self
            .tags
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();

        FoodItem {
            portion_g,
            unit,
            ..FoodItem::new(self.name.trim(), self.group.trim(), kcal, protein_g, carbs_g, fat_g)
                .with_tags(&tags)
                .with_slots(&slots)
        }
    }
}

/// Read a JSON value as a number. Numeric strings are accepted.
fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    Some(non_negative(n))
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> FoodItem {
        serde_json::from_str::<RawFoodRecord>(json).unwrap().normalize()
    }

    #[test]
    fn test_flat_record() {
        let item = parse(
            r#"{"name": "Rice", "group": "grains", "kcal": 130, "protein": 2.7, "carbs": 28, "fat": 0.3, "tags": ["vegan"]}"#,
        );
        assert_eq!(item.name, "Rice");
        assert_eq!(item.kcal, 130.0);
        assert_eq!(item.carbs_g, 28.0);
        assert!(item.has_tag("vegan"));
        assert_eq!(item.portion_g, 100.0);
        assert_eq!(item.unit, "g");
        assert_eq!(item.slots.len(), 4);
    }

    #[test]
    fn test_nested_macros() {
        let item = parse(
            r#"{"name": "Egg", "group": "eggs", "calories": 78, "macros": {"protein": 6, "carbs": 0.6, "fat": 5.3}}"#,
        );
        assert_eq!(item.kcal, 78.0);
        assert_eq!(item.protein_g, 6.0);
        assert_eq!(item.fat_g, 5.3);
    }

    #[test]
    fn test_malformed_numbers_default_to_zero() {
        let item = parse(
            r#"{"name": "Mystery", "group": "other", "kcal": "abc", "protein": null, "carbs": "12.5", "fat": -3}"#,
        );
        assert_eq!(item.kcal, 0.0);
        assert_eq!(item.protein_g, 0.0);
        assert_eq!(item.carbs_g, 12.5);
        assert_eq!(item.fat_g, 0.0);
    }

    #[test]
    fn test_slots_and_portion() {
        let item = parse(
            r#"{"name": "Oats", "group": "grains", "kcal": 150, "slots": ["Breakfast", "brunch"], "portion_g": 40, "unit": "cup"}"#,
        );
        assert_eq!(item.slots.len(), 1);
        assert!(item.eligible_for(Slot::Breakfast));
        assert!(!item.eligible_for(Slot::Dinner));
        assert_eq!(item.portion_g, 40.0);
        assert_eq!(item.unit, "cup");
    }

    #[test]
    fn test_signature() {
        let item = FoodItem::new("Tofu", "plant_protein", 144.0, 17.0, 3.0, 9.0)
            .with_tags(&["vegan", "soy"]);
        let sig = item.signature();
        assert!(sig.contains("group::plant_protein"));
        assert!(sig.contains("tag::vegan"));
        assert!(sig.contains("tag::soy"));
        assert_eq!(sig.len(), 3);
        assert!(item.is_protein_source());
    }
}

use std::collections::BTreeSet;

use strsim::jaro_winkler;
use tracing::warn;

use crate::error::{PlannerError, Result};
use crate::models::FoodItem;
use crate::planner::constants::FUZZY_MATCH_THRESHOLD;

/// The loaded food catalog.
///
/// Kept as an ordered list so that seeded plans are reproducible; lookups
/// are by case-insensitive name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    foods: Vec<FoodItem>,
}

impl Catalog {
    /// Build a catalog keeping every record in input order.
    ///
    /// Names are not required to be unique; repeated names are logged and
    /// name lookups return the first record.
    pub fn new(foods: Vec<FoodItem>) -> Self {
        let mut seen = BTreeSet::new();
        for food in &foods {
            if !seen.insert(food.key()) {
                warn!(name = %food.name, "Duplicate food name in catalog");
            }
        }
        Self { foods }
    }

    pub fn foods(&self) -> &[FoodItem] {
        &self.foods
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    /// Get a food by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&FoodItem> {
        let key = name.trim().to_lowercase();
        self.foods.iter().find(|f| f.key() == key)
    }

    /// Like [`Catalog::get`], but a missing name is an error.
    pub fn find(&self, name: &str) -> Result<&FoodItem> {
        self.get(name)
            .ok_or_else(|| PlannerError::FoodNotFound(name.to_string()))
    }

    /// Foods whose names are close to `query`, best match first.
    pub fn fuzzy_matches(&self, query: &str) -> Vec<(&FoodItem, f64)> {
        fuzzy_rank(self.foods.iter(), query)
    }

    pub fn all_tags(&self) -> BTreeSet<&str> {
        self.foods
            .iter()
            .flat_map(|f| f.tags.iter().map(String::as_str))
            .collect()
    }

    pub fn all_groups(&self) -> BTreeSet<&str> {
        self.foods.iter().map(|f| f.group.as_str()).collect()
    }
}

/// Rank foods by Jaro-Winkler similarity of their names to `query`.
pub fn fuzzy_rank<'a>(
    foods: impl IntoIterator<Item = &'a FoodItem>,
    query: &str,
) -> Vec<(&'a FoodItem, f64)> {
    let query = query.trim().to_lowercase();
    let mut candidates: Vec<(&FoodItem, f64)> = foods
        .into_iter()
        .map(|f| (f, jaro_winkler(&f.key(), &query)))
        .filter(|(_, score)| *score > FUZZY_MATCH_THRESHOLD)
        .collect();

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates
}

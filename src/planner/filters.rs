use tracing::{debug, warn};

use crate::models::{Diet, FoodItem, Preferences};
use crate::planner::constants::{GLUTEN_FREE_GROUPS, MIN_POOL_SIZE, PLANT_GROUPS};

/// Exclusions applied after the diet rule.
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    pub tags: Vec<String>,
    pub groups: Vec<String>,
    /// Lowercased name substrings.
    pub dislikes: Vec<String>,
}

impl Exclusions {
    pub fn from_preferences(prefs: &Preferences) -> Self {
        Self {
            tags: prefs.exclude_tags.clone(),
            groups: prefs.exclude_groups.clone(),
            dislikes: prefs
                .dislikes
                .iter()
                .map(|d| d.trim().to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.groups.is_empty() && self.dislikes.is_empty()
    }
}

/// Filtered pool plus a warning when it came out smaller than [`MIN_POOL_SIZE`].
#[derive(Debug, Clone)]
pub struct PoolOutcome {
    pub pool: Vec<FoodItem>,
    pub warning: Option<String>,
}

/// Split a comma-separated dislike string into lowercase tokens.
pub fn parse_dislikes(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Whether an item passes the diet rule.
pub fn matches_diet(item: &FoodItem, diet: Diet) -> bool {
    let group = item.group.as_str();
    match diet {
        Diet::Omnivore => true,
        Diet::Vegetarian => {
            item.has_tag("vegan") || item.has_tag("vegetarian") || PLANT_GROUPS.contains(&group)
        }
        Diet::Vegan => item.has_tag("vegan") || PLANT_GROUPS.contains(&group),
        Diet::GlutenFree => item.has_tag("gluten-free") || GLUTEN_FREE_GROUPS.contains(&group),
    }
}

pub fn filter_by_diet(catalog: &[FoodItem], diet: Diet) -> Vec<FoodItem> {
    catalog
        .iter()
        .filter(|item| matches_diet(item, diet))
        .cloned()
        .collect()
}

pub fn exclude_tags(pool: Vec<FoodItem>, tags: &[String]) -> Vec<FoodItem> {
    if tags.is_empty() {
        return pool;
    }
    pool.into_iter()
        .filter(|item| !tags.iter().any(|t| item.has_tag(t)))
        .collect()
}

pub fn exclude_groups(pool: Vec<FoodItem>, groups: &[String]) -> Vec<FoodItem> {
    if groups.is_empty() {
        return pool;
    }
    pool.into_iter()
        .filter(|item| !groups.iter().any(|g| *g == item.group))
        .collect()
}

pub fn exclude_dislikes(pool: Vec<FoodItem>, dislikes: &[String]) -> Vec<FoodItem> {
    if dislikes.is_empty() {
        return pool;
    }
    pool.into_iter()
        .filter(|item| {
            let name = item.name.to_lowercase();
            !dislikes.iter().any(|d| name.contains(d.as_str()))
        })
        .collect()
}

/// Run the full pipeline: diet rule, then tags, groups and dislikes.
///
/// Falls back to the diet-only pool when fewer than [`MIN_POOL_SIZE`] items
/// survive. A small diet pool warns even when no exclusions were given.
pub fn build_pool(catalog: &[FoodItem], diet: Diet, exclusions: &Exclusions) -> PoolOutcome {
    let diet_pool = filter_by_diet(catalog, diet);

    let filtered = exclude_tags(diet_pool.clone(), &exclusions.tags);
    let filtered = exclude_groups(filtered, &exclusions.groups);
    let filtered = exclude_dislikes(filtered, &exclusions.dislikes);

    debug!(
        diet = diet.name(),
        catalog = catalog.len(),
        diet_pool = diet_pool.len(),
        filtered = filtered.len(),
        "Built food pool"
    );

    if filtered.len() < MIN_POOL_SIZE {
        let message = if exclusions.is_empty() {
            format!(
                "Only {} foods match the {} diet; plans will repeat items.",
                diet_pool.len(),
                diet.name()
            )
        } else {
            format!(
                "Filters are too strict ({} items left); using all {} foods for the {} diet.",
                filtered.len(),
                diet_pool.len(),
                diet.name()
            )
        };
        warn!("{}", message);
        return PoolOutcome {
            pool: diet_pool,
            warning: Some(message),
        };
    }

    PoolOutcome {
        pool: filtered,
        warning: None,
    }
}

/// Pool for a preferences snapshot.
pub fn pool_for(catalog: &[FoodItem], prefs: &Preferences) -> PoolOutcome {
    build_pool(catalog, prefs.diet, &Exclusions::from_preferences(prefs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<FoodItem> {
        vec![
            FoodItem::new("Chicken Breast", "meat", 165.0, 31.0, 0.0, 3.6),
            FoodItem::new("Rice", "grains", 130.0, 2.7, 28.0, 0.3),
            FoodItem::new("Broccoli", "vegetables", 34.0, 2.8, 7.0, 0.4),
            FoodItem::new("Olive Oil", "fat", 119.0, 0.0, 0.0, 13.5),
            FoodItem::new("Egg", "eggs", 78.0, 6.0, 0.6, 5.3),
            FoodItem::new("Apple", "fruit", 95.0, 0.5, 25.0, 0.3),
            FoodItem::new("Greek Yogurt", "dairy", 59.0, 10.0, 3.6, 0.4)
                .with_tags(&["vegetarian", "lactose"]),
            FoodItem::new("Wheat Bread", "bakery", 265.0, 9.0, 49.0, 3.2)
                .with_tags(&["vegan", "gluten"]),
        ]
    }

    fn names(pool: &[FoodItem]) -> Vec<&str> {
        pool.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_omnivore_identity() {
        assert_eq!(filter_by_diet(&catalog(), Diet::Omnivore).len(), 8);
    }

    #[test]
    fn test_vegetarian_rule() {
        let pool = filter_by_diet(&catalog(), Diet::Vegetarian);
        let n = names(&pool);
        assert!(!n.contains(&"Chicken Breast"));
        assert!(!n.contains(&"Egg"));
        assert!(n.contains(&"Greek Yogurt"));
        assert!(n.contains(&"Wheat Bread"));
        assert!(n.contains(&"Rice"));
    }

    #[test]
    fn test_vegan_rule() {
        let pool = filter_by_diet(&catalog(), Diet::Vegan);
        let n = names(&pool);
        assert!(!n.contains(&"Greek Yogurt"));
        assert!(n.contains(&"Wheat Bread"));
        assert_eq!(pool.len(), 5);
    }

    #[test]
    fn test_gluten_free_rule() {
        let pool = filter_by_diet(&catalog(), Diet::GlutenFree);
        let n = names(&pool);
        assert!(n.contains(&"Greek Yogurt"));
        assert!(!n.contains(&"Wheat Bread"));
        assert!(!n.contains(&"Rice"));
    }

    #[test]
    fn test_parse_dislikes() {
        assert_eq!(parse_dislikes(" Eggs, ,tuna "), vec!["eggs", "tuna"]);
        assert!(parse_dislikes("").is_empty());
    }

    #[test]
    fn test_exclusions_apply_in_order() {
        let exclusions = Exclusions {
            tags: vec!["gluten".to_string()],
            groups: vec!["meat".to_string()],
            dislikes: vec!["broc".to_string()],
        };
        let outcome = build_pool(&catalog(), Diet::Omnivore, &exclusions);
        assert!(outcome.warning.is_none());
        let n = names(&outcome.pool);
        assert_eq!(n, vec!["Rice", "Olive Oil", "Egg", "Apple", "Greek Yogurt"]);
    }

    #[test]
    fn test_fallback_when_too_strict() {
        let exclusions = Exclusions {
            groups: vec!["grains".to_string(), "fruit".to_string()],
            ..Default::default()
        };
        let outcome = build_pool(&catalog(), Diet::Vegan, &exclusions);
        assert!(outcome.warning.is_some());
        assert_eq!(outcome.pool.len(), 5);
    }

    #[test]
    fn test_small_diet_pool_warns_without_exclusions() {
        let foods: Vec<FoodItem> = catalog().into_iter().take(3).collect();
        let outcome = build_pool(&foods, Diet::Omnivore, &Exclusions::default());
        assert!(outcome.warning.is_some());
        assert_eq!(names(&outcome.pool), vec!["Chicken Breast", "Rice", "Broccoli"]);

        let outcome = build_pool(&catalog(), Diet::Omnivore, &Exclusions::default());
        assert!(outcome.warning.is_none());
    }
}

use std::collections::BTreeSet;

use crate::models::FoodItem;
use crate::planner::constants::{SWAP_KCAL_SCALE, SWAP_TOLERANCE_FLOOR_G};

/// A ranked replacement candidate.
#[derive(Debug, Clone)]
pub struct SwapSuggestion<'a> {
    pub food: &'a FoodItem,
    /// Jaccard similarity of the categorical signatures.
    pub similarity: f64,
    /// Similarity minus the scaled calorie gap; higher is better.
    pub score: f64,
}

/// |A ∩ B| / |A ∪ B|, or 0.0 when both sets are empty.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Whether protein, carbs and fat each stay within `tolerance` of the source.
///
/// The relative base never drops below [`SWAP_TOLERANCE_FLOOR_G`], so a 0 g
/// macro still admits candidates with a trace amount.
pub fn within_tolerance(source: &FoodItem, candidate: &FoodItem, tolerance: f64) -> bool {
    [
        (source.protein_g, candidate.protein_g),
        (source.carbs_g, candidate.carbs_g),
        (source.fat_g, candidate.fat_g),
    ]
    .into_iter()
    .all(|(s, c)| (s - c).abs() <= tolerance * s.max(SWAP_TOLERANCE_FLOOR_G))
}

/// Similarity score of `candidate` as a replacement for `source`.
pub fn swap_score(source: &FoodItem, candidate: &FoodItem) -> (f64, f64) {
    let similarity = jaccard(&source.signature(), &candidate.signature());
    let score = similarity - (source.kcal - candidate.kcal).abs() / SWAP_KCAL_SCALE;
    (similarity, score)
}

/// Rank replacements for `item` from `pool`, best first, at most `topk`.
///
/// The item itself (by case-insensitive name) and candidates whose macros
/// deviate beyond `tolerance` are left out. Equal scores keep pool order.
pub fn suggest_swaps<'a>(
    item: &FoodItem,
    pool: &'a [FoodItem],
    topk: usize,
    tolerance: f64,
) -> Vec<SwapSuggestion<'a>> {
    let key = item.key();
    let mut ranked: Vec<SwapSuggestion<'a>> = pool
        .iter()
        .filter(|c| c.key() != key)
        .filter(|c| within_tolerance(item, c, tolerance))
        .map(|c| {
            let (similarity, score) = swap_score(item, c);
            SwapSuggestion {
                food: c,
                similarity,
                score,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(topk);
    ranked
}

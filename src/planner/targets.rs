use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{MacroSplit, MacroTotals, Preferences, Slot};
use crate::planner::constants::*;

/// A calorie/macro goal for a day, a meal or a slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTarget {
    pub kcal: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl MacroTarget {
    /// Uniform share of this target across `meals` meals.
    pub fn per_meal(&self, meals: usize) -> MacroTarget {
        if meals == 0 {
            return *self;
        }
        self.scaled(1.0 / meals as f64)
    }

    pub fn scaled(&self, factor: f64) -> MacroTarget {
        MacroTarget {
            kcal: self.kcal * factor,
            protein_g: self.protein_g * factor,
            carbs_g: self.carbs_g * factor,
            fat_g: self.fat_g * factor,
        }
    }

    /// Calories implied by the macro grams.
    pub fn macro_kcal(&self) -> f64 {
        self.protein_g * KCAL_PER_G_PROTEIN
            + self.carbs_g * KCAL_PER_G_CARBS
            + self.fat_g * KCAL_PER_G_FAT
    }

    /// Weighted L1 distance between totals and this target.
    ///
    /// Protein and fat deviations count twice as much as kcal and carbs.
    pub fn score(&self, totals: &MacroTotals) -> f64 {
        (totals.kcal - self.kcal).abs() * KCAL_WEIGHT
            + (totals.protein_g - self.protein_g).abs() * PROTEIN_WEIGHT
            + (totals.carbs_g - self.carbs_g).abs() * CARBS_WEIGHT
            + (totals.fat_g - self.fat_g).abs() * FAT_WEIGHT
    }
}

/// Gram targets for a calorie total and a macro split.
///
/// Precondition: the shares sum to at most 1.0 (enforced by
/// [`MacroSplit::new`]). Negative shares are treated as zero.
pub fn macro_targets(total_kcal: f64, protein_pct: f64, carbs_pct: f64, fat_pct: f64) -> MacroTarget {
    MacroTarget {
        kcal: total_kcal,
        protein_g: total_kcal * protein_pct.max(0.0) / KCAL_PER_G_PROTEIN,
        carbs_g: total_kcal * carbs_pct.max(0.0) / KCAL_PER_G_CARBS,
        fat_g: total_kcal * fat_pct.max(0.0) / KCAL_PER_G_FAT,
    }
}

pub fn targets_for_split(total_kcal: f64, split: &MacroSplit) -> MacroTarget {
    macro_targets(total_kcal, split.protein, split.carbs, split.fat)
}

/// Daily target for a preferences snapshot (effective kcal, resolved split).
pub fn daily_target(prefs: &Preferences) -> Result<MacroTarget> {
    let split = prefs.resolved_split()?;
    Ok(targets_for_split(prefs.effective_kcal(), &split))
}

/// Weighted per-slot targets.
///
/// Slot weights are renormalized over the given slots, so the per-slot kcal
/// always adds back up to the daily kcal.
pub fn slot_targets(daily: &MacroTarget, slots: &[Slot]) -> Vec<(Slot, MacroTarget)> {
    let total_weight: f64 = slots.iter().map(|s| s.weight()).sum();
    if total_weight <= 0.0 {
        return Vec::new();
    }
    slots
        .iter()
        .map(|&slot| (slot, daily.scaled(slot.weight() / total_weight)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macro_targets_scenario() {
        let t = macro_targets(2000.0, 0.30, 0.40, 0.30);
        assert!((t.protein_g - 150.0).abs() < 1e-9);
        assert!((t.carbs_g - 200.0).abs() < 1e-9);
        assert!((t.fat_g - 66.666_666).abs() < 1e-3);
        assert!((t.macro_kcal() - 2000.0).abs() < 1e-6);
    }

    #[test]
    fn test_negative_share_is_zero() {
        let t = macro_targets(2000.0, -0.1, 0.5, 0.2);
        assert_eq!(t.protein_g, 0.0);
    }

    #[test]
    fn test_per_meal() {
        let t = macro_targets(2000.0, 0.30, 0.40, 0.30).per_meal(4);
        assert!((t.kcal - 500.0).abs() < 1e-9);
        assert!((t.protein_g - 37.5).abs() < 1e-9);
    }

    #[test]
    fn test_score_weights() {
        let target = MacroTarget {
            kcal: 500.0,
            protein_g: 30.0,
            carbs_g: 50.0,
            fat_g: 20.0,
        };
        let totals = MacroTotals {
            kcal: 510.0,
            protein_g: 25.0,
            carbs_g: 52.0,
            fat_g: 21.0,
        };
        // 10 + 2*5 + 2 + 2*1
        assert!((target.score(&totals) - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_slot_targets_canonical_day() {
        let daily = macro_targets(2000.0, 0.30, 0.40, 0.30);
        let slots = slot_targets(&daily, &Slot::ALL);
        assert_eq!(slots.len(), 4);
        assert!((slots[1].1.kcal - 700.0).abs() < 1e-9);
        let sum: f64 = slots.iter().map(|(_, t)| t.kcal).sum();
        assert!((sum - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_slot_targets_renormalize() {
        let daily = macro_targets(1800.0, 0.30, 0.40, 0.30);
        let slots = slot_targets(&daily, &Slot::layout(3));
        let sum: f64 = slots.iter().map(|(_, t)| t.kcal).sum();
        assert!((sum - 1800.0).abs() < 1e-9);
    }
}

use serde::{Deserialize, Serialize};

use crate::planner::constants::*;

/// A named meal occasion with its own calorie share and acceptable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Breakfast,
    Lunch,
    Snack,
    Dinner,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Breakfast, Slot::Lunch, Slot::Snack, Slot::Dinner];

    /// Parse a slot name (case-insensitive). Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Slot> {
        match name.trim().to_lowercase().as_str() {
            "breakfast" => Some(Slot::Breakfast),
            "lunch" => Some(Slot::Lunch),
            "snack" => Some(Slot::Snack),
            "dinner" => Some(Slot::Dinner),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Slot::Breakfast => "breakfast",
            Slot::Lunch => "lunch",
            Slot::Snack => "snack",
            Slot::Dinner => "dinner",
        }
    }

    /// Share of the daily target assigned to this slot.
    pub fn weight(self) -> f64 {
        match self {
            Slot::Breakfast => BREAKFAST_WEIGHT,
            Slot::Lunch => LUNCH_WEIGHT,
            Slot::Snack => SNACK_WEIGHT,
            Slot::Dinner => DINNER_WEIGHT,
        }
    }

    /// Acceptable meal calories (inclusive) for the calorie guardrail.
    pub fn kcal_range(self) -> (f64, f64) {
        match self {
            Slot::Breakfast => BREAKFAST_KCAL_RANGE,
            Slot::Lunch => LUNCH_KCAL_RANGE,
            Slot::Snack => SNACK_KCAL_RANGE,
            Slot::Dinner => DINNER_KCAL_RANGE,
        }
    }

    pub fn accepts_kcal(self, kcal: f64) -> bool {
        let (lo, hi) = self.kcal_range();
        kcal >= lo && kcal <= hi
    }

    /// Lunch and dinner must carry a protein-bearing item.
    pub fn requires_protein(self) -> bool {
        matches!(self, Slot::Lunch | Slot::Dinner)
    }

    /// Slot sequence for a day with `meal_count` meals.
    ///
    /// Four meals map to the canonical breakfast/lunch/snack/dinner day. Larger
    /// counts add snacks before dinner.
    pub fn layout(meal_count: usize) -> Vec<Slot> {
        match meal_count {
            0 => Vec::new(),
            1 => vec![Slot::Lunch],
            2 => vec![Slot::Lunch, Slot::Dinner],
            3 => vec![Slot::Breakfast, Slot::Lunch, Slot::Dinner],
            4 => Slot::ALL.to_vec(),
            n => {
                let mut slots = vec![Slot::Breakfast, Slot::Snack, Slot::Lunch];
                slots.extend(std::iter::repeat_n(Slot::Snack, n - 4));
                slots.push(Slot::Dinner);
                slots
            }
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = Slot::ALL.iter().map(|s| s.weight()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_layout_lengths() {
        for n in 0..=8 {
            assert_eq!(Slot::layout(n).len(), n);
        }
        assert_eq!(Slot::layout(4), Slot::ALL.to_vec());
        assert_eq!(*Slot::layout(6).last().unwrap(), Slot::Dinner);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Slot::parse("Lunch"), Some(Slot::Lunch));
        assert_eq!(Slot::parse(" dinner "), Some(Slot::Dinner));
        assert_eq!(Slot::parse("brunch"), None);
    }

    #[test]
    fn test_lunch_range() {
        assert!(Slot::Lunch.accepts_kcal(500.0));
        assert!(Slot::Lunch.accepts_kcal(850.0));
        assert!(!Slot::Lunch.accepts_kcal(499.0));
        assert!(!Slot::Snack.requires_protein());
    }
}

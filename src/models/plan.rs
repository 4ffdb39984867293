use std::collections::HashMap;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::models::{FoodItem, Slot};

/// Summed calories and macros of a set of items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub kcal: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl MacroTotals {
    /// Totals of plain catalog items (each counted once).
    pub fn of_foods<'a>(foods: impl IntoIterator<Item = &'a FoodItem>) -> Self {
        let mut totals = Self::default();
        for food in foods {
            totals.add_food(food, 1.0);
        }
        totals
    }

    pub fn add_food(&mut self, food: &FoodItem, quantity: f64) {
        self.kcal += food.kcal * quantity;
        self.protein_g += food.protein_g * quantity;
        self.carbs_g += food.carbs_g * quantity;
        self.fat_g += food.fat_g * quantity;
    }
}

impl AddAssign for MacroTotals {
    fn add_assign(&mut self, rhs: Self) {
        self.kcal += rhs.kcal;
        self.protein_g += rhs.protein_g;
        self.carbs_g += rhs.carbs_g;
        self.fat_g += rhs.fat_g;
    }
}

/// One chosen food inside a meal, with a consumer-adjustable quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealItem {
    pub food: FoodItem,
    pub quantity: f64,
}

impl MealItem {
    pub fn new(food: FoodItem) -> Self {
        Self {
            food,
            quantity: 1.0,
        }
    }

    pub fn grams(&self) -> f64 {
        self.food.portion_g * self.quantity
    }
}

/// Items chosen for one eating occasion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub slot: Slot,
    pub items: Vec<MealItem>,
}

impl Meal {
    pub fn new(slot: Slot, foods: Vec<&FoodItem>) -> Self {
        Self {
            slot,
            items: foods.into_iter().cloned().map(MealItem::new).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn totals(&self) -> MacroTotals {
        let mut totals = MacroTotals::default();
        for item in &self.items {
            totals.add_food(&item.food, item.quantity);
        }
        totals
    }

    /// Set the quantity multiplier of one item.
    pub fn set_quantity(&mut self, index: usize, quantity: f64) -> Result<()> {
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(PlannerError::InvalidInput(format!(
                "invalid quantity: {quantity}"
            )));
        }
        let len = self.items.len();
        let item = self.items.get_mut(index).ok_or(PlannerError::IndexOutOfRange {
            what: "item",
            index,
            len,
        })?;
        item.quantity = quantity;
        Ok(())
    }

    /// Replace one item with a copy of `replacement`, keeping its quantity.
    pub fn substitute(&mut self, index: usize, replacement: &FoodItem) -> Result<FoodItem> {
        let len = self.items.len();
        let item = self.items.get_mut(index).ok_or(PlannerError::IndexOutOfRange {
            what: "item",
            index,
            len,
        })?;
        Ok(std::mem::replace(&mut item.food, replacement.clone()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub meals: Vec<Meal>,
}

impl Day {
    pub fn totals(&self) -> MacroTotals {
        let mut totals = MacroTotals::default();
        for meal in &self.meals {
            totals += meal.totals();
        }
        totals
    }

    pub fn is_empty(&self) -> bool {
        self.meals.iter().all(Meal::is_empty)
    }
}

/// Aggregated portions of one food across a plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingEntry {
    pub name: String,
    pub portions: f64,
    pub grams: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub days: Vec<Day>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Day::is_empty)
    }

    pub fn meal(&self, day: usize, meal: usize) -> Result<&Meal> {
        let d = self.days.get(day).ok_or(PlannerError::IndexOutOfRange {
            what: "day",
            index: day,
            len: self.days.len(),
        })?;
        d.meals.get(meal).ok_or(PlannerError::IndexOutOfRange {
            what: "meal",
            index: meal,
            len: d.meals.len(),
        })
    }

    pub fn meal_mut(&mut self, day: usize, meal: usize) -> Result<&mut Meal> {
        let day_count = self.days.len();
        let d = self.days.get_mut(day).ok_or(PlannerError::IndexOutOfRange {
            what: "day",
            index: day,
            len: day_count,
        })?;
        let meal_count = d.meals.len();
        d.meals.get_mut(meal).ok_or(PlannerError::IndexOutOfRange {
            what: "meal",
            index: meal,
            len: meal_count,
        })
    }

    /// Portions per food name across the whole plan, most-used first.
    pub fn shopping_list(&self) -> Vec<ShoppingEntry> {
        let mut by_name: HashMap<&str, ShoppingEntry> = HashMap::new();
        for item in self
            .days
            .iter()
            .flat_map(|d| &d.meals)
            .flat_map(|m| &m.items)
        {
            let entry = by_name
                .entry(item.food.name.as_str())
                .or_insert_with(|| ShoppingEntry {
                    name: item.food.name.clone(),
                    portions: 0.0,
                    grams: 0.0,
                    unit: item.food.unit.clone(),
                });
            entry.portions += item.quantity;
            entry.grams += item.grams();
        }

        let mut list: Vec<ShoppingEntry> = by_name.into_values().collect();
        list.sort_by(|a, b| {
            b.portions
                .partial_cmp(&a.portions)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        list
    }
}

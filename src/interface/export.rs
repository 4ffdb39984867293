use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::models::{Plan, ShoppingEntry};

#[derive(Debug, Serialize)]
struct PlanRow<'a> {
    day: usize,
    meal: usize,
    slot: &'a str,
    item: &'a str,
    group: &'a str,
    quantity: f64,
    grams: f64,
    kcal: f64,
    protein_g: f64,
    carbs_g: f64,
    fat_g: f64,
}

/// One CSV row per chosen item, with quantity-scaled macros.
pub fn write_plan_csv<W: Write>(writer: W, plan: &Plan) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (d, day) in plan.days.iter().enumerate() {
        for (m, meal) in day.meals.iter().enumerate() {
            for item in &meal.items {
                let q = item.quantity;
                wtr.serialize(PlanRow {
                    day: d + 1,
                    meal: m + 1,
                    slot: meal.slot.name(),
                    item: &item.food.name,
                    group: &item.food.group,
                    quantity: q,
                    grams: item.grams(),
                    kcal: item.food.kcal * q,
                    protein_g: item.food.protein_g * q,
                    carbs_g: item.food.carbs_g * q,
                    fat_g: item.food.fat_g * q,
                })?;
            }
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_shopping_csv<W: Write>(writer: W, list: &[ShoppingEntry]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for entry in list {
        wtr.serialize(entry)?;
    }
    wtr.flush()?;
    Ok(())
}

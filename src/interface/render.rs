use crate::interface::labels::labels;
use crate::models::{Language, MacroTotals, Plan, Preferences, ShoppingEntry, Slot};
use crate::planner::{MacroTarget, SwapSuggestion};

fn macro_line(totals: &MacroTotals, lang: Language) -> String {
    let l = labels(lang);
    format!(
        "{:>4.0} kcal | {} {:.0}g  {} {:.0}g  {} {:.0}g",
        totals.kcal, l.protein, totals.protein_g, l.carbs, totals.carbs_g, l.fat, totals.fat_g
    )
}

/// Display the daily targets for a preferences snapshot.
pub fn display_targets(prefs: &Preferences, daily: &MacroTarget) {
    let l = labels(prefs.language);
    println!();
    println!("=== {} ===", l.targets);
    println!("{}", prefs.profile.label(prefs.language));
    println!(
        "{:.0} {} ({}: {:.0})",
        prefs.base_kcal,
        l.per_day,
        l.effective,
        daily.kcal
    );
    println!(
        "{} {:.0}g  {} {:.0}g  {} {:.0}g",
        l.protein, daily.protein_g, l.carbs, daily.carbs_g, l.fat, daily.fat_g
    );
    println!();
}

pub fn display_meal_targets(targets: &[(Slot, MacroTarget)], lang: Language) {
    let l = labels(lang);
    for (i, (slot, t)) in targets.iter().enumerate() {
        println!(
            "  {} {} ({:<9}) {:>4.0} kcal | {} {:.0}g  {} {:.0}g  {} {:.0}g",
            l.meal,
            i + 1,
            slot.name(),
            t.kcal,
            l.protein,
            t.protein_g,
            l.carbs,
            t.carbs_g,
            l.fat,
            t.fat_g
        );
    }
    println!();
}

/// Display a plan, day by day, with per-meal totals.
pub fn display_plan(plan: &Plan, prefs: &Preferences, daily: &MacroTarget) {
    let l = labels(prefs.language);

    if plan.is_empty() {
        println!("No meal plan generated (no foods left after filtering).");
        return;
    }

    println!();
    println!(
        "=== Plan: {} {} at {:.0} {} ({}: {:.0}) ===",
        plan.days.len(),
        l.days_unit,
        prefs.base_kcal,
        l.per_day,
        l.effective,
        daily.kcal
    );

    for (d_idx, day) in plan.days.iter().enumerate() {
        println!();
        println!("--- {} {} | {} ---", l.day, d_idx + 1, macro_line(&day.totals(), prefs.language));

        for (m_idx, meal) in day.meals.iter().enumerate() {
            println!(
                "  {} {} ({}) | {}",
                l.meal,
                m_idx + 1,
                meal.slot,
                macro_line(&meal.totals(), prefs.language)
            );
            for item in &meal.items {
                let qty = if (item.quantity - 1.0).abs() > f64::EPSILON {
                    format!(" x{:.2}", item.quantity)
                } else {
                    String::new()
                };
                println!(
                    "      - {} (~{:.0} {}){}",
                    item.food.name, item.food.portion_g, item.food.unit, qty
                );
            }
        }
    }

    println!();
    println!("{}", l.tip);
    println!();
}

pub fn display_shopping_list(list: &[ShoppingEntry], lang: Language) {
    let l = labels(lang);
    if list.is_empty() {
        return;
    }

    let width = list.iter().map(|e| e.name.len()).max().unwrap_or(10).max(l.item.len());

    println!("=== {} ===", l.shopping);
    println!("{:<width$}  {:>8}", l.item, l.portions, width = width);
    for entry in list {
        println!(
            "{:<width$}  {:>8.1}  (~{:.0} {})",
            entry.name,
            entry.portions,
            entry.grams,
            entry.unit,
            width = width
        );
    }
    println!();
}

/// Display ranked swap suggestions for one item.
pub fn display_swaps(item_name: &str, swaps: &[SwapSuggestion<'_>], lang: Language) {
    let l = labels(lang);
    if swaps.is_empty() {
        println!("{} / {}: (none)", l.swaps, item_name);
        return;
    }

    println!("{} / {}:", l.swaps, item_name);
    for (i, s) in swaps.iter().enumerate() {
        println!(
            "{:>3}. {} [{}] - {:.0} kcal, {} {:.1}g {} {:.1}g {} {:.1}g  (score {:.3})",
            i + 1,
            s.food.name,
            s.food.group,
            s.food.kcal,
            l.protein,
            s.food.protein_g,
            l.carbs,
            s.food.carbs_g,
            l.fat,
            s.food.fat_g,
            s.score
        );
    }
}

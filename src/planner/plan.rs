use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PlannerError, Result};
use crate::models::{Day, FoodItem, Meal, Plan, PlanMode, Preferences, Slot};
use crate::planner::composer::{
    ComposerConfig, chance, compose_for_slot, draw_meal, sample_meal_size, score_meal, search_meal,
};
use crate::planner::constants::MIN_DAY_MEAL_ITEMS;
use crate::planner::targets::{MacroTarget, daily_target, slot_targets};

/// Meals the caller has locked, as `(day, meal)` indices.
pub type MealLocks = HashSet<(usize, usize)>;

/// Everything the plan composer needs, resolved from preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub days: usize,
    pub meal_count: usize,
    pub max_items: usize,
    pub mode: PlanMode,
    pub daily: MacroTarget,
}

impl PlanRequest {
    pub fn from_preferences(prefs: &Preferences) -> Result<Self> {
        prefs.validate()?;
        Ok(Self {
            days: prefs.days,
            meal_count: prefs.meal_count,
            max_items: prefs.max_items,
            mode: prefs.mode,
            daily: daily_target(prefs)?,
        })
    }

    /// Slot and target for each meal of a day, in order.
    pub fn meal_targets(&self) -> Vec<(Slot, MacroTarget)> {
        let slots = Slot::layout(self.meal_count);
        match self.mode {
            PlanMode::Uniform => {
                let per_meal = self.daily.per_meal(self.meal_count);
                slots.into_iter().map(|s| (s, per_meal)).collect()
            }
            PlanMode::Slots => slot_targets(&self.daily, &slots),
        }
    }
}

/// Candidates for the next meal of a day: items not yet used today, plus each
/// used item with probability `reuse_probability`.
fn fresh_candidates<'a, R: Rng + ?Sized>(
    all: &[&'a FoodItem],
    used: &HashSet<&str>,
    reuse_probability: f64,
    rng: &mut R,
) -> Vec<&'a FoodItem> {
    all.iter()
        .copied()
        .filter(|f| !used.contains(f.name.as_str()) || chance(rng, reuse_probability))
        .collect()
}

/// Compose a day of `meal_count` meals against uniform per-meal targets.
///
/// Runs `day_trials` whole-day samples and keeps the day with the lowest
/// summed meal score. Within a trial, items already used that day are mostly
/// kept out of later meals.
pub fn build_day<R: Rng + ?Sized>(
    pool: &[FoodItem],
    target: &MacroTarget,
    meal_count: usize,
    max_items: usize,
    config: &ComposerConfig,
    rng: &mut R,
) -> Day {
    let slots = Slot::layout(meal_count);
    let all: Vec<&FoodItem> = pool.iter().collect();
    if all.is_empty() || slots.is_empty() {
        return Day::default();
    }

    let meal_target = target.per_meal(meal_count);
    let mut best: Option<(Vec<Vec<&FoodItem>>, f64)> = None;

    'trials: for _ in 0..config.day_trials.max(1) {
        let mut used: HashSet<&str> = HashSet::new();
        let mut meals = Vec::with_capacity(slots.len());
        let mut total = 0.0;

        for _ in &slots {
            let k = sample_meal_size(rng, config, max_items, all.len(), MIN_DAY_MEAL_ITEMS);
            let mut candidates = fresh_candidates(&all, &used, config.reuse_probability, rng);
            if candidates.len() < k {
                candidates = all.clone();
            }
            if candidates.is_empty() {
                continue 'trials;
            }

            let items = draw_meal(&candidates, k, config, rng);
            total += score_meal(&items, &meal_target);
            used.extend(items.iter().map(|&f| f.name.as_str()));
            meals.push(items);
        }

        if best.as_ref().is_none_or(|(_, s)| total < *s) {
            best = Some((meals, total));
        }
    }

    match best {
        Some((meals, score)) => {
            debug!(score, meals = meals.len(), "Composed day");
            Day {
                meals: slots
                    .into_iter()
                    .zip(meals)
                    .map(|(slot, items)| Meal::new(slot, items))
                    .collect(),
            }
        }
        None => Day::default(),
    }
}

/// Compose a day slot by slot against weighted per-slot targets, applying the
/// slot guardrails and the same within-day repetition bias as [`build_day`].
pub fn build_slotted_day<R: Rng + ?Sized>(
    pool: &[FoodItem],
    target: &MacroTarget,
    meal_count: usize,
    max_items: usize,
    config: &ComposerConfig,
    rng: &mut R,
) -> Day {
    let all: Vec<&FoodItem> = pool.iter().collect();
    if all.is_empty() {
        return Day::default();
    }

    let mut used: HashSet<&str> = HashSet::new();
    let mut meals = Vec::with_capacity(meal_count);

    for (slot, slot_target) in slot_targets(target, &Slot::layout(meal_count)) {
        let mut candidates = fresh_candidates(&all, &used, config.reuse_probability, rng);
        if candidates.len() < max_items.min(all.len()) {
            candidates = all.clone();
        }
        let items = compose_for_slot(&candidates, &all, &slot_target, max_items, slot, config, rng);
        used.extend(items.iter().map(|&f| f.name.as_str()));
        meals.push(Meal::new(slot, items));
    }

    Day { meals }
}

fn compose_day<R: Rng + ?Sized>(
    pool: &[FoodItem],
    request: &PlanRequest,
    config: &ComposerConfig,
    rng: &mut R,
) -> Day {
    match request.mode {
        PlanMode::Uniform => build_day(
            pool,
            &request.daily,
            request.meal_count,
            request.max_items,
            config,
            rng,
        ),
        PlanMode::Slots => build_slotted_day(
            pool,
            &request.daily,
            request.meal_count,
            request.max_items,
            config,
            rng,
        ),
    }
}

/// Compose a whole plan: one independent day per requested day.
pub fn generate_plan<R: Rng + ?Sized>(
    pool: &[FoodItem],
    request: &PlanRequest,
    config: &ComposerConfig,
    rng: &mut R,
) -> Plan {
    info!(
        days = request.days,
        meals = request.meal_count,
        pool = pool.len(),
        kcal = request.daily.kcal,
        "Generating plan"
    );

    Plan {
        days: (0..request.days)
            .map(|_| compose_day(pool, request, config, rng))
            .collect(),
    }
}

/// Replace one day of an existing plan.
pub fn regenerate_day<R: Rng + ?Sized>(
    plan: &mut Plan,
    day: usize,
    pool: &[FoodItem],
    request: &PlanRequest,
    config: &ComposerConfig,
    rng: &mut R,
) -> Result<()> {
    let len = plan.days.len();
    let slot = plan.days.get_mut(day).ok_or(PlannerError::IndexOutOfRange {
        what: "day",
        index: day,
        len,
    })?;
    *slot = compose_day(pool, request, config, rng);
    Ok(())
}

/// Replace one meal, keeping its slot. Items used by the other meals of the
/// same day are discouraged the same way as during day composition.
pub fn regenerate_meal<R: Rng + ?Sized>(
    plan: &mut Plan,
    day: usize,
    meal: usize,
    pool: &[FoodItem],
    request: &PlanRequest,
    config: &ComposerConfig,
    rng: &mut R,
) -> Result<()> {
    let slot = plan.meal(day, meal)?.slot;
    let target = request
        .meal_targets()
        .get(meal)
        .filter(|(s, _)| *s == slot)
        .map(|(_, t)| *t)
        .unwrap_or_else(|| match request.mode {
            PlanMode::Uniform => request.daily.per_meal(request.meal_count),
            PlanMode::Slots => request.daily.scaled(slot.weight()),
        });

    let all: Vec<&FoodItem> = pool.iter().collect();
    let items: Vec<FoodItem> = {
        let others: HashSet<&str> = plan.days[day]
            .meals
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != meal)
            .flat_map(|(_, m)| m.items.iter().map(|it| it.food.name.as_str()))
            .collect();

        let mut candidates = fresh_candidates(&all, &others, config.reuse_probability, rng);
        if candidates.len() < request.max_items.min(all.len()) {
            candidates = all.clone();
        }

        let chosen = match request.mode {
            PlanMode::Uniform => search_meal(
                &candidates,
                &target,
                request.max_items,
                MIN_DAY_MEAL_ITEMS,
                config,
                rng,
            )
            .map(|(items, _)| items)
            .unwrap_or_default(),
            PlanMode::Slots => {
                compose_for_slot(&candidates, &all, &target, request.max_items, slot, config, rng)
            }
        };
        chosen.into_iter().cloned().collect()
    };

    let refs: Vec<&FoodItem> = items.iter().collect();
    *plan.meal_mut(day, meal)? = Meal::new(slot, refs);
    Ok(())
}

/// Regenerate every meal that is not locked. Returns how many were replaced.
pub fn regenerate_unlocked<R: Rng + ?Sized>(
    plan: &mut Plan,
    locks: &MealLocks,
    pool: &[FoodItem],
    request: &PlanRequest,
    config: &ComposerConfig,
    rng: &mut R,
) -> Result<usize> {
    let positions: Vec<(usize, usize)> = plan
        .days
        .iter()
        .enumerate()
        .flat_map(|(d, day)| (0..day.meals.len()).map(move |m| (d, m)))
        .filter(|pos| !locks.contains(pos))
        .collect();

    for &(day, meal) in &positions {
        regenerate_meal(plan, day, meal, pool, request, config, rng)?;
    }
    Ok(positions.len())
}

use std::str::FromStr;

use dialoguer::{Confirm, Input, MultiSelect, Select};

use crate::error::{PlannerError, Result};
use crate::interface::labels::labels;
use crate::models::{Diet, FoodItem, Language, MacroSplit, PlanMode, Preferences, Profile};
use crate::planner::filters::parse_dislikes;
use crate::state::{Catalog, fuzzy_rank};

/// Prompt for a number, re-asking until it parses.
fn prompt_number<T>(prompt: &str, default: T) -> Result<T>
where
    T: FromStr + ToString,
{
    loop {
        let input: String = Input::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .interact_text()?;

        match input.trim().parse() {
            Ok(value) => return Ok(value),
            Err(_) => println!("Invalid number: {}", input.trim()),
        }
    }
}

pub fn prompt_language(default: Language) -> Result<Language> {
    let selection = Select::new()
        .with_prompt("Language / Jezik")
        .items(&["EN", "SR"])
        .default(if default == Language::Sr { 1 } else { 0 })
        .interact()?;
    Ok(if selection == 1 { Language::Sr } else { Language::En })
}

pub fn prompt_diet(default: Diet) -> Result<Diet> {
    let names: Vec<&str> = Diet::ALL.iter().map(|d| d.name()).collect();
    let current = Diet::ALL.iter().position(|d| *d == default).unwrap_or(0);
    let selection = Select::new()
        .with_prompt("Diet")
        .items(&names)
        .default(current)
        .interact()?;
    Ok(Diet::ALL.get(selection).copied().unwrap_or_default())
}

pub fn prompt_profile(default: Profile, lang: Language) -> Result<Profile> {
    let names: Vec<&str> = Profile::ALL.iter().map(|p| p.label(lang)).collect();
    let current = Profile::ALL.iter().position(|p| *p == default).unwrap_or(0);
    let selection = Select::new()
        .with_prompt("Profile")
        .items(&names)
        .default(current)
        .interact()?;
    Ok(Profile::ALL.get(selection).copied().unwrap_or_default())
}

/// Ask for protein and carbs percentages; fat takes the remainder.
pub fn prompt_custom_split(default: MacroSplit, lang: Language) -> Result<MacroSplit> {
    loop {
        let protein: f64 = prompt_number("Protein %", (default.protein * 100.0).round())?;
        let carbs: f64 = prompt_number("Carbs %", (default.carbs * 100.0).round())?;

        match MacroSplit::from_percentages(protein, carbs, None) {
            Ok(split) => {
                println!("Fat %: {:.0}", split.fat * 100.0);
                return Ok(split);
            }
            Err(PlannerError::InvalidMacroSplit { .. }) => println!("{}", labels(lang).macros_error),
            Err(e) => return Err(e),
        }
    }
}

fn prompt_multi(prompt: &str, options: &[&str], selected: &[String]) -> Result<Vec<String>> {
    if options.is_empty() {
        return Ok(Vec::new());
    }
    let defaults: Vec<bool> = options
        .iter()
        .map(|o| selected.iter().any(|s| s == o))
        .collect();
    let chosen = MultiSelect::new()
        .with_prompt(prompt)
        .items(options)
        .defaults(&defaults)
        .interact()?;
    Ok(chosen.into_iter().map(|i| options[i].to_string()).collect())
}

pub fn prompt_mode(default: PlanMode) -> Result<PlanMode> {
    let selection = Select::new()
        .with_prompt("Meal targets")
        .items(&["uniform (equal share per meal)", "slots (breakfast/lunch/snack/dinner)"])
        .default(if default == PlanMode::Slots { 1 } else { 0 })
        .interact()?;
    Ok(if selection == 1 { PlanMode::Slots } else { PlanMode::Uniform })
}

/// Walk the user through every preference, starting from `base`.
pub fn collect_preferences(catalog: &Catalog, base: Preferences) -> Result<Preferences> {
    let language = prompt_language(base.language)?;
    let days: usize = prompt_number("Days", base.days)?;
    let base_kcal: f64 = prompt_number("Daily calories (base)", base.base_kcal)?;
    let meal_count: usize = prompt_number("Meals per day", base.meal_count)?;
    let diet = prompt_diet(base.diet)?;
    let profile = prompt_profile(base.profile, language)?;
    let split = if profile == Profile::Custom {
        prompt_custom_split(base.split, language)?
    } else {
        base.split
    };
    let max_items: usize = prompt_number("Max items per meal", base.max_items)?;

    let tags: Vec<&str> = catalog.all_tags().into_iter().collect();
    let exclude_tags = prompt_multi("Exclude allergens (tags)", &tags, &base.exclude_tags)?;
    let groups: Vec<&str> = catalog.all_groups().into_iter().collect();
    let exclude_groups = prompt_multi("Exclude food groups", &groups, &base.exclude_groups)?;

    let dislikes: String = Input::new()
        .with_prompt("Dislikes (comma-separated names)")
        .default(base.dislikes.join(", "))
        .allow_empty(true)
        .interact_text()?;

    let mode = prompt_mode(base.mode)?;

    let prefs = Preferences {
        days,
        base_kcal,
        meal_count,
        diet,
        profile,
        split,
        max_items,
        exclude_tags,
        exclude_groups,
        dislikes: parse_dislikes(&dislikes),
        language,
        mode,
        ..base
    };
    prefs.validate()?;
    Ok(prefs)
}

/// Prompt for a food name with fuzzy matching. Empty input returns `None`.
pub fn prompt_food<'a>(foods: &'a [FoodItem], prompt: &str) -> Result<Option<&'a FoodItem>> {
    loop {
        let input: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;

        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        let key = input.to_lowercase();
        if let Some(food) = foods.iter().find(|f| f.key() == key) {
            return Ok(Some(food));
        }

        let candidates = fuzzy_rank(foods, input);
        match candidates.as_slice() {
            [] => println!("No matching food found for '{}'", input),
            [(food, _)] => {
                if prompt_yes_no(&format!("Did you mean '{}'?", food.name), true)? {
                    return Ok(Some(*food));
                }
            }
            _ => {
                let mut options: Vec<&str> = candidates
                    .iter()
                    .take(5)
                    .map(|(f, _)| f.name.as_str())
                    .collect();
                let shown = options.len();
                options.push("None of these");

                let selection = Select::new()
                    .with_prompt("Which did you mean?")
                    .items(&options)
                    .default(0)
                    .interact()?;

                if selection < shown {
                    return Ok(Some(candidates[selection].0));
                }
            }
        }
    }
}

/// Ask for a 1-based position in `1..=len`; returns it 0-based.
pub fn prompt_index(prompt: &str, len: usize) -> Result<usize> {
    if len == 0 {
        return Err(PlannerError::InvalidInput(format!("{prompt}: nothing to choose from")));
    }
    loop {
        let n: usize = prompt_number(&format!("{prompt} (1-{len})"), 1)?;
        if (1..=len).contains(&n) {
            return Ok(n - 1);
        }
        println!("Please enter a number between 1 and {len}.");
    }
}

/// Pick one of `options`, or `None` for the trailing "keep" entry.
pub fn prompt_choice(prompt: &str, options: &[String], keep_label: &str) -> Result<Option<usize>> {
    let mut items: Vec<&str> = options.iter().map(String::as_str).collect();
    items.push(keep_label);

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;

    Ok((selection < options.len()).then_some(selection))
}

pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

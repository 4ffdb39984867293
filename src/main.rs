use clap::Parser;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use meal_plan_maker_rs::cli::{
    Cli, Command, PreferenceArgs, PresetAction, SearchArgs, parse_lock,
};
use meal_plan_maker_rs::error::{PlannerError, Result};
use meal_plan_maker_rs::interface::{
    collect_preferences, display_meal_targets, display_plan, display_shopping_list,
    display_swaps, display_targets, prompt_choice, prompt_food, prompt_index, prompt_yes_no,
    write_plan_csv, write_shopping_csv,
};
use meal_plan_maker_rs::models::{FoodItem, Language, Plan};
use meal_plan_maker_rs::planner::{
    DEFAULT_SWAP_TOLERANCE, DEFAULT_SWAP_TOPK, MealLocks, PlanRequest, daily_target,
    generate_plan, pool_for, regenerate_day, regenerate_meal, regenerate_unlocked,
    suggest_swaps,
};
use meal_plan_maker_rs::state::{Catalog, PresetStore, load_catalog, load_plan, save_plan};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Plan {
            prefs,
            search,
            interactive,
            json,
            csv,
            shopping_csv,
            swaps,
        } => cmd_plan(
            &cli.catalog,
            &prefs,
            &search,
            interactive,
            Exports {
                json,
                csv,
                shopping_csv,
            },
            swaps,
        ),
        Command::Regenerate {
            plan,
            prefs,
            search,
            day,
            meal,
            locks,
            output,
        } => cmd_regenerate(&cli.catalog, &plan, &prefs, &search, day, meal, &locks, output),
        Command::Targets { prefs } => cmd_targets(&prefs),
        Command::Swap {
            name,
            prefs,
            topk,
            tolerance,
        } => cmd_swap(&cli.catalog, name.as_deref(), &prefs, topk, tolerance),
        Command::Preset { action } => cmd_preset(&cli.catalog, action),
    }
}

struct Exports {
    json: Option<PathBuf>,
    csv: Option<PathBuf>,
    shopping_csv: Option<PathBuf>,
}

/// Load the catalog, or report a missing file and return `None`.
fn open_catalog(path: &Path) -> Result<Option<Catalog>> {
    if !path.exists() {
        eprintln!("Food catalog not found: {}", path.display());
        eprintln!("Pass --catalog <FILE> or create foods.json in the current directory.");
        return Ok(None);
    }

    let catalog = load_catalog(path)?;
    println!("Loaded {} foods", catalog.len());
    Ok(Some(catalog))
}

/// Generate, display and optionally export a plan.
fn cmd_plan(
    catalog_path: &Path,
    args: &PreferenceArgs,
    search: &SearchArgs,
    interactive: bool,
    exports: Exports,
    swaps: usize,
) -> Result<()> {
    let Some(catalog) = open_catalog(catalog_path)? else {
        return Ok(());
    };

    let prefs = if interactive {
        collect_preferences(&catalog, args.resolve()?)?
    } else {
        args.resolve()?
    };

    let outcome = pool_for(catalog.foods(), &prefs);
    if let Some(warning) = &outcome.warning {
        println!("Warning: {}", warning);
    }
    if outcome.pool.is_empty() {
        println!("No foods match the selected diet.");
        return Ok(());
    }
    println!("{} foods in pool", outcome.pool.len());

    let request = PlanRequest::from_preferences(&prefs)?;
    let config = search.config();
    let mut rng = search.rng();
    let mut plan = generate_plan(&outcome.pool, &request, &config, &mut rng);

    display_plan(&plan, &prefs, &request.daily);

    if swaps > 0 {
        show_swap_ideas(&plan, &outcome.pool, swaps, prefs.language);
    }

    if interactive {
        let changed = swap_items(&mut plan, &outcome.pool, prefs.language)?;
        if changed > 0 {
            display_plan(&plan, &prefs, &request.daily);
        }
    }

    display_shopping_list(&plan.shopping_list(), prefs.language);
    write_exports(&plan, &exports)
}

fn write_exports(plan: &Plan, exports: &Exports) -> Result<()> {
    if let Some(path) = &exports.json {
        save_plan(path, plan)?;
        println!("Plan saved to {}", path.display());
    }
    if let Some(path) = &exports.csv {
        write_plan_csv(File::create(path)?, plan)?;
        println!("Plan CSV written to {}", path.display());
    }
    if let Some(path) = &exports.shopping_csv {
        write_shopping_csv(File::create(path)?, &plan.shopping_list())?;
        println!("Shopping list written to {}", path.display());
    }
    Ok(())
}

/// Print swap ideas once per distinct planned item.
fn show_swap_ideas(plan: &Plan, pool: &[FoodItem], topk: usize, lang: Language) {
    let mut seen = BTreeSet::new();
    for item in plan
        .days
        .iter()
        .flat_map(|d| &d.meals)
        .flat_map(|m| &m.items)
    {
        if !seen.insert(item.food.key()) {
            continue;
        }
        let swaps = suggest_swaps(&item.food, pool, topk, DEFAULT_SWAP_TOLERANCE);
        display_swaps(&item.food.name, &swaps, lang);
    }
    println!();
}

/// Let the user replace planned items with suggested swaps.
fn swap_items(plan: &mut Plan, pool: &[FoodItem], lang: Language) -> Result<usize> {
    let mut changed = 0;

    while prompt_yes_no("Swap an item?", false)? {
        let day = prompt_index("Day", plan.days.len())?;
        let meal = prompt_index("Meal", plan.days[day].meals.len())?;

        let current = plan.meal(day, meal)?;
        if current.is_empty() {
            println!("That meal is empty.");
            continue;
        }
        let names: Vec<String> = current.items.iter().map(|i| i.food.name.clone()).collect();
        let Some(index) = prompt_choice("Which item?", &names, "Cancel")? else {
            continue;
        };

        let source = current.items[index].food.clone();
        let swaps = suggest_swaps(&source, pool, DEFAULT_SWAP_TOPK, DEFAULT_SWAP_TOLERANCE);
        display_swaps(&source.name, &swaps, lang);
        if swaps.is_empty() {
            continue;
        }

        let options: Vec<String> = swaps.iter().map(|s| s.food.name.clone()).collect();
        if let Some(choice) = prompt_choice("Replace with", &options, "Keep current")? {
            let replacement = swaps[choice].food.clone();
            let old = plan.meal_mut(day, meal)?.substitute(index, &replacement)?;
            println!("Replaced {} with {}", old.name, replacement.name);
            changed += 1;
        }
    }

    Ok(changed)
}

/// Regenerate a saved plan, either one meal, one day, or every unlocked meal.
#[allow(clippy::too_many_arguments)]
fn cmd_regenerate(
    catalog_path: &Path,
    plan_path: &Path,
    args: &PreferenceArgs,
    search: &SearchArgs,
    day: Option<usize>,
    meal: Option<usize>,
    locks: &[String],
    output: Option<PathBuf>,
) -> Result<()> {
    let Some(catalog) = open_catalog(catalog_path)? else {
        return Ok(());
    };
    if !plan_path.exists() {
        eprintln!("Plan file not found: {}", plan_path.display());
        return Ok(());
    }

    let mut plan = load_plan(plan_path)?;
    let prefs = args.resolve()?;
    let outcome = pool_for(catalog.foods(), &prefs);
    if let Some(warning) = &outcome.warning {
        println!("Warning: {}", warning);
    }

    let request = PlanRequest::from_preferences(&prefs)?;
    let config = search.config();
    let mut rng = search.rng();

    let to_index = |n: usize, what: &str| {
        n.checked_sub(1)
            .ok_or_else(|| PlannerError::InvalidInput(format!("{what} numbers start at 1")))
    };

    match (day, meal) {
        (Some(d), Some(m)) => {
            regenerate_meal(
                &mut plan,
                to_index(d, "day")?,
                to_index(m, "meal")?,
                &outcome.pool,
                &request,
                &config,
                &mut rng,
            )?;
            println!("Regenerated day {} meal {}", d, m);
        }
        (Some(d), None) => {
            regenerate_day(&mut plan, to_index(d, "day")?, &outcome.pool, &request, &config, &mut rng)?;
            println!("Regenerated day {}", d);
        }
        (None, _) => {
            let locks: MealLocks = locks
                .iter()
                .map(|l| parse_lock(l))
                .collect::<Result<_>>()?;
            let count =
                regenerate_unlocked(&mut plan, &locks, &outcome.pool, &request, &config, &mut rng)?;
            println!("Regenerated {} meals ({} locked)", count, locks.len());
        }
    }

    display_plan(&plan, &prefs, &request.daily);

    let out = output.unwrap_or_else(|| plan_path.to_path_buf());
    save_plan(&out, &plan)?;
    println!("Plan saved to {}", out.display());
    Ok(())
}

/// Show daily and per-meal targets without composing anything.
fn cmd_targets(args: &PreferenceArgs) -> Result<()> {
    let prefs = args.resolve()?;
    let daily = daily_target(&prefs)?;
    display_targets(&prefs, &daily);

    let request = PlanRequest::from_preferences(&prefs)?;
    display_meal_targets(&request.meal_targets(), prefs.language);
    Ok(())
}

/// Rank replacements for one food against the filtered pool.
fn cmd_swap(
    catalog_path: &Path,
    name: Option<&str>,
    args: &PreferenceArgs,
    topk: usize,
    tolerance: f64,
) -> Result<()> {
    let Some(catalog) = open_catalog(catalog_path)? else {
        return Ok(());
    };

    let item = match name {
        Some(name) => match catalog.find(name) {
            Ok(item) => item,
            Err(e) => {
                if let Some((closest, _)) = catalog.fuzzy_matches(name).first() {
                    eprintln!("Did you mean '{}'?", closest.name);
                }
                return Err(e);
            }
        },
        None => match prompt_food(catalog.foods(), "Food to swap")? {
            Some(item) => item,
            None => return Ok(()),
        },
    };

    let prefs = args.resolve()?;
    let outcome = pool_for(catalog.foods(), &prefs);
    if let Some(warning) = &outcome.warning {
        println!("Warning: {}", warning);
    }

    let swaps = suggest_swaps(item, &outcome.pool, topk, tolerance);
    display_swaps(&item.name, &swaps, prefs.language);
    Ok(())
}

fn cmd_preset(catalog_path: &Path, action: PresetAction) -> Result<()> {
    match action {
        PresetAction::Save {
            name,
            prefs: args,
            interactive,
        } => {
            let prefs = if interactive {
                let catalog = if catalog_path.exists() {
                    load_catalog(catalog_path)?
                } else {
                    Catalog::default()
                };
                collect_preferences(&catalog, args.resolve()?)?
            } else {
                args.resolve()?
            };

            let mut store = PresetStore::load(&args.presets)?;
            store.insert(&name, prefs)?;
            store.save(&args.presets)?;
            println!("Saved preset '{}' to {}", name, args.presets.display());
        }
        PresetAction::List { presets } => {
            let store = PresetStore::load(&presets)?;
            if store.is_empty() {
                println!("No presets saved.");
            }
            for name in store.names() {
                println!("  {}", name);
            }
        }
        PresetAction::Show { name, presets } => {
            let store = PresetStore::load(&presets)?;
            println!("{}", serde_json::to_string_pretty(store.get(&name)?)?);
        }
        PresetAction::Delete { name, presets } => {
            let mut store = PresetStore::load(&presets)?;
            store.remove(&name)?;
            store.save(&presets)?;
            println!("Deleted preset '{}'", name);
        }
    }
    Ok(())
}

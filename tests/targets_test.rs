use assert_float_eq::assert_float_absolute_eq;

use meal_plan_maker_rs::models::{MacroSplit, PlanMode, Preferences, Profile, Slot};
use meal_plan_maker_rs::planner::{
    MacroTarget, PlanRequest, daily_target, macro_targets, slot_targets,
};
use meal_plan_maker_rs::PlannerError;

#[test]
fn test_targets_consistent_with_kcal() {
    for total in [0.0, 1200.0, 2000.0, 3150.5] {
        for (p, c, f) in [(0.30, 0.40, 0.30), (0.35, 0.35, 0.30), (0.2, 0.5, 0.1), (0.0, 0.0, 0.0)] {
            let t = macro_targets(total, p, c, f);
            assert_float_absolute_eq!(t.macro_kcal(), total * (p + c + f), 1e-6);
        }
    }
}

#[test]
fn test_reference_scenario() {
    let t = macro_targets(2000.0, 0.30, 0.40, 0.30);
    assert_float_absolute_eq!(t.protein_g, 150.0, 1e-9);
    assert_float_absolute_eq!(t.carbs_g, 200.0, 1e-9);
    assert_float_absolute_eq!(t.fat_g, 66.67, 0.005);
}

#[test]
fn test_slot_targets_sum_to_daily() {
    let daily = MacroTarget {
        kcal: 2450.0,
        protein_g: 180.0,
        carbs_g: 240.0,
        fat_g: 85.0,
    };
    for meals in 1..=7 {
        let slots = slot_targets(&daily, &Slot::layout(meals));
        assert_eq!(slots.len(), meals);
        let kcal: f64 = slots.iter().map(|(_, t)| t.kcal).sum();
        let protein: f64 = slots.iter().map(|(_, t)| t.protein_g).sum();
        assert_float_absolute_eq!(kcal, daily.kcal, 1e-6);
        assert_float_absolute_eq!(protein, daily.protein_g, 1e-6);
    }
}

#[test]
fn test_profiles_adjust_kcal_and_split() {
    let cut = Preferences {
        base_kcal: 2001.0,
        profile: Profile::Cut,
        ..Preferences::default()
    };
    assert_float_absolute_eq!(cut.effective_kcal(), 1700.0, 1e-9);
    let t = daily_target(&cut).unwrap();
    assert_float_absolute_eq!(t.protein_g, 1700.0 * 0.35 / 4.0, 1e-9);

    let bulk = Preferences {
        profile: Profile::Bulk,
        kcal_adjustment: -100.0,
        ..Preferences::default()
    };
    assert_float_absolute_eq!(bulk.effective_kcal(), 2200.0, 1e-9);

    let floor = Preferences {
        base_kcal: 100.0,
        kcal_adjustment: -500.0,
        ..Preferences::default()
    };
    assert_eq!(floor.effective_kcal(), 0.0);
}

#[test]
fn test_custom_split_validated() {
    let prefs = Preferences {
        profile: Profile::Custom,
        split: MacroSplit {
            protein: 0.6,
            carbs: 0.5,
            fat: 0.0,
        },
        ..Preferences::default()
    };
    assert!(matches!(
        daily_target(&prefs),
        Err(PlannerError::InvalidMacroSplit { .. })
    ));
    assert!(MacroSplit::new(0.5, 0.5, Some(0.0)).is_ok());
}

#[test]
fn test_request_meal_targets_by_mode() {
    let mut prefs = Preferences::default();
    let uniform = PlanRequest::from_preferences(&prefs).unwrap().meal_targets();
    assert!(uniform.iter().all(|(_, t)| (t.kcal - 500.0).abs() < 1e-9));

    prefs.mode = PlanMode::Slots;
    let slotted = PlanRequest::from_preferences(&prefs).unwrap().meal_targets();
    for ((_, t), expected) in slotted.iter().zip([500.0, 700.0, 200.0, 600.0]) {
        assert_float_absolute_eq!(t.kcal, expected, 1e-9);
    }
}

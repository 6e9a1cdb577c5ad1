use meal_matching::matcher::{
    build_weekly_plan, EmptySlotPolicy, PlanSettings, Relaxation, WeeklyPlan,
};
use meal_matching::types::{MealForMatching, MealType};
use meal_matching::MealMatchingError;
use profile::{DietaryPreference, FitnessGoal, MatchingProfile};

fn create_test_meal(id: &str, meal_type: MealType, tags: &[&str]) -> MealForMatching {
    MealForMatching {
        id: id.to_string(),
        name: format!("Meal {}", id),
        meal_type,
        calories: Some(650.0),
        protein_g: Some(25.0),
        carbs_g: Some(60.0),
        fats_g: Some(20.0),
        prep_time_min: Some(25),
        dietary_tags: tags.iter().map(|s| s.to_string()).collect(),
        cuisine: None,
        locale: "en".to_string(),
        is_seed: true,
        owner_id: None,
    }
}

fn create_test_profile(
    preference: DietaryPreference,
    allergies: &[&str],
    goal: FitnessGoal,
) -> MatchingProfile {
    MatchingProfile {
        dietary_preference: preference,
        allergies: allergies.iter().map(|s| s.to_string()).collect(),
        goal,
        daily_calorie_target: Some(2000.0),
        locale: "en".to_string(),
    }
}

/// Pool with `per_type` distinct meals for each of breakfast/lunch/dinner,
/// all carrying the given tags.
fn balanced_pool(per_type: usize, tags: &[&str]) -> Vec<MealForMatching> {
    let mut pool = Vec::new();
    for (prefix, meal_type) in [
        ("b", MealType::Breakfast),
        ("l", MealType::Lunch),
        ("d", MealType::Dinner),
    ] {
        for i in 0..per_type {
            pool.push(create_test_meal(&format!("{prefix}{i}"), meal_type, tags));
        }
    }
    pool
}

fn selected_ids(plan: &WeeklyPlan) -> Vec<String> {
    plan.days
        .iter()
        .flat_map(|day| day.meals.iter().map(|entry| entry.meal_id.clone()))
        .collect()
}

#[test]
fn test_vegan_profile_selects_only_vegan_meals() {
    let mut pool = balanced_pool(8, &["vegan", "vegetarian"]);
    // Interleave non-vegan meals; none of them may appear in the plan
    pool.push(create_test_meal("meaty_b", MealType::Breakfast, &[]));
    pool.push(create_test_meal("meaty_l", MealType::Lunch, &[]));
    pool.push(create_test_meal("meaty_d", MealType::Dinner, &[]));

    let profile = create_test_profile(DietaryPreference::Vegan, &[], FitnessGoal::Maintain);
    let plan = build_weekly_plan(&pool, &profile, &PlanSettings::default()).unwrap();

    let vegan_ids: Vec<&str> = pool
        .iter()
        .filter(|m| m.has_dietary_tag("vegan"))
        .map(|m| m.id.as_str())
        .collect();
    for id in selected_ids(&plan) {
        assert!(
            vegan_ids.contains(&id.as_str()),
            "non-vegan meal {id} placed in a vegan plan"
        );
    }
    for entry in plan.days.iter().flat_map(|d| d.meals.iter()) {
        assert_eq!(entry.relaxation, Relaxation::None);
    }
}

#[test]
fn test_empty_admissible_pool_fails_by_default() {
    // No vegan breakfasts at all
    let mut pool = vec![create_test_meal("b0", MealType::Breakfast, &["vegetarian"])];
    pool.extend(balanced_pool(2, &["vegan"]).into_iter().filter(|m| m.meal_type != MealType::Breakfast));

    let profile = create_test_profile(DietaryPreference::Vegan, &[], FitnessGoal::Maintain);
    let result = build_weekly_plan(&pool, &profile, &PlanSettings::default());

    match result {
        Err(MealMatchingError::NoCandidatesForSlot { day, slot }) => {
            assert_eq!(day, 1);
            assert_eq!(slot, MealType::Breakfast);
        }
        other => panic!("expected NoCandidatesForSlot, got {other:?}"),
    }
}

#[test]
fn test_unfiltered_fallback_is_opt_in_and_recorded() {
    let mut pool = vec![create_test_meal("b0", MealType::Breakfast, &["vegetarian"])];
    pool.extend(balanced_pool(2, &["vegan"]).into_iter().filter(|m| m.meal_type != MealType::Breakfast));

    let profile = create_test_profile(DietaryPreference::Vegan, &[], FitnessGoal::Maintain);
    let settings = PlanSettings {
        allow_unfiltered_fallback: true,
        ..PlanSettings::default()
    };
    let plan = build_weekly_plan(&pool, &profile, &settings).unwrap();

    for day in &plan.days {
        let breakfast = day
            .meals
            .iter()
            .find(|entry| entry.slot == MealType::Breakfast)
            .expect("breakfast slot filled via fallback");
        assert_eq!(breakfast.meal_id, "b0");
        assert_eq!(
            breakfast.relaxation,
            Relaxation::UnfilteredPool,
            "a dietary-unsafe pick must be flagged"
        );
    }
}

#[test]
fn test_dairy_allergy_excludes_only_explicitly_tagged_meals() {
    let mut pool = balanced_pool(4, &[]);
    // Explicitly dairy-laden breakfast placed first so it would win by order
    pool.insert(
        0,
        create_test_meal("cheesy", MealType::Breakfast, &["contains_dairy"]),
    );

    let profile = create_test_profile(DietaryPreference::Omnivore, &["dairy"], FitnessGoal::Maintain);
    let plan = build_weekly_plan(&pool, &profile, &PlanSettings::default()).unwrap();

    let ids = selected_ids(&plan);
    assert!(
        !ids.contains(&"cheesy".to_string()),
        "contains_dairy meal selected for a dairy-allergic profile"
    );
    // Untagged meals are acceptable picks under the permissive allergy rule
    assert!(ids.contains(&"b0".to_string()));
}

#[test]
fn test_identical_inputs_yield_identical_plans() {
    let pool = balanced_pool(9, &[]);
    let profile = create_test_profile(DietaryPreference::Omnivore, &[], FitnessGoal::WeightLoss);
    let settings = PlanSettings::default();

    let first = build_weekly_plan(&pool, &profile, &settings).unwrap();
    let second = build_weekly_plan(&pool, &profile, &settings).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_no_repeats_when_pool_is_large_enough() {
    // 7 distinct admissible meals per slot type = 21 total
    let pool = balanced_pool(7, &[]);
    let profile = create_test_profile(DietaryPreference::Omnivore, &[], FitnessGoal::Maintain);
    let plan = build_weekly_plan(&pool, &profile, &PlanSettings::default()).unwrap();

    let ids = selected_ids(&plan);
    assert_eq!(ids.len(), 21);
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 21, "plan repeated a meal despite a full pool");
}

#[test]
fn test_single_admissible_breakfast_repeats_all_week() {
    // Vegetarian profile with a dairy allergy over a 5-meal breakfast pool:
    // A is the only admissible candidate; B fails the allergy rule; C, D, E
    // fail the preference rule.
    let mut pool = vec![
        create_test_meal("a", MealType::Breakfast, &["vegetarian"]),
        create_test_meal("b", MealType::Breakfast, &["vegetarian", "contains_dairy"]),
        create_test_meal("c", MealType::Breakfast, &[]),
        create_test_meal("d", MealType::Breakfast, &[]),
        create_test_meal("e", MealType::Breakfast, &[]),
    ];
    for i in 0..3 {
        pool.push(create_test_meal(&format!("l{i}"), MealType::Lunch, &["vegetarian"]));
        pool.push(create_test_meal(&format!("d{i}"), MealType::Dinner, &["vegetarian"]));
    }

    let profile = create_test_profile(
        DietaryPreference::Vegetarian,
        &["dairy"],
        FitnessGoal::Maintain,
    );
    let plan = build_weekly_plan(&pool, &profile, &PlanSettings::default()).unwrap();

    let breakfasts: Vec<&str> = plan
        .days
        .iter()
        .flat_map(|day| day.meals.iter())
        .filter(|entry| entry.slot == MealType::Breakfast)
        .map(|entry| entry.meal_id.as_str())
        .collect();
    assert_eq!(
        breakfasts,
        vec!["a"; 7],
        "the sole admissible candidate must fill every breakfast slot"
    );
}

#[test]
fn test_meals_per_day_out_of_range_rejected() {
    let pool = balanced_pool(3, &[]);
    let profile = create_test_profile(DietaryPreference::Omnivore, &[], FitnessGoal::Maintain);

    for requested in [0u8, 2, 6] {
        let settings = PlanSettings {
            meals_per_day: requested,
            ..PlanSettings::default()
        };
        assert!(
            matches!(
                build_weekly_plan(&pool, &profile, &settings),
                Err(MealMatchingError::MealsPerDayOutOfRange { requested: r }) if r == requested
            ),
            "meals_per_day={requested} must be rejected"
        );
    }
}

#[test]
fn test_nonsensical_calorie_target_rejected() {
    let pool = balanced_pool(3, &[]);
    let mut profile = create_test_profile(DietaryPreference::Omnivore, &[], FitnessGoal::Maintain);
    profile.daily_calorie_target = Some(-100.0);

    assert!(matches!(
        build_weekly_plan(&pool, &profile, &PlanSettings::default()),
        Err(MealMatchingError::InvalidCalorieTarget(_))
    ));
}

#[test]
fn test_skip_policy_leaves_slot_empty_and_records_it() {
    // 4 meals per day but the pool holds no snacks
    let pool = balanced_pool(5, &[]);
    let profile = create_test_profile(DietaryPreference::Omnivore, &[], FitnessGoal::Maintain);
    let settings = PlanSettings {
        meals_per_day: 4,
        empty_slot_policy: EmptySlotPolicy::Skip,
        ..PlanSettings::default()
    };
    let plan = build_weekly_plan(&pool, &profile, &settings).unwrap();

    assert_eq!(plan.skipped_slots.len(), 7);
    for (i, skipped) in plan.skipped_slots.iter().enumerate() {
        assert_eq!(skipped.day, (i + 1) as u8);
        assert_eq!(skipped.slot, MealType::Snack);
    }
    for day in &plan.days {
        assert_eq!(day.meals.len(), 3, "snack slot should be absent, not filled");
    }
}

#[test]
fn test_snack_slots_filled_when_pool_has_snacks() {
    let mut pool = balanced_pool(5, &[]);
    for i in 0..5 {
        pool.push(create_test_meal(&format!("s{i}"), MealType::Snack, &[]));
    }
    let profile = create_test_profile(DietaryPreference::Omnivore, &[], FitnessGoal::Maintain);
    let settings = PlanSettings {
        meals_per_day: 5,
        ..PlanSettings::default()
    };
    let plan = build_weekly_plan(&pool, &profile, &settings).unwrap();

    for day in &plan.days {
        assert_eq!(day.meals.len(), 5);
        let snacks = day
            .meals
            .iter()
            .filter(|entry| entry.slot == MealType::Snack)
            .count();
        assert_eq!(snacks, 2);
    }
}

#[test]
fn test_settings_filters_relax_before_dietary_filters() {
    // Cuisine nothing in the pool offers: the matcher must drop the cuisine
    // constraint but keep dietary filtering intact.
    let mut pool = balanced_pool(4, &["vegan"]);
    pool.push(create_test_meal("omnivore_b", MealType::Breakfast, &[]));

    let profile = create_test_profile(DietaryPreference::Vegan, &[], FitnessGoal::Maintain);
    let settings = PlanSettings {
        cuisine: Some("thai".to_string()),
        ..PlanSettings::default()
    };
    let plan = build_weekly_plan(&pool, &profile, &settings).unwrap();

    for entry in plan.days.iter().flat_map(|d| d.meals.iter()) {
        assert_eq!(entry.relaxation, Relaxation::SettingsDropped);
        assert_ne!(
            entry.meal_id, "omnivore_b",
            "dietary filtering must survive settings relaxation"
        );
    }
}

#[test]
fn test_prep_time_ceiling_constrains_selection() {
    let mut quick = create_test_meal("quick", MealType::Breakfast, &[]);
    quick.prep_time_min = Some(15);
    quick.calories = Some(400.0); // further from target than the slow meal
    let mut slow = create_test_meal("slow", MealType::Breakfast, &[]);
    slow.prep_time_min = Some(50);
    slow.calories = Some(660.0);

    let mut pool = vec![slow, quick];
    pool.extend(balanced_pool(2, &[]).into_iter().filter(|m| m.meal_type != MealType::Breakfast));

    let profile = create_test_profile(DietaryPreference::Omnivore, &[], FitnessGoal::Maintain);
    let settings = PlanSettings {
        max_prep_time_min: Some(30),
        ..PlanSettings::default()
    };
    let plan = build_weekly_plan(&pool, &profile, &settings).unwrap();

    let first_breakfast = &plan.days[0].meals[0];
    assert_eq!(first_breakfast.slot, MealType::Breakfast);
    assert_eq!(
        first_breakfast.meal_id, "quick",
        "the ceiling must exclude the better-scoring slow meal"
    );
    assert_eq!(first_breakfast.relaxation, Relaxation::None);
}

#[test]
fn test_calorie_proximity_drives_slot_choice() {
    // 2000 kcal over 3 meals: 667 kcal beats 1000 kcal for the same slot
    let mut on_target = create_test_meal("on_target", MealType::Breakfast, &[]);
    on_target.calories = Some(667.0);
    let mut heavy = create_test_meal("heavy", MealType::Breakfast, &[]);
    heavy.calories = Some(1000.0);

    let mut pool = vec![heavy, on_target];
    pool.extend(balanced_pool(2, &[]).into_iter().filter(|m| m.meal_type != MealType::Breakfast));

    let profile = create_test_profile(DietaryPreference::Omnivore, &[], FitnessGoal::Maintain);
    let plan = build_weekly_plan(&pool, &profile, &PlanSettings::default()).unwrap();

    assert_eq!(plan.days[0].meals[0].meal_id, "on_target");
}

#[test]
fn test_ties_break_on_input_order() {
    // Two byte-for-byte equivalent breakfasts except for id: first one wins
    let pool = vec![
        create_test_meal("first", MealType::Breakfast, &[]),
        create_test_meal("second", MealType::Breakfast, &[]),
        create_test_meal("l0", MealType::Lunch, &[]),
        create_test_meal("d0", MealType::Dinner, &[]),
    ];
    let profile = create_test_profile(DietaryPreference::Omnivore, &[], FitnessGoal::Maintain);
    let plan = build_weekly_plan(&pool, &profile, &PlanSettings::default()).unwrap();

    assert_eq!(plan.days[0].meals[0].meal_id, "first");
    // Day 2: "first" now carries the repeat penalty, so "second" takes over
    assert_eq!(plan.days[1].meals[0].meal_id, "second");
}

#[test]
fn test_totals_sum_all_selections() {
    let pool = balanced_pool(7, &[]);
    let profile = create_test_profile(DietaryPreference::Omnivore, &[], FitnessGoal::Maintain);
    let plan = build_weekly_plan(&pool, &profile, &PlanSettings::default()).unwrap();

    // 21 selections of identical meals: 650 kcal / 25 g / 60 g / 20 g each
    assert!((plan.totals.calories - 21.0 * 650.0).abs() < 0.01);
    assert!((plan.totals.protein_g - 21.0 * 25.0).abs() < 0.01);
    assert!((plan.totals.carbs_g - 21.0 * 60.0).abs() < 0.01);
    assert!((plan.totals.fats_g - 21.0 * 20.0).abs() < 0.01);
}

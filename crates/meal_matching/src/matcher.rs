use crate::dietary_filter::is_admissible;
use crate::error::MealMatchingError;
use crate::scoring::score_meal;
use crate::types::{MealForMatching, MealType};
use profile::MatchingProfile;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const DAYS_PER_WEEK: u8 = 7;
pub const MIN_MEALS_PER_DAY: u8 = 3;
pub const MAX_MEALS_PER_DAY: u8 = 5;

fn default_meals_per_day() -> u8 {
    3
}

/// What to do when a slot has zero candidates even after every permitted
/// relaxation tier. The choice belongs to the caller, not the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySlotPolicy {
    /// Abort the whole plan with a per-slot error.
    #[default]
    Fail,
    /// Leave the slot empty and record it on the plan.
    Skip,
}

/// Settings for one plan generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSettings {
    /// 3 to 5 meals per day. Out-of-range values are rejected, not clamped.
    #[serde(default = "default_meals_per_day")]
    pub meals_per_day: u8,
    /// Restrict to a cuisine (case-insensitive). Dropped first on relaxation.
    pub cuisine: Option<String>,
    /// Ceiling on preparation minutes. Dropped together with cuisine.
    pub max_prep_time_min: Option<u32>,
    /// Last-resort fallback to the slot's unfiltered pool, which can bypass
    /// dietary and allergy filtering. Off by default; when a pick comes from
    /// this tier it is recorded on the entry so callers can surface it.
    #[serde(default)]
    pub allow_unfiltered_fallback: bool,
    #[serde(default)]
    pub empty_slot_policy: EmptySlotPolicy,
}

impl Default for PlanSettings {
    fn default() -> Self {
        PlanSettings {
            meals_per_day: default_meals_per_day(),
            cuisine: None,
            max_prep_time_min: None,
            allow_unfiltered_fallback: false,
            empty_slot_policy: EmptySlotPolicy::default(),
        }
    }
}

/// Which fallback tier produced a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relaxation {
    /// All requested filters held.
    None,
    /// Cuisine / prep-time settings were dropped; dietary filtering held.
    SettingsDropped,
    /// The entire slot pool was used, bypassing dietary filtering.
    UnfilteredPool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub slot: MealType,
    pub meal_id: String,
    pub meal_name: String,
    pub relaxation: Relaxation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDay {
    /// 1-based day number within the week.
    pub day: u8,
    pub meals: Vec<PlanEntry>,
}

/// Aggregate per-serving macros summed over every selection in the plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanTotals {
    pub calories: f32,
    pub protein_g: f32,
    pub carbs_g: f32,
    pub fats_g: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedSlot {
    pub day: u8,
    pub slot: MealType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    pub days: Vec<PlanDay>,
    pub totals: PlanTotals,
    /// Non-empty only under [`EmptySlotPolicy::Skip`].
    pub skipped_slots: Vec<SkippedSlot>,
}

/// Fixed slot order per day: breakfast, lunch, dinner, then snack slots for
/// plans asking for 4 or 5 meals.
fn slot_sequence(meals_per_day: u8) -> Vec<MealType> {
    let mut slots = vec![MealType::Breakfast, MealType::Lunch, MealType::Dinner];
    for _ in MIN_MEALS_PER_DAY..meals_per_day {
        slots.push(MealType::Snack);
    }
    slots
}

fn passes_settings(meal: &MealForMatching, settings: &PlanSettings) -> bool {
    if let Some(wanted) = &settings.cuisine {
        match &meal.cuisine {
            Some(cuisine) if cuisine.eq_ignore_ascii_case(wanted) => {}
            // Unknown cuisine cannot satisfy an explicit cuisine request
            _ => return false,
        }
    }
    if let Some(ceiling) = settings.max_prep_time_min {
        // A meal with unknown prep time cannot be verified against a ceiling
        if !meal.prep_time_min.is_some_and(|p| p <= ceiling) {
            return false;
        }
    }
    true
}

/// Build a full 7-day plan from a candidate pool.
///
/// Per slot the pool is narrowed through dietary filtering plus any
/// settings-driven filters, then relaxed in a fixed order when empty: first
/// the settings filters are dropped, then (only when
/// `allow_unfiltered_fallback` is set) the whole slot pool is used. Every
/// remaining candidate is scored against the ids already placed in this plan
/// and the highest score wins; ties go to the first-seen candidate so a given
/// pool order always yields the same plan. No clock and no randomness touch
/// the selection path.
pub fn build_weekly_plan(
    pool: &[MealForMatching],
    profile: &MatchingProfile,
    settings: &PlanSettings,
) -> Result<WeeklyPlan, MealMatchingError> {
    if settings.meals_per_day < MIN_MEALS_PER_DAY || settings.meals_per_day > MAX_MEALS_PER_DAY {
        return Err(MealMatchingError::MealsPerDayOutOfRange {
            requested: settings.meals_per_day,
        });
    }
    if let Some(target) = profile.daily_calorie_target {
        if !target.is_finite() || target <= 0.0 {
            return Err(MealMatchingError::InvalidCalorieTarget(target));
        }
    }

    // Partition once by slot type, preserving pool order within each slot
    let mut partitions: HashMap<MealType, Vec<&MealForMatching>> = HashMap::new();
    for meal in pool {
        partitions.entry(meal.meal_type).or_default().push(meal);
    }

    let slots = slot_sequence(settings.meals_per_day);
    let mut used_meal_ids: HashSet<String> = HashSet::new();
    let mut days: Vec<PlanDay> = Vec::with_capacity(DAYS_PER_WEEK as usize);
    let mut skipped_slots: Vec<SkippedSlot> = Vec::new();
    let mut totals = PlanTotals::default();

    for day in 1..=DAYS_PER_WEEK {
        let mut meals: Vec<PlanEntry> = Vec::with_capacity(slots.len());

        for slot in &slots {
            let slot_pool: &[&MealForMatching] = partitions
                .get(slot)
                .map(|meals| meals.as_slice())
                .unwrap_or(&[]);

            let dietary: Vec<&MealForMatching> = slot_pool
                .iter()
                .copied()
                .filter(|meal| is_admissible(meal, profile))
                .collect();
            let constrained: Vec<&MealForMatching> = dietary
                .iter()
                .copied()
                .filter(|meal| passes_settings(meal, settings))
                .collect();

            let (candidates, relaxation) = if !constrained.is_empty() {
                (constrained, Relaxation::None)
            } else if !dietary.is_empty() {
                (dietary, Relaxation::SettingsDropped)
            } else if settings.allow_unfiltered_fallback && !slot_pool.is_empty() {
                (slot_pool.to_vec(), Relaxation::UnfilteredPool)
            } else {
                match settings.empty_slot_policy {
                    EmptySlotPolicy::Fail => {
                        return Err(MealMatchingError::NoCandidatesForSlot { day, slot: *slot });
                    }
                    EmptySlotPolicy::Skip => {
                        tracing::debug!(day, slot = %slot, "no candidates, slot skipped");
                        skipped_slots.push(SkippedSlot { day, slot: *slot });
                        continue;
                    }
                }
            };

            if relaxation != Relaxation::None {
                tracing::debug!(day, slot = %slot, ?relaxation, "candidate pool relaxed");
            }

            // Highest score wins; a strict comparison keeps the first-seen
            // candidate on ties.
            let mut best: Option<(f32, &MealForMatching)> = None;
            for candidate in candidates.iter().copied() {
                let score = score_meal(candidate, profile, &used_meal_ids, settings.meals_per_day);
                if best.is_none_or(|(best_score, _)| score > best_score) {
                    best = Some((score, candidate));
                }
            }
            let (_, selected) = best.expect("candidates is non-empty");

            used_meal_ids.insert(selected.id.clone());
            totals.calories += selected.calories.unwrap_or(0.0);
            totals.protein_g += selected.protein_g.unwrap_or(0.0);
            totals.carbs_g += selected.carbs_g.unwrap_or(0.0);
            totals.fats_g += selected.fats_g.unwrap_or(0.0);

            meals.push(PlanEntry {
                slot: *slot,
                meal_id: selected.id.clone(),
                meal_name: selected.name.clone(),
                relaxation,
            });
        }

        days.push(PlanDay { day, meals });
    }

    tracing::info!(
        total_calories = totals.calories,
        distinct_meals = used_meal_ids.len(),
        skipped = skipped_slots.len(),
        "weekly plan assembled"
    );

    Ok(WeeklyPlan {
        days,
        totals,
        skipped_slots,
    })
}

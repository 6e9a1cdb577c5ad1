use crate::types::MealForMatching;
use profile::{FitnessGoal, MatchingProfile};
use std::collections::HashSet;

/// Baseline every meal starts from. Large enough that no combination of the
/// penalties below pushes a score negative in practice.
pub const BASE_SCORE: f32 = 100.0;

/// Subtracted when the meal already appears in the plan being built. Heavy
/// enough to almost always prefer an unused meal, but finite: when every
/// admissible candidate has been used, the least-bad one still wins.
pub const REPEAT_PENALTY: f32 = 50.0;

pub const MUSCLE_GAIN_PROTEIN_MIN_G: f32 = 30.0;
pub const MUSCLE_GAIN_BONUS: f32 = 20.0;

/// Weight-loss sub-bonuses stack: low carbs and high protein each add this.
pub const WEIGHT_LOSS_CARB_MAX_G: f32 = 30.0;
pub const WEIGHT_LOSS_PROTEIN_MIN_G: f32 = 25.0;
pub const WEIGHT_LOSS_BONUS: f32 = 15.0;

/// Calorie proximity: an exact hit on the per-meal target earns
/// [`CALORIE_BONUS_MAX`], decaying linearly to zero at
/// [`CALORIE_TOLERANCE_KCAL`] away and clamped there. Monotonically
/// non-increasing in distance, never negative.
pub const CALORIE_BONUS_MAX: f32 = 25.0;
pub const CALORIE_TOLERANCE_KCAL: f32 = 500.0;

pub const DEFAULT_DAILY_CALORIE_TARGET: f32 = 2000.0;

/// Score a meal for one slot. Higher is better; only relative order within a
/// single candidate pool matters.
///
/// Missing nutrition fields count as 0. The function is total: it never
/// panics and never returns NaN (non-finite calorie targets are rejected at
/// the matcher boundary; the guard here keeps the scorer safe standalone).
pub fn score_meal(
    meal: &MealForMatching,
    profile: &MatchingProfile,
    used_meal_ids: &HashSet<String>,
    meals_per_day: u8,
) -> f32 {
    let mut score = BASE_SCORE;

    if used_meal_ids.contains(&meal.id) {
        score -= REPEAT_PENALTY;
    }

    score += goal_alignment_bonus(meal, profile.goal);
    score += calorie_proximity_bonus(meal, profile.daily_calorie_target, meals_per_day);

    score
}

fn goal_alignment_bonus(meal: &MealForMatching, goal: FitnessGoal) -> f32 {
    let protein = meal.protein_g.unwrap_or(0.0);
    let carbs = meal.carbs_g.unwrap_or(0.0);

    match goal {
        FitnessGoal::MuscleGain => {
            // Threshold bonus, no partial credit below it
            if protein >= MUSCLE_GAIN_PROTEIN_MIN_G {
                MUSCLE_GAIN_BONUS
            } else {
                0.0
            }
        }
        FitnessGoal::WeightLoss => {
            let mut bonus = 0.0;
            if carbs <= WEIGHT_LOSS_CARB_MAX_G {
                bonus += WEIGHT_LOSS_BONUS;
            }
            if protein >= WEIGHT_LOSS_PROTEIN_MIN_G {
                bonus += WEIGHT_LOSS_BONUS;
            }
            bonus
        }
        FitnessGoal::Maintain | FitnessGoal::Balanced => 0.0,
    }
}

fn calorie_proximity_bonus(
    meal: &MealForMatching,
    daily_calorie_target: Option<f32>,
    meals_per_day: u8,
) -> f32 {
    let daily = daily_calorie_target
        .filter(|t| t.is_finite() && *t > 0.0)
        .unwrap_or(DEFAULT_DAILY_CALORIE_TARGET);
    let per_meal_target = daily / meals_per_day.max(1) as f32;

    let diff = (meal.calories.unwrap_or(0.0) - per_meal_target).abs();
    (CALORIE_BONUS_MAX * (1.0 - diff / CALORIE_TOLERANCE_KCAL)).max(0.0)
}

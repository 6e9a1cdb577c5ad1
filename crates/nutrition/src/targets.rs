use crate::error::NutritionError;
use profile::FitnessGoal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// Daily allowances never drop below this, regardless of goal adjustment.
pub const MIN_DAILY_CALORIES: f32 = 1200.0;

/// Calorie adjustment applied on top of TDEE per fitness goal.
pub const WEIGHT_LOSS_DEFICIT: f32 = 500.0;
pub const MUSCLE_GAIN_SURPLUS: f32 = 300.0;

// Atwater factors (kcal per gram)
const PROTEIN_KCAL_PER_G: f32 = 4.0;
const CARB_KCAL_PER_G: f32 = 4.0;
const FAT_KCAL_PER_G: f32 = 9.0;

#[derive(
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

#[derive(
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// Standard TDEE multiplier applied to the basal metabolic rate.
    pub fn multiplier(&self) -> f32 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

/// Body measurements needed to estimate daily energy expenditure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMetrics {
    pub weight_kg: f32,
    pub height_cm: f32,
    pub age_years: u32,
    pub sex: Sex,
    #[serde(default)]
    pub activity: ActivityLevel,
}

impl BodyMetrics {
    /// Reject nonsensical measurements before any arithmetic.
    pub fn validate(&self) -> Result<(), NutritionError> {
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err(NutritionError::InvalidMetrics {
                field: "weight_kg",
                expected: "a positive number",
                got: self.weight_kg,
            });
        }
        if !self.height_cm.is_finite() || self.height_cm <= 0.0 {
            return Err(NutritionError::InvalidMetrics {
                field: "height_cm",
                expected: "a positive number",
                got: self.height_cm,
            });
        }
        if self.age_years < 13 || self.age_years > 120 {
            return Err(NutritionError::InvalidMetrics {
                field: "age_years",
                expected: "between 13 and 120",
                got: self.age_years as f32,
            });
        }
        Ok(())
    }
}

/// Computed daily nutrition targets, the numeric input to meal matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionTargets {
    pub calories: f32,
    pub protein_g: f32,
    pub carbs_g: f32,
    pub fats_g: f32,
}

impl NutritionTargets {
    /// Per-meal calorie target used by the scorer's proximity term.
    pub fn per_meal_calories(&self, meals_per_day: u8) -> f32 {
        self.calories / meals_per_day.max(1) as f32
    }
}

/// Macro split as fractions of daily calories, summing to 1.0.
struct MacroSplit {
    protein: f32,
    carbs: f32,
    fats: f32,
}

impl MacroSplit {
    fn for_goal(goal: FitnessGoal) -> Self {
        match goal {
            FitnessGoal::WeightLoss => MacroSplit {
                protein: 0.40,
                carbs: 0.30,
                fats: 0.30,
            },
            FitnessGoal::MuscleGain => MacroSplit {
                protein: 0.30,
                carbs: 0.45,
                fats: 0.25,
            },
            FitnessGoal::Maintain | FitnessGoal::Balanced => MacroSplit {
                protein: 0.25,
                carbs: 0.45,
                fats: 0.30,
            },
        }
    }
}

/// Basal metabolic rate via Mifflin-St Jeor.
///
/// male:   10*kg + 6.25*cm - 5*age + 5
/// female: 10*kg + 6.25*cm - 5*age - 161
pub fn basal_metabolic_rate(metrics: &BodyMetrics) -> Result<f32, NutritionError> {
    metrics.validate()?;

    let base = 10.0 * metrics.weight_kg + 6.25 * metrics.height_cm - 5.0 * metrics.age_years as f32;
    let bmr = match metrics.sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    };
    Ok(bmr)
}

/// Daily calorie allowance: TDEE adjusted for the fitness goal, floored at
/// [`MIN_DAILY_CALORIES`].
pub fn daily_calorie_allowance(
    metrics: &BodyMetrics,
    goal: FitnessGoal,
) -> Result<f32, NutritionError> {
    let tdee = basal_metabolic_rate(metrics)? * metrics.activity.multiplier();
    let adjusted = match goal {
        FitnessGoal::WeightLoss => tdee - WEIGHT_LOSS_DEFICIT,
        FitnessGoal::MuscleGain => tdee + MUSCLE_GAIN_SURPLUS,
        FitnessGoal::Maintain | FitnessGoal::Balanced => tdee,
    };
    Ok(adjusted.max(MIN_DAILY_CALORIES))
}

/// Compute the full daily targets: calorie allowance plus a goal-specific
/// macro split converted to grams with Atwater factors (4/4/9 kcal per gram).
pub fn daily_targets(
    metrics: &BodyMetrics,
    goal: FitnessGoal,
) -> Result<NutritionTargets, NutritionError> {
    let calories = daily_calorie_allowance(metrics, goal)?;
    let split = MacroSplit::for_goal(goal);

    Ok(NutritionTargets {
        calories,
        protein_g: calories * split.protein / PROTEIN_KCAL_PER_G,
        carbs_g: calories * split.carbs / CARB_KCAL_PER_G,
        fats_g: calories * split.fats / FAT_KCAL_PER_G,
    })
}

use chrono::Utc;
use meal_matching::matcher::WeeklyPlan;
use meal_matching::types::MealForMatching;
use nutrition::NutritionTargets;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope written for a generated plan. The id and timestamp live here, on
/// the outer record, so the plan itself stays byte-identical across runs with
/// the same inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    pub plan_id: String,
    pub generated_at: String,
    pub meals_per_day: u8,
    pub plan: WeeklyPlan,
}

impl PlanReport {
    pub fn new(plan: WeeklyPlan, meals_per_day: u8) -> Self {
        PlanReport {
            plan_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now().to_rfc3339(),
            meals_per_day,
            plan,
        }
    }
}

/// Swap outcome. A `None` replacement tells the caller to fall back to its
/// generation collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapReport {
    pub original_id: String,
    pub swap_type: String,
    pub replacement: Option<MealForMatching>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetsReport {
    pub targets: NutritionTargets,
    pub meals_per_day: u8,
    pub per_meal_calories: f32,
}

impl TargetsReport {
    pub fn new(targets: NutritionTargets, meals_per_day: u8) -> Self {
        let per_meal_calories = targets.per_meal_calories(meals_per_day);
        TargetsReport {
            targets,
            meals_per_day,
            per_meal_calories,
        }
    }
}

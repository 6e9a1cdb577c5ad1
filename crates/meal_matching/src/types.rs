use serde::{Deserialize, Serialize};
use std::fmt;

/// Meal slot classification. Snack fills the 4th and 5th daily slots when a
/// plan requests more than three meals per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_locale() -> String {
    "en".to_string()
}

/// Candidate meal data needed by the matching engine.
///
/// Nutrition fields are per serving and optional; absent values count as 0
/// when scoring. `dietary_tags` carries both positive claims ("vegan",
/// "halal") and explicit allergen-content claims ("contains_dairy").
/// Seed meals are system-curated and owned by no user; generated meals carry
/// the creating user's id. The engine never mutates a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealForMatching {
    pub id: String,
    pub name: String,
    pub meal_type: MealType,
    pub calories: Option<f32>,
    pub protein_g: Option<f32>,
    pub carbs_g: Option<f32>,
    pub fats_g: Option<f32>,
    pub prep_time_min: Option<u32>,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    pub cuisine: Option<String>,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub is_seed: bool,
    pub owner_id: Option<String>,
}

impl MealForMatching {
    /// Exact-match tag lookup. Tags are a controlled lowercase vocabulary,
    /// so matching is case-sensitive.
    pub fn has_dietary_tag(&self, tag: &str) -> bool {
        self.dietary_tags.iter().any(|t| t == tag)
    }
}

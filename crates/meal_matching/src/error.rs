use crate::types::MealType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MealMatchingError {
    #[error("meals_per_day must be between 3 and 5, got {requested}")]
    MealsPerDayOutOfRange { requested: u8 },

    #[error("Daily calorie target must be a positive number, got {0}")]
    InvalidCalorieTarget(f32),

    #[error("No candidates for slot {slot} on day {day}")]
    NoCandidatesForSlot { day: u8, slot: MealType },

    #[error("Unknown swap type: {0}")]
    UnknownSwapType(String),

    #[error("Swap type '{swap_type}' requires a {missing} argument")]
    MissingSwapDetail {
        swap_type: &'static str,
        missing: &'static str,
    },

    #[error("Unknown dietary restriction tag: {0}")]
    UnknownDietaryTag(String),

    #[error("Unknown macro goal: {0}")]
    UnknownMacroTarget(String),
}

pub mod error;
pub mod targets;

pub use error::NutritionError;
pub use targets::{
    daily_targets, ActivityLevel, BodyMetrics, NutritionTargets, Sex, MIN_DAILY_CALORIES,
};

pub mod types;

pub use types::{Allergen, DietaryPreference, FitnessGoal, MatchingProfile};

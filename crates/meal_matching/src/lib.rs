pub mod dietary_filter;
pub mod error;
pub mod matcher;
pub mod scoring;
pub mod swap;
pub mod types;

pub use dietary_filter::{filter_admissible, is_admissible};
pub use error::MealMatchingError;
pub use matcher::{
    build_weekly_plan, EmptySlotPolicy, PlanDay, PlanEntry, PlanSettings, PlanTotals, Relaxation,
    SkippedSlot, WeeklyPlan,
};
pub use scoring::score_meal;
pub use swap::{find_swap_candidate, DietaryTag, MacroTarget, SwapType};
pub use types::{MealForMatching, MealType};

use crate::error::MealMatchingError;
use crate::types::MealForMatching;
use rand::prelude::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// At most this many filtered candidates enter the random draw.
pub const SWAP_CANDIDATE_WINDOW: usize = 10;

pub const BUDGET_MAX_PREP_MIN: u32 = 30;
pub const HIGH_PROTEIN_MIN_G: f32 = 25.0;
pub const LOW_CARB_MAX_G: f32 = 20.0;
pub const LOW_FAT_MAX_G: f32 = 10.0;

/// Restriction tags for dietary swaps. Unlike the admissibility filter's
/// permissive allergy rule, here the tag IS the selection criterion: a meal
/// without it simply doesn't qualify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryTag {
    DairyFree,
    GlutenFree,
    Vegan,
    LowFodmap,
}

impl DietaryTag {
    pub fn tag(&self) -> &'static str {
        match self {
            DietaryTag::DairyFree => "dairy_free",
            DietaryTag::GlutenFree => "gluten_free",
            DietaryTag::Vegan => "vegan",
            DietaryTag::LowFodmap => "low_fodmap",
        }
    }

    pub fn parse(s: &str) -> Result<Self, MealMatchingError> {
        match s.trim().to_lowercase().as_str() {
            "dairy_free" => Ok(DietaryTag::DairyFree),
            "gluten_free" => Ok(DietaryTag::GlutenFree),
            "vegan" => Ok(DietaryTag::Vegan),
            "low_fodmap" => Ok(DietaryTag::LowFodmap),
            other => Err(MealMatchingError::UnknownDietaryTag(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroTarget {
    HighProtein,
    LowCarb,
    LowFat,
}

impl MacroTarget {
    pub fn parse(s: &str) -> Result<Self, MealMatchingError> {
        match s.trim().to_lowercase().as_str() {
            "high_protein" => Ok(MacroTarget::HighProtein),
            "low_carb" => Ok(MacroTarget::LowCarb),
            "low_fat" => Ok(MacroTarget::LowFat),
            other => Err(MealMatchingError::UnknownMacroTarget(other.to_string())),
        }
    }
}

/// One swap request's selection rule.
#[derive(Debug, Clone, PartialEq)]
pub enum SwapType {
    /// Prep time at most 30 minutes, fastest first.
    Budget,
    /// Prep time strictly below the original's, fastest first.
    Speed,
    /// Meal must carry the requested restriction tag.
    Dietary(DietaryTag),
    /// Meal must clear the macro threshold.
    Macro(MacroTarget),
}

impl SwapType {
    /// Parse a swap request from its wire form. `detail` carries the
    /// restriction tag or macro goal where the kind requires one. Unknown
    /// kinds are rejected, never defaulted.
    pub fn parse(kind: &str, detail: Option<&str>) -> Result<Self, MealMatchingError> {
        match kind.trim().to_lowercase().as_str() {
            "budget" => Ok(SwapType::Budget),
            "speed" => Ok(SwapType::Speed),
            "dietary" => {
                let detail = detail.ok_or(MealMatchingError::MissingSwapDetail {
                    swap_type: "dietary",
                    missing: "restriction tag",
                })?;
                Ok(SwapType::Dietary(DietaryTag::parse(detail)?))
            }
            "macro" => {
                let detail = detail.ok_or(MealMatchingError::MissingSwapDetail {
                    swap_type: "macro",
                    missing: "macro goal",
                })?;
                Ok(SwapType::Macro(MacroTarget::parse(detail)?))
            }
            other => Err(MealMatchingError::UnknownSwapType(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SwapType::Budget => "budget",
            SwapType::Speed => "speed",
            SwapType::Dietary(_) => "dietary",
            SwapType::Macro(_) => "macro",
        }
    }
}

/// Pick a replacement for `original` from `pool`, or `None` when nothing
/// qualifies (the caller then falls back to its generation collaborator).
///
/// Base filters always apply: same meal type, same locale, and never the
/// original itself. The swap-type filter narrows further; budget and speed
/// sort ascending by prep time, and meals without a known prep time cannot
/// satisfy either. The result is drawn uniformly from the top
/// [`SWAP_CANDIDATE_WINDOW`] matches. The randomness is deliberate: repeated
/// swaps of the same meal should vary. The RNG is injected so tests can
/// pin it.
pub fn find_swap_candidate<R: Rng + ?Sized>(
    pool: &[MealForMatching],
    original: &MealForMatching,
    swap_type: &SwapType,
    rng: &mut R,
) -> Option<MealForMatching> {
    let mut candidates: Vec<&MealForMatching> = pool
        .iter()
        .filter(|meal| {
            meal.meal_type == original.meal_type
                && meal.locale == original.locale
                && meal.id != original.id
        })
        .collect();

    match swap_type {
        SwapType::Budget => {
            candidates.retain(|meal| meal.prep_time_min.is_some_and(|p| p <= BUDGET_MAX_PREP_MIN));
            candidates.sort_by_key(|meal| meal.prep_time_min);
        }
        SwapType::Speed => {
            // An original without a known prep time bounds nothing; any
            // candidate with a known prep time then qualifies.
            let ceiling = original.prep_time_min.unwrap_or(u32::MAX);
            candidates.retain(|meal| meal.prep_time_min.is_some_and(|p| p < ceiling));
            candidates.sort_by_key(|meal| meal.prep_time_min);
        }
        SwapType::Dietary(restriction) => {
            candidates.retain(|meal| meal.has_dietary_tag(restriction.tag()));
        }
        SwapType::Macro(target) => {
            candidates.retain(|meal| match target {
                MacroTarget::HighProtein => {
                    meal.protein_g.is_some_and(|p| p >= HIGH_PROTEIN_MIN_G)
                }
                MacroTarget::LowCarb => meal.carbs_g.unwrap_or(0.0) <= LOW_CARB_MAX_G,
                MacroTarget::LowFat => meal.fats_g.unwrap_or(0.0) <= LOW_FAT_MAX_G,
            });
        }
    }

    candidates.truncate(SWAP_CANDIDATE_WINDOW);

    if candidates.is_empty() {
        tracing::debug!(
            original = %original.id,
            swap_type = swap_type.as_str(),
            "no swap candidate in pool"
        );
        return None;
    }

    candidates.choose(rng).map(|meal| (*meal).clone())
}

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use validator::Validate;

/// Dietary preference is a single closed value per user. Unknown strings must
/// be rejected at parse time, never defaulted: silently mis-filtering on an
/// unrecognized preference could produce an unsafe plan.
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
pub enum DietaryPreference {
    #[default]
    Omnivore,
    Vegetarian,
    Vegan,
    Pescatarian,
    Halal,
}

impl DietaryPreference {
    /// The positive dietary tag a meal must carry to be admissible.
    ///
    /// `Omnivore` imposes no constraint. For every other preference the
    /// absence of the tag means "unknown", which is treated as unsafe.
    pub fn required_tag(&self) -> Option<&'static str> {
        match self {
            DietaryPreference::Omnivore => None,
            DietaryPreference::Vegetarian => Some("vegetarian"),
            DietaryPreference::Vegan => Some("vegan"),
            DietaryPreference::Pescatarian => Some("pescatarian"),
            DietaryPreference::Halal => Some("halal"),
        }
    }
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
pub enum FitnessGoal {
    WeightLoss,
    #[default]
    Maintain,
    MuscleGain,
    Balanced,
}

/// Known allergen vocabulary. User allergy strings are free-form; anything
/// that does not normalize to one of these keys imposes no constraint
/// (fail open, not closed).
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
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Allergen {
    Dairy,
    Gluten,
    Nuts,
    Eggs,
    Shellfish,
    Soy,
    Fish,
    Sesame,
}

impl Allergen {
    /// Normalize a free-form allergy string to a known allergen key.
    ///
    /// Case-insensitive, whitespace-trimmed, accepts singular and plural
    /// forms ("nut"/"nuts", "egg"/"eggs"). Returns `None` for anything
    /// outside the vocabulary.
    pub fn from_user_input(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_lowercase();
        Self::lookup(&needle).or_else(|| needle.strip_suffix('s').and_then(Self::lookup))
    }

    fn lookup(key: &str) -> Option<Self> {
        match key {
            "dairy" => Some(Allergen::Dairy),
            "gluten" => Some(Allergen::Gluten),
            "nut" => Some(Allergen::Nuts),
            "egg" => Some(Allergen::Eggs),
            "shellfish" => Some(Allergen::Shellfish),
            "soy" => Some(Allergen::Soy),
            "fish" => Some(Allergen::Fish),
            "sesame" => Some(Allergen::Sesame),
            _ => None,
        }
    }

    /// The explicit negative tag marking a meal as containing this allergen.
    pub fn contains_tag(&self) -> &'static str {
        match self {
            Allergen::Dairy => "contains_dairy",
            Allergen::Gluten => "contains_gluten",
            Allergen::Nuts => "contains_nuts",
            Allergen::Eggs => "contains_eggs",
            Allergen::Shellfish => "contains_shellfish",
            Allergen::Soy => "contains_soy",
            Allergen::Fish => "contains_fish",
            Allergen::Sesame => "contains_sesame",
        }
    }
}

fn default_locale() -> String {
    "en".to_string()
}

/// The slice of a user profile the matching engine needs.
///
/// Allergies stay free-form here; normalization to [`Allergen`] happens at
/// filter time so duplicates and unknown strings are harmless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MatchingProfile {
    pub dietary_preference: DietaryPreference,
    #[serde(default)]
    pub allergies: Vec<String>,
    pub goal: FitnessGoal,
    /// Daily calorie target in kcal. `None` means "use the 2000 kcal default".
    #[validate(range(min = 800.0, max = 10000.0))]
    pub daily_calorie_target: Option<f32>,
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for MatchingProfile {
    fn default() -> Self {
        MatchingProfile {
            dietary_preference: DietaryPreference::default(),
            allergies: Vec::new(),
            goal: FitnessGoal::default(),
            daily_calorie_target: None,
            locale: default_locale(),
        }
    }
}

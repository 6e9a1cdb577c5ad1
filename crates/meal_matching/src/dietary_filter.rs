use crate::types::MealForMatching;
use profile::{Allergen, MatchingProfile};

/// Decide whether a single meal is admissible for a user's profile.
///
/// # Business Rules
/// - **Preference rule (strict)**: a non-omnivore preference requires the
///   meal to carry the exact positive tag ("vegetarian", "vegan",
///   "pescatarian", "halal"). A missing tag means "unknown" and the meal is
///   excluded, even if it happens to contain nothing disqualifying.
/// - **Allergy rule (permissive)**: a meal is excluded only when it carries
///   the explicit `contains_<allergen>` tag for one of the profile's
///   recognized allergens. A meal with no allergen-related tags at all is
///   treated as safe. This asymmetry with the preference rule is deliberate
///   and load-bearing; do not "fix" it here.
/// - Allergy strings that don't normalize to a known allergen key impose no
///   constraint.
///
/// Pure and total: no side effects, never panics.
///
/// # Examples
/// ```
/// use meal_matching::dietary_filter::is_admissible;
/// use meal_matching::types::{MealForMatching, MealType};
/// use profile::{DietaryPreference, FitnessGoal, MatchingProfile};
///
/// let meal = MealForMatching {
///     id: "1".to_string(),
///     name: "Chickpea Curry".to_string(),
///     meal_type: MealType::Dinner,
///     calories: Some(620.0),
///     protein_g: Some(22.0),
///     carbs_g: Some(80.0),
///     fats_g: Some(18.0),
///     prep_time_min: Some(35),
///     dietary_tags: vec!["vegetarian".to_string(), "vegan".to_string()],
///     cuisine: Some("indian".to_string()),
///     locale: "en".to_string(),
///     is_seed: true,
///     owner_id: None,
/// };
///
/// let profile = MatchingProfile {
///     dietary_preference: DietaryPreference::Vegan,
///     allergies: vec!["nuts".to_string()],
///     goal: FitnessGoal::Maintain,
///     daily_calorie_target: None,
///     locale: "en".to_string(),
/// };
///
/// assert!(is_admissible(&meal, &profile));
/// ```
pub fn is_admissible(meal: &MealForMatching, profile: &MatchingProfile) -> bool {
    satisfies_preference(meal, profile) && satisfies_allergies(meal, profile)
}

/// Filter a candidate pool down to admissible meals, preserving input order.
pub fn filter_admissible<'a>(
    pool: &'a [MealForMatching],
    profile: &MatchingProfile,
) -> Vec<&'a MealForMatching> {
    pool.iter()
        .filter(|meal| is_admissible(meal, profile))
        .collect()
}

/// Strict positive-claim check: absence of the required tag means unsafe.
fn satisfies_preference(meal: &MealForMatching, profile: &MatchingProfile) -> bool {
    match profile.dietary_preference.required_tag() {
        Some(tag) => meal.has_dietary_tag(tag),
        None => true,
    }
}

/// Permissive negative-claim check: only an explicit `contains_<allergen>`
/// tag excludes a meal.
fn satisfies_allergies(meal: &MealForMatching, profile: &MatchingProfile) -> bool {
    profile
        .allergies
        .iter()
        .filter_map(|raw| Allergen::from_user_input(raw))
        .all(|allergen| !meal.has_dietary_tag(allergen.contains_tag()))
}

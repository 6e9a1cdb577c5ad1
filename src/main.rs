use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use meal_matching::matcher::{build_weekly_plan, EmptySlotPolicy, PlanSettings};
use meal_matching::swap::{find_swap_candidate, SwapType};
use meal_matching::types::MealForMatching;
use nutriplan::report::{PlanReport, SwapReport, TargetsReport};
use nutrition::{daily_targets, ActivityLevel, BodyMetrics, Sex};
use profile::{FitnessGoal, MatchingProfile};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};
use validator::Validate;

/// nutriplan - deterministic weekly meal plan matching
#[derive(Parser)]
#[command(name = "nutriplan")]
#[command(about = "Weekly meal plan matching and swapping over local candidate pools", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a 7-day plan from a candidate pool and a profile
    Plan {
        /// JSON file holding the candidate meal pool (ordered array)
        #[arg(long)]
        pool: PathBuf,

        /// JSON file holding the matching profile
        #[arg(long)]
        profile: PathBuf,

        /// Meals per day, 3-5 (overrides config file)
        #[arg(long)]
        meals_per_day: Option<u8>,

        /// Restrict candidates to a cuisine
        #[arg(long)]
        cuisine: Option<String>,

        /// Ceiling on preparation minutes
        #[arg(long)]
        max_prep_time_min: Option<u32>,

        /// Leave unfillable slots empty instead of failing the whole plan
        #[arg(long)]
        skip_empty_slots: bool,

        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Find a replacement for one meal in the pool
    Swap {
        /// JSON file holding the candidate meal pool (ordered array)
        #[arg(long)]
        pool: PathBuf,

        /// Id of the meal being replaced (must be in the pool)
        #[arg(long)]
        meal_id: String,

        /// One of: budget, speed, dietary, macro
        #[arg(long)]
        swap_type: String,

        /// Restriction tag or macro goal where the swap type needs one
        #[arg(long)]
        detail: Option<String>,

        /// Pin the random draw for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Compute daily nutrition targets from body metrics
    Targets {
        #[arg(long)]
        weight_kg: f32,

        #[arg(long)]
        height_cm: f32,

        #[arg(long)]
        age: u32,

        /// male or female
        #[arg(long)]
        sex: String,

        /// sedentary, light, moderate, active or very_active
        #[arg(long, default_value = "moderate")]
        activity: String,

        /// weight_loss, maintain, muscle_gain or balanced
        #[arg(long, default_value = "maintain")]
        goal: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = nutriplan::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow!(e))?;

    nutriplan::observability::init_observability(&config.observability.log_level)?;

    match cli.command {
        Commands::Plan {
            pool,
            profile,
            meals_per_day,
            cuisine,
            max_prep_time_min,
            skip_empty_slots,
            output,
        } => plan_command(
            config,
            &pool,
            &profile,
            meals_per_day,
            cuisine,
            max_prep_time_min,
            skip_empty_slots,
            output.as_deref(),
        ),
        Commands::Swap {
            pool,
            meal_id,
            swap_type,
            detail,
            seed,
        } => swap_command(&pool, &meal_id, &swap_type, detail.as_deref(), seed),
        Commands::Targets {
            weight_kg,
            height_cm,
            age,
            sex,
            activity,
            goal,
        } => targets_command(config, weight_kg, height_cm, age, &sex, &activity, &goal),
    }
}

fn load_pool(path: &Path) -> Result<Vec<MealForMatching>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read pool file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse pool file {}", path.display()))
}

fn load_profile(path: &Path) -> Result<MatchingProfile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile file {}", path.display()))?;
    let profile: MatchingProfile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse profile file {}", path.display()))?;
    profile
        .validate()
        .with_context(|| format!("Invalid profile in {}", path.display()))?;
    Ok(profile)
}

fn emit<T: serde::Serialize>(report: &T, output: Option<&Path>) -> Result<()> {
    let rendered = serde_json::to_string_pretty(report)?;
    match output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn plan_command(
    config: nutriplan::config::Config,
    pool_path: &Path,
    profile_path: &Path,
    meals_per_day: Option<u8>,
    cuisine: Option<String>,
    max_prep_time_min: Option<u32>,
    skip_empty_slots: bool,
    output: Option<&Path>,
) -> Result<()> {
    let pool = load_pool(pool_path)?;
    let profile = load_profile(profile_path)?;

    let meals_per_day = meals_per_day.unwrap_or(config.planning.meals_per_day);
    let settings = PlanSettings {
        meals_per_day,
        cuisine,
        max_prep_time_min,
        allow_unfiltered_fallback: config.planning.allow_unfiltered_fallback,
        empty_slot_policy: if skip_empty_slots {
            EmptySlotPolicy::Skip
        } else {
            EmptySlotPolicy::Fail
        },
    };

    tracing::info!(
        pool_size = pool.len(),
        meals_per_day,
        "generating weekly plan"
    );
    let plan = build_weekly_plan(&pool, &profile, &settings)?;

    emit(&PlanReport::new(plan, meals_per_day), output)
}

fn swap_command(
    pool_path: &Path,
    meal_id: &str,
    swap_type: &str,
    detail: Option<&str>,
    seed: Option<u64>,
) -> Result<()> {
    let pool = load_pool(pool_path)?;
    let original = pool
        .iter()
        .find(|meal| meal.id == meal_id)
        .ok_or_else(|| anyhow!("Meal {meal_id} not found in pool {}", pool_path.display()))?;

    let swap = SwapType::parse(swap_type, detail)?;

    let replacement = match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            find_swap_candidate(&pool, original, &swap, &mut rng)
        }
        None => {
            let mut rng = rand::rng();
            find_swap_candidate(&pool, original, &swap, &mut rng)
        }
    };

    let report = SwapReport {
        original_id: meal_id.to_string(),
        swap_type: swap.as_str().to_string(),
        replacement,
    };
    emit(&report, None)
}

fn targets_command(
    config: nutriplan::config::Config,
    weight_kg: f32,
    height_cm: f32,
    age: u32,
    sex: &str,
    activity: &str,
    goal: &str,
) -> Result<()> {
    let sex: Sex = sex
        .parse()
        .map_err(|_| anyhow!("Unknown sex: {sex} (expected male or female)"))?;
    let activity: ActivityLevel = activity
        .parse()
        .map_err(|_| anyhow!("Unknown activity level: {activity}"))?;
    let goal: FitnessGoal = goal
        .parse()
        .map_err(|_| anyhow!("Unknown fitness goal: {goal}"))?;

    let metrics = BodyMetrics {
        weight_kg,
        height_cm,
        age_years: age,
        sex,
        activity,
    };
    let targets = daily_targets(&metrics, goal)?;

    emit(
        &TargetsReport::new(targets, config.planning.meals_per_day),
        None,
    )
}

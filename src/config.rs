use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub planning: PlanningConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlanningConfig {
    /// Default meal count when the CLI doesn't pass one. Same 3-5 range the
    /// matcher enforces.
    #[serde(default = "default_meals_per_day")]
    pub meals_per_day: u8,
    /// Opt-in last-resort fallback to the unfiltered slot pool.
    #[serde(default)]
    pub allow_unfiltered_fallback: bool,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            meals_per_day: default_meals_per_day(),
            allow_unfiltered_fallback: false,
        }
    }
}

fn default_meals_per_day() -> u8 {
    3
}

impl Config {
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Set defaults
        builder = builder
            .set_default("observability.log_level", "info")?
            .set_default("planning.meals_per_day", 3)?
            .set_default("planning.allow_unfiltered_fallback", false)?;

        // Load config file if path provided or CONFIG_PATH env var set
        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Try to load config file (optional - ignore if not found)
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        // Override with environment variables (NUTRIPLAN__PLANNING__MEALS_PER_DAY, etc.)
        builder = builder.add_source(
            Environment::with_prefix("NUTRIPLAN")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(3..=5).contains(&self.planning.meals_per_day) {
            return Err(format!(
                "planning.meals_per_day must be between 3 and 5, got {}",
                self.planning.meals_per_day
            ));
        }
        Ok(())
    }
}

//! Configuration file support for fittrack.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/fittrack/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub profile: ProfileDefaults,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Goals and body metrics used when the profile is first created
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileDefaults {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_daily_calorie_goal")]
    pub daily_calorie_goal: u32,

    #[serde(default = "default_daily_step_goal")]
    pub daily_step_goal: u32,

    #[serde(default = "default_daily_water_goal")]
    pub daily_water_goal: u32,

    #[serde(default = "default_weekly_workout_goal")]
    pub weekly_workout_goal: u32,

    #[serde(default = "default_weekly_minutes_goal")]
    pub weekly_minutes_goal: u32,

    #[serde(default = "default_daily_calorie_burn_goal")]
    pub daily_calorie_burn_goal: u32,

    #[serde(default = "default_height_cm")]
    pub height_cm: Option<f64>,

    #[serde(default = "default_weight_kg")]
    pub weight_kg: Option<f64>,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            name: default_name(),
            daily_calorie_goal: default_daily_calorie_goal(),
            daily_step_goal: default_daily_step_goal(),
            daily_water_goal: default_daily_water_goal(),
            weekly_workout_goal: default_weekly_workout_goal(),
            weekly_minutes_goal: default_weekly_minutes_goal(),
            daily_calorie_burn_goal: default_daily_calorie_burn_goal(),
            height_cm: default_height_cm(),
            weight_kg: default_weight_kg(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("fittrack")
}

fn default_name() -> String {
    "User".into()
}

fn default_daily_calorie_goal() -> u32 {
    2000
}

fn default_daily_step_goal() -> u32 {
    10_000
}

fn default_daily_water_goal() -> u32 {
    8
}

fn default_weekly_workout_goal() -> u32 {
    5
}

fn default_weekly_minutes_goal() -> u32 {
    150
}

fn default_daily_calorie_burn_goal() -> u32 {
    500
}

fn default_height_cm() -> Option<f64> {
    Some(170.0)
}

fn default_weight_kg() -> Option<f64> {
    Some(70.0)
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("fittrack").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject goal values that would make every percentage meaningless
    pub fn validate(&self) -> Result<()> {
        let p = &self.profile;
        if p.name.trim().is_empty() {
            return Err(Error::Config("profile.name must not be empty".into()));
        }
        if p.daily_water_goal == 0 {
            return Err(Error::Config(
                "profile.daily_water_goal must be at least 1".into(),
            ));
        }
        for (key, value) in [("height_cm", p.height_cm), ("weight_kg", p.weight_kg)] {
            if matches!(value, Some(v) if v <= 0.0 || !v.is_finite()) {
                return Err(Error::Config(format!("profile.{} must be positive", key)));
            }
        }
        Ok(())
    }
}

//! Catalog models, runtime settings, and loaders for the Rocket Simulation.
//!
//! Every reference table the simulator consults (planets, historical missions,
//! spacecraft parts, flyby routes, tutorials) is loaded once into an immutable
//! [`Catalog`] and handed to the components that need it.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use rocket_core::time::kepler_period_days;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const PLANETS_FILE: &str = "planets.yaml";
const MISSIONS_FILE: &str = "missions.yaml";
const PARTS_FILE: &str = "parts.yaml";
const ROUTES_FILE: &str = "routes.yaml";
const TUTORIALS_FILE: &str = "tutorials.yaml";

const BUILTIN_PLANETS: &str = include_str!("../../../configs/planets.yaml");
const BUILTIN_MISSIONS: &str = include_str!("../../../configs/missions.yaml");
const BUILTIN_PARTS: &str = include_str!("../../../configs/parts.yaml");
const BUILTIN_ROUTES: &str = include_str!("../../../configs/routes.yaml");
const BUILTIN_TUTORIALS: &str = include_str!("../../../configs/tutorials.yaml");

/// Heliocentric body on a circular, coplanar orbit.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PlanetConfig {
    pub name: String,
    pub display_name: String,
    pub distance_au: f64,
    #[serde(default)]
    pub orbital_period_days: Option<f64>,
    pub mass_kg: f64,
    pub radius_km: f64,
    /// Reference delta-v a well-planned mission to this body needs (km/s).
    #[serde(default)]
    pub optimal_delta_v_km_s: Option<f64>,
}

impl PlanetConfig {
    /// Sidereal period in days, falling back to Kepler's third law.
    pub fn period_days(&self) -> f64 {
        self.orbital_period_days
            .unwrap_or_else(|| kepler_period_days(self.distance_au))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoricalStatus {
    Active,
    Completed,
}

/// A flown mission kept for comparison against simulated transfers.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HistoricalMissionConfig {
    pub id: String,
    pub name: String,
    /// ISO `YYYY-MM-DD`; lexical order equals chronological order.
    pub launch_date: String,
    pub target: String,
    pub route: Vec<String>,
    pub status: HistoricalStatus,
    #[serde(default)]
    pub achievements: Vec<String>,
    pub duration_days: f64,
    pub distance_au: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EngineConfig {
    pub isp_seconds: f64,
    pub thrust_newtons: f64,
    pub mass_kg: f64,
    pub cost: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FuelTankConfig {
    pub capacity_kg: f64,
    pub mass_kg: f64,
    pub cost: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PowerConfig {
    pub power_watts: f64,
    pub mass_kg: f64,
    pub cost: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PayloadConfig {
    pub mass_kg: f64,
    pub cost: f64,
}

/// Named selection of one part per slot.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DesignPreset {
    pub engine: String,
    pub fuel_tank: String,
    pub power: String,
    pub payload: String,
}

/// Spacecraft parts available to the designer.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct PartsCatalog {
    pub engines: BTreeMap<String, EngineConfig>,
    pub fuel_tanks: BTreeMap<String, FuelTankConfig>,
    pub power: BTreeMap<String, PowerConfig>,
    pub payloads: BTreeMap<String, PayloadConfig>,
    #[serde(default)]
    pub presets: BTreeMap<String, DesignPreset>,
}

/// Destination name mapped to candidate flyby sequences.
pub type RouteTable = BTreeMap<String, Vec<Vec<String>>>;

/// Parameter attached to an interactive tutorial widget.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum InteractiveParam {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Interactive {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub params: BTreeMap<String, InteractiveParam>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TutorialStepConfig {
    pub title: String,
    pub content: String,
    pub interactive: Interactive,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct QuizQuestionConfig {
    pub question: String,
    pub options: Vec<String>,
    pub correct: usize,
    pub explanation: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TutorialConfig {
    pub id: String,
    pub title: String,
    pub steps: Vec<TutorialStepConfig>,
    #[serde(default)]
    pub quiz: Vec<QuizQuestionConfig>,
}

/// Toggles for the optional collaborator subsystems.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct FeatureFlags {
    pub fuel_calculator: bool,
    pub launch_optimizer: bool,
    pub gravity_assist: bool,
    pub mission_database: bool,
    pub mission_tracker: bool,
    pub spacecraft_designer: bool,
    pub tutorials: bool,
    pub analytics: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            fuel_calculator: true,
            launch_optimizer: true,
            gravity_assist: true,
            mission_database: true,
            mission_tracker: true,
            spacecraft_designer: true,
            tutorials: true,
            analytics: true,
        }
    }
}

/// Runtime limits and scaling factors.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub min_steps: usize,
    pub max_steps: usize,
    pub default_steps: usize,
    pub tracking_steps: usize,
    pub time_scale_days_per_second: f64,
    pub tracking_update_interval_ms: u64,
    pub history_capacity: usize,
    pub launch_window_count: usize,
    pub max_mass_kg: f64,
    pub max_cost: f64,
    pub features: FeatureFlags,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_steps: 50,
            max_steps: 1000,
            default_steps: 200,
            tracking_steps: 100,
            time_scale_days_per_second: 10.0,
            tracking_update_interval_ms: 1000,
            history_capacity: 100,
            launch_window_count: 3,
            max_mass_kg: 50_000.0,
            max_cost: 100_000_000.0,
            features: FeatureFlags::default(),
        }
    }
}

impl Settings {
    /// Clamp a requested sample count into `[min_steps, max_steps]`.
    pub fn clamp_steps(&self, requested: i64) -> usize {
        let min = self.min_steps as i64;
        let max = self.max_steps as i64;
        requested.max(min).min(max) as usize
    }

    /// Reject limits the simulator cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_steps < 2 || self.min_steps > self.max_steps {
            return Err(ConfigError::Invalid(format!(
                "step range [{}, {}] must satisfy 2 <= min <= max",
                self.min_steps, self.max_steps
            )));
        }
        if !(self.time_scale_days_per_second.is_finite() && self.time_scale_days_per_second > 0.0)
        {
            return Err(ConfigError::Invalid(
                "time_scale_days_per_second must be positive".to_string(),
            ));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid(
                "history_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Immutable reference data injected into every component at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub planets: Vec<PlanetConfig>,
    pub missions: Vec<HistoricalMissionConfig>,
    pub parts: PartsCatalog,
    pub routes: RouteTable,
    pub tutorials: Vec<TutorialConfig>,
}

impl Catalog {
    /// Catalog compiled from the repository's `configs/` directory.
    pub fn builtin() -> Result<Self, ConfigError> {
        let catalog = Self {
            planets: serde_yaml::from_str(BUILTIN_PLANETS)?,
            missions: serde_yaml::from_str(BUILTIN_MISSIONS)?,
            parts: serde_yaml::from_str(BUILTIN_PARTS)?,
            routes: serde_yaml::from_str(BUILTIN_ROUTES)?,
            tutorials: serde_yaml::from_str(BUILTIN_TUTORIALS)?,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Case-insensitive planet lookup.
    pub fn planet(&self, name: &str) -> Option<&PlanetConfig> {
        self.planets
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Reference optimal delta-v per planet, for planets that define one.
    pub fn optimal_delta_v(&self) -> BTreeMap<String, f64> {
        self.planets
            .iter()
            .filter_map(|p| p.optimal_delta_v_km_s.map(|dv| (p.name.clone(), dv)))
            .collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for planet in &self.planets {
            let positive = [planet.distance_au, planet.mass_kg, planet.radius_km]
                .iter()
                .all(|v| v.is_finite() && *v > 0.0);
            if !positive || planet.period_days() <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "planet `{}` needs positive distance, mass, radius and period",
                    planet.name
                )));
            }
        }
        for (i, planet) in self.planets.iter().enumerate() {
            if self.planets[..i]
                .iter()
                .any(|p| p.name.eq_ignore_ascii_case(&planet.name))
            {
                return Err(ConfigError::Invalid(format!(
                    "planet `{}` listed twice",
                    planet.name
                )));
            }
        }
        for (destination, routes) in &self.routes {
            if routes.iter().any(|route| route.len() < 2) {
                return Err(ConfigError::Invalid(format!(
                    "route to `{destination}` needs a launch body and at least one encounter"
                )));
            }
        }
        Ok(())
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Load a full catalog from a directory holding the standard YAML files.
pub fn load_catalog<P: AsRef<Path>>(dir: P) -> Result<Catalog, ConfigError> {
    let dir = dir.as_ref();
    let catalog = Catalog {
        planets: load_records(dir.join(PLANETS_FILE))?,
        missions: load_records(dir.join(MISSIONS_FILE))?,
        parts: load_yaml(dir.join(PARTS_FILE))?,
        routes: load_yaml(dir.join(ROUTES_FILE))?,
        tutorials: load_records(dir.join(TUTORIALS_FILE))?,
    };
    catalog.validate()?;
    Ok(catalog)
}

/// Load planet configurations from a YAML list or a single-record TOML file.
pub fn load_planets<P: AsRef<Path>>(path: P) -> Result<Vec<PlanetConfig>, ConfigError> {
    load_records(path)
}

/// Load runtime settings from TOML; missing keys keep their defaults.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&contents)?;
    settings.validate()?;
    Ok(settings)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        load_yaml(path)
    }
}

fn load_yaml<T, P>(path: P) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let reader = File::open(path)?;
    Ok(serde_yaml::from_reader(reader)?)
}

//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`KIN_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use kinetic_math::Vector;
use serde::{Serialize, Deserialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// World box and dimensionality
    #[serde(default)]
    pub world: WorldConfig,
    /// Physics configuration
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Scenario run configuration
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`KIN_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // KIN_PHYSICS__ELASTICITY=0.5 -> physics.elasticity = 0.5
        figment = figment.merge(Env::prefixed("KIN_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Check values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = self.world.dimensions;
        if !(2..=4).contains(&dims) {
            return Err(ConfigError::Invalid(format!(
                "world.dimensions must be 2, 3 or 4 (got {})",
                dims
            )));
        }

        check_length("world.lower", &self.world.lower, dims)?;
        check_length("world.upper", &self.world.upper, dims)?;
        check_length("physics.gravity", &self.physics.gravity, dims)?;

        for axis in 0..dims {
            let lower = component(&self.world.lower, axis);
            let upper = component(&self.world.upper, axis);
            if lower >= upper {
                return Err(ConfigError::Invalid(format!(
                    "world.lower must be below world.upper on axis {} ({} >= {})",
                    axis, lower, upper
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.physics.elasticity) {
            return Err(ConfigError::Invalid(format!(
                "physics.elasticity must be within [0, 1] (got {})",
                self.physics.elasticity
            )));
        }
        positive("physics.tolerance", self.physics.tolerance)?;
        if self.physics.damping < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "physics.damping must not be negative (got {})",
                self.physics.damping
            )));
        }
        positive("simulation.timestep", self.simulation.timestep)?;
        positive("simulation.body_radius", self.simulation.body_radius)?;
        positive("simulation.body_mass", self.simulation.body_mass)?;

        Ok(())
    }

    /// Collision response settings for the engine
    pub fn to_physics_config(&self) -> kinetic_physics::PhysicsConfig {
        kinetic_physics::PhysicsConfig::new(self.physics.elasticity, self.physics.tolerance)
    }
}

fn check_length(name: &str, values: &[f32], dims: usize) -> Result<(), ConfigError> {
    if values.len() == 1 || values.len() == dims {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} needs 1 or {} components (got {})",
            name,
            dims,
            values.len()
        )))
    }
}

fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{} must be positive (got {})", name, value)))
    }
}

/// A single value applies to every axis
fn component(values: &[f32], axis: usize) -> f32 {
    match values {
        [single] => *single,
        _ => values.get(axis).copied().unwrap_or(0.0),
    }
}

/// Build a vector from a config array; a single value is broadcast
pub fn to_vector<V: Vector>(values: &[f32]) -> V {
    V::from_fn(|axis| component(values, axis))
}

/// World configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// 2, 3 or 4
    pub dimensions: usize,
    /// Lower corner of the world box
    pub lower: Vec<f32>,
    /// Upper corner of the world box
    pub upper: Vec<f32>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            dimensions: 3,
            lower: vec![-10.0, -10.0, -10.0],
            upper: vec![10.0, 10.0, 10.0],
        }
    }
}

/// Physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity acceleration, one component per axis
    pub gravity: Vec<f32>,
    /// Restitution in [0, 1]
    pub elasticity: f32,
    /// Linear damping passed to every solve
    pub damping: f32,
    /// Contact slop
    pub tolerance: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: vec![0.0, -9.8, 0.0],
            elasticity: 1.0,
            damping: 0.0,
            tolerance: 1e-4,
        }
    }
}

/// Scenario run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seconds per step
    pub timestep: f32,
    /// Number of steps to run
    pub steps: usize,
    /// Use the sorted broad phase
    pub sorted: bool,
    /// Bodies in the lattice
    pub body_count: usize,
    /// Radius of every lattice body
    pub body_radius: f32,
    /// Mass of every lattice body
    pub body_mass: f32,
    /// Initial speed, alternating in sign across the lattice
    pub seed_speed: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 120.0,
            steps: 1200,
            sorted: true,
            body_count: 27,
            body_radius: 0.4,
            body_mass: 1.0,
            seed_speed: 2.0,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace); `RUST_LOG` wins
    pub log_level: String,
    /// Log total energy every this many steps; 0 disables
    pub report_every: usize,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            report_every: 120,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub enum ConfigError {
    /// A source could not be read or extracted
    Load(figment::Error),
    /// Values were read but cannot be used
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Load(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Load(e) => write!(f, "Configuration error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Load(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

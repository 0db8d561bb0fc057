//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use std::fs;
use std::path::PathBuf;

use kinetic::config::{AppConfig, ConfigError};
use kinetic::scenario;
use serial_test::serial;

/// Fresh config directory under the system temp dir
fn config_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kinetic_config_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
#[serial]
fn test_default_file_matches_defaults() {
    let config = AppConfig::load().unwrap();
    let defaults = AppConfig::default();
    assert_eq!(config.world.dimensions, defaults.world.dimensions);
    assert_eq!(config.physics.gravity, defaults.physics.gravity);
    assert_eq!(config.simulation.body_count, defaults.simulation.body_count);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("KIN_PHYSICS__ELASTICITY", "0.25");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("KIN_PHYSICS__ELASTICITY");

    assert_eq!(config.physics.elasticity, 0.25);
}

#[test]
#[serial]
fn test_env_override_dimensions_and_arrays() {
    std::env::set_var("KIN_WORLD__DIMENSIONS", "4");
    std::env::set_var("KIN_WORLD__LOWER", "[-3.0]");
    std::env::set_var("KIN_WORLD__UPPER", "[3.0]");
    std::env::set_var("KIN_PHYSICS__GRAVITY", "[0.0, -9.8, 0.0, 0.0]");
    let config = AppConfig::load();
    for key in ["KIN_WORLD__DIMENSIONS", "KIN_WORLD__LOWER", "KIN_WORLD__UPPER", "KIN_PHYSICS__GRAVITY"] {
        std::env::remove_var(key);
    }

    let config = config.unwrap();
    assert_eq!(config.world.dimensions, 4);
    assert_eq!(config.world.lower, vec![-3.0]);
    assert_eq!(config.physics.gravity.len(), 4);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_user_file_overrides_default_file() {
    let dir = config_dir("user_override");
    fs::write(
        dir.join("default.toml"),
        "[simulation]\nsteps = 10\nbody_count = 4\n\n[debug]\nlog_level = \"warn\"\n",
    )
    .unwrap();
    fs::write(dir.join("user.toml"), "[simulation]\nsteps = 20\n").unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    fs::remove_dir_all(&dir).unwrap();

    assert_eq!(config.simulation.steps, 20);
    assert_eq!(config.simulation.body_count, 4);
    assert_eq!(config.debug.log_level, "warn");
    // Untouched sections fall back to defaults
    assert_eq!(config.physics.elasticity, 1.0);
}

#[test]
#[serial]
fn test_missing_directory_gives_defaults() {
    let config = AppConfig::load_from("does/not/exist").unwrap();
    assert_eq!(config.world.dimensions, 3);
}

#[test]
#[serial]
fn test_bad_value_is_a_load_error() {
    let dir = config_dir("bad_value");
    fs::write(dir.join("default.toml"), "[simulation]\nsteps = \"many\"\n").unwrap();

    let result = AppConfig::load_from(&dir);
    fs::remove_dir_all(&dir).unwrap();

    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[test]
#[serial]
fn test_loaded_config_runs_scenario() {
    let dir = config_dir("scenario");
    fs::write(
        dir.join("default.toml"),
        "[world]\ndimensions = 2\nlower = [-6.0]\nupper = [6.0]\n\n\
         [physics]\ngravity = [0.0, -9.8]\n\n\
         [simulation]\nsteps = 60\nbody_count = 5\n\n\
         [debug]\nreport_every = 0\n",
    )
    .unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    fs::remove_dir_all(&dir).unwrap();

    let report = scenario::run(&config).unwrap();
    assert_eq!(report.dimensions, 2);
    assert_eq!(report.bodies, 5);
    assert!(report.final_energy.is_finite());
}

//! Kinetic - headless physics scenario runner
//!
//! Loads configuration, steps a lattice of bodies in the configured
//! dimension and logs how well total energy is conserved.

use kinetic::config::AppConfig;
use kinetic::scenario;

fn main() {
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // RUST_LOG takes precedence over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.debug.log_level)).init();
    log::info!("Starting kinetic");

    if let Some(e) = load_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    match scenario::run(&config) {
        Ok(report) => log::info!(
            "{}D run of {} bodies over {} steps: energy drift {:.3}%",
            report.dimensions,
            report.bodies,
            report.steps,
            report.drift() * 100.0
        ),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

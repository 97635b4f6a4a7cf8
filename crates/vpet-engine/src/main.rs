//! Headless engine binary for the virtual-pet simulation.
//!
//! Loads configuration, hatches a starter egg (or resumes a snapshot) and
//! runs the frame loop until a termination condition is met.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `vpet-config.yaml` (or `$VPET_CONFIG`)
//! 3. Build the simulation state and module catalog
//! 4. Resume from `$VPET_SNAPSHOT` if it exists, else hatch the starter
//! 5. Run the simulation loop
//! 6. Log the result and write the snapshot back

mod error;
mod hourly_log;

use std::path::{Path, PathBuf};

use tracing::info;
use tracing_subscriber::EnvFilter;
use vpet_core::{
    NoopEffects, SimulationConfig, SimulationState, Snapshot, StarterConfig, log_simulation_end,
    run_simulation,
};

use crate::error::EngineError;
use crate::hourly_log::HourlyLog;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "vpet-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the final save fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("vpet-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        ticks_per_second = config.simulation.ticks_per_second,
        seed = config.simulation.seed,
        max_ticks = config.simulation.max_ticks,
        realtime = config.simulation.realtime,
        modules = config.modules.len(),
        "Configuration loaded"
    );

    // 3. Build the simulation state.
    let mut state = SimulationState::new(&config).map_err(EngineError::from)?;
    info!(catalog = state.catalog.len(), "Module catalog loaded");

    // 4. Resume or hatch.
    let snapshot_path = std::env::var_os("VPET_SNAPSHOT").map(PathBuf::from);
    let resumed = match snapshot_path.as_deref() {
        Some(path) if path.exists() => {
            Snapshot::load(path)
                .and_then(|snapshot| snapshot.restore(&mut state))
                .map_err(EngineError::from)?;
            true
        }
        _ => false,
    };
    if !resumed || state.roster.is_empty() {
        let starter = select_starter(&config).ok_or(EngineError::NoStarter)?;
        let id = state
            .hatch(&starter.module, &starter.species, starter.version)
            .map_err(EngineError::from)?;
        info!(pet = %id, module = %starter.module, species = %starter.species, "Starter hatched");
    }

    // 5. Run the simulation loop.
    let mut callback = HourlyLog::new(&state);
    let result = run_simulation(&mut state, &mut NoopEffects, &mut callback).await;

    // 6. Log the result and save.
    log_simulation_end(&result);
    if let Some(path) = snapshot_path.as_deref() {
        Snapshot::capture(&state)
            .save(path)
            .map_err(EngineError::from)?;
    }

    info!("vpet-engine shutting down");
    Ok(())
}

/// Load configuration from `$VPET_CONFIG` or `vpet-config.yaml`.
///
/// Falls back to defaults when the default file does not exist. An
/// explicitly named file must exist.
fn load_config() -> Result<SimulationConfig, EngineError> {
    if let Some(path) = std::env::var_os("VPET_CONFIG") {
        return Ok(SimulationConfig::from_file(Path::new(&path))?);
    }
    let config_path = Path::new(DEFAULT_CONFIG_PATH);
    if config_path.exists() {
        Ok(SimulationConfig::from_file(config_path)?)
    } else {
        info!("Config file not found, using defaults");
        Ok(SimulationConfig::default())
    }
}

/// The configured starter, or the first stage 0 monster of any module.
fn select_starter(config: &SimulationConfig) -> Option<StarterConfig> {
    if let Some(starter) = &config.starter {
        return Some(starter.clone());
    }
    config.modules.iter().find_map(|module| {
        module
            .monsters
            .iter()
            .find(|m| m.stage == 0)
            .map(|egg| StarterConfig {
                module: module.name.clone(),
                species: egg.name.clone(),
                version: egg.version,
            })
    })
}

//! Engine binary for the Roost barnyard.
//!
//! Wires configuration, logging, and the tick loop together and runs the
//! barnyard until the tick limit or Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `ROOST_CONFIG` or `roost-config.yaml`
//! 2. Initialize structured logging (tracing), `RUST_LOG` first
//! 3. Bootstrap the barnyard with the initial adults
//! 4. Create run control from the simulation bounds
//! 5. Watch for Ctrl-C and turn it into a clean stop
//! 6. Run the tick loop, publishing a frame every tick
//! 7. Log the result

mod error;
mod frame_callback;

use std::path::PathBuf;
use std::sync::Arc;

use roost_core::{RunControl, Simulation, SimulationConfig, log_simulation_end, run_simulation};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::frame_callback::FrameCallback;

/// Environment variable naming an alternative config file.
const CONFIG_ENV: &str = "ROOST_CONFIG";

/// Config file looked up in the working directory by default.
const DEFAULT_CONFIG_PATH: &str = "roost-config.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration. Logging is not up yet, so remember what happened.
    let (config, source) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(source = %source, "roost-engine starting");
    info!(
        world_name = %config.world.name,
        seed = ?config.world.seed,
        initial_population = config.world.initial_population,
        tick_interval_ms = config.world.tick_interval_ms,
        max_ticks = config.simulation.max_ticks,
        "Configuration loaded"
    );

    // 3. Bootstrap.
    let mut simulation = Simulation::from_config(&config).map_err(EngineError::from)?;

    // 4. Run control.
    let control = Arc::new(RunControl::new(
        config.world.tick_interval_ms,
        &config.simulation,
    ));

    // 5. Ctrl-C requests a clean stop.
    {
        let control = Arc::clone(&control);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping");
                    control.request_stop();
                }
                Err(error) => warn!(%error, "Ctrl-C handler unavailable"),
            }
        });
    }

    // 6. Run.
    let mut callback = FrameCallback::new(1);
    let result = run_simulation(&mut simulation, &control, &mut callback)
        .await
        .map_err(EngineError::from)?;

    // 7. Log results.
    log_simulation_end(&result);
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        frames_published = callback.published(),
        last_frame_bytes = callback.latest().map_or(0, str::len),
        hatched_total = simulation.hatched_total(),
        "roost-engine shutdown complete"
    );

    Ok(())
}

/// Where the configuration came from.
enum ConfigSource {
    File(PathBuf),
    Defaults(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults(path) => write!(f, "defaults ({} not found)", path.display()),
        }
    }
}

/// Load the configuration, falling back to defaults when the file is absent.
fn load_config() -> Result<(SimulationConfig, ConfigSource), EngineError> {
    let path = std::env::var_os(CONFIG_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        let config = SimulationConfig::from_file(&path)?;
        Ok((config, ConfigSource::File(path)))
    } else {
        Ok((SimulationConfig::default(), ConfigSource::Defaults(path)))
    }
}

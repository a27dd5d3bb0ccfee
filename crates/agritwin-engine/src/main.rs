//! Engine binary for the `AgriTwin` simulation core.
//!
//! This is the main entry point that wires together the run plan, the
//! playback loop, and the field renderer. It loads configuration,
//! validates the run, and plays the season back one simulated day per
//! tick interval until the final day.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `agritwin-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Validate the run section into a run plan
//! 4. Seed the noise source (from entropy when the seed is 0)
//! 5. Create the simulation run and the playback handle
//! 6. Run the playback loop, printing frames on the render cadence
//! 7. Log the result and print the final summary as JSON

mod error;
mod frame_callback;

use std::path::Path;
use std::sync::Arc;

use rand::Rng as _;
use tracing::info;
use tracing_subscriber::EnvFilter;

use agritwin_sim::config::EngineConfig;
use agritwin_sim::{PlaybackHandle, SimulationRun, runner};

use crate::error::EngineError;
use crate::frame_callback::FrameCallback;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the playback loop
/// fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration (before logging, so the configured level can
    //    serve as the fallback filter).
    let config = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .with_target(true)
        .init();

    info!("agritwin-engine starting");
    info!(
        field = config.run.field,
        crop = config.run.crop,
        climate = config.run.climate,
        duration_days = config.run.duration_days,
        tick_interval_ms = config.playback.tick_interval_ms,
        "Configuration loaded"
    );

    // 3. Validate the run section.
    let mut plan = config.run.validate()?;

    // 4. A zero seed means "fresh run": draw one from entropy so the run
    //    is still reproducible afterwards from the logged value.
    if plan.seed == 0 {
        plan.seed = rand::rng().random();
        info!(seed = plan.seed, "Seeded noise source from entropy");
    }

    // 5. Create the run and the shared playback handle.
    let mut run = SimulationRun::new(plan);
    let handle = Arc::new(PlaybackHandle::new(config.playback.tick_interval_ms));
    info!(
        seed = run.plan().seed,
        area_hectares = run.plan().area_hectares,
        irrigation_percent = run.plan().irrigation_percent,
        fertilization_percent = run.plan().fertilization_percent,
        "Simulation run created"
    );

    // 6. Play the season back.
    let mut callback = FrameCallback::new(&config.render);
    let result = runner::run_playback(&mut run, &handle, &mut callback)
        .await
        .map_err(EngineError::from)?;

    // 7. Log the result and print the summary.
    runner::log_playback_end(&result);
    if let Some(ref summary) = result.summary {
        let json = serde_json::to_string_pretty(summary).map_err(EngineError::from)?;
        println!("{json}");
    }

    info!(
        end_reason = ?result.end_reason,
        days_run = result.days_run,
        "agritwin-engine shutdown complete"
    );

    Ok(())
}

/// Load the engine configuration from `agritwin-config.yaml`.
///
/// Looks for the config file relative to the current working directory;
/// a missing file means defaults.
fn load_config() -> Result<EngineConfig, EngineError> {
    let config_path = Path::new("agritwin-config.yaml");
    if config_path.exists() {
        let config = EngineConfig::from_file(config_path)?;
        Ok(config)
    } else {
        Ok(EngineConfig::default())
    }
}

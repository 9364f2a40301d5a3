//! Application entry point for the transpiration viewer.
//!
//! This binary parses the command line, sets up logging, builds the
//! [`Simulation`] and delegates all interactive logic and rendering to
//! [`Viewer`] from the `viewer` module.

mod cli;
mod scene;
mod viewer;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use rand::Rng;
use transpiration_core::{config::Config, params::SimulationParameters, simulation::Simulation};

use cli::Args;
use viewer::Viewer;

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if the scene config cannot be loaded or eframe fails to create
///   the native window or event loop.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    if let Some(level) = args.log_level() {
        log::set_max_level(level);
    }

    let cfg = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load scene config {}", path.display()))?,
        None => Config::default(),
    };

    let params = SimulationParameters::new(args.temperature, args.humidity, args.light);
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    log::info!(
        "starting with {}°C, {}% humidity, {}% light, seed {seed}",
        params.temperature(),
        params.humidity(),
        params.light()
    );

    let sim = Simulation::with_seed(cfg, params, seed).context("invalid scene config")?;

    eframe::run_native(
        "Transpiration Simulator",
        eframe::NativeOptions::default(),
        Box::new(move |_cc| Ok(Box::new(Viewer::new(sim)))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}

pub mod console;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod settings;
pub mod source;
pub mod utils;
pub mod window;

use anyhow::{Context, Result};
use log::info;

use models::TrialGenerator;
use pipeline::{Capabilities, Pipeline};
use settings::Settings;
use source::open_serial;
use window::WindowController;

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    let level = if settings::debug_enabled() {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    info!("neurocalc starting up...");

    let settings = Settings::load()?;
    info!(
        "Sample link {} at {} baud, window {} ms",
        settings.serial.port, settings.serial.baud_rate, settings.window_ms
    );

    // Everything below must succeed before the first trial is offered.
    let capabilities = Capabilities::load(&settings.scaler_path, &settings.model_path)
        .context("Failed to load classification capabilities")?;
    let source = open_serial(
        &settings.serial.port,
        settings.serial.baud_rate,
        settings.serial.read_timeout_ms,
    )?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build async runtime")?;

    runtime.block_on(async move {
        let pipeline = Pipeline::new(Box::new(source), capabilities, settings.read_timeout());
        let controller = WindowController::new(pipeline, settings.window());
        console::run_console(controller, TrialGenerator::new()).await
    })?;

    info!("neurocalc shut down");
    Ok(())
}

//! Application entry point for the roots animation window.
//!
//! This binary parses the command line, sets up logging, loads the
//! optional configuration file and hands everything to [`Viewer`].

mod viewer;

use anyhow::{Context, Result};
use clap::Parser;
use roots_core::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use viewer::Viewer;

#[derive(Parser)]
#[command(name = "roots", about = "Roots that grow and retract as you scroll")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// RON file overriding the default growth constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible animation
    #[arg(long)]
    seed: Option<u64>,

    /// Do not plant a grow wave at startup
    #[arg(long)]
    no_initial_wave: bool,

    /// Initial window width in points
    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    /// Initial window height in points
    #[arg(long, default_value_t = 800.0)]
    height: f32,
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` once the window is closed.
/// - `Err` if the config file is unreadable or invalid, or if eframe
///   fails to create the native window or event loop.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut cfg = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if cli.seed.is_some() {
        cfg.seed = cli.seed;
    }
    if cli.no_initial_wave {
        cfg.initial_wave = false;
    }

    tracing::info!("roots starting");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Roots")
            .with_inner_size([cli.width, cli.height]),
        ..Default::default()
    };
    let size = (cli.width.max(0.0) as usize, cli.height.max(0.0) as usize);

    eframe::run_native(
        "Roots",
        options,
        Box::new(move |_cc| Ok(Box::new(Viewer::new(cfg, size.0, size.1)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe failed: {e}"))
}

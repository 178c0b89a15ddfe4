//! Haptic Maze entry point
//!
//! Loads settings and levels, opens the haptic device (or falls back to
//! software-only mode) and runs the frame loop until quit or Ctrl-C.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;

use haptic_maze::driver::FrameDriver;
use haptic_maze::haptics::HapticTransport;
use haptic_maze::input::Autopilot;
use haptic_maze::levels;
use haptic_maze::renderer::LogRenderer;
use haptic_maze::settings::Settings;
use haptic_maze::sim::Session;

/// Maze navigation testbed with serial haptic feedback
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Level table (JSON); overrides the settings file
    #[arg(short, long)]
    levels: Option<PathBuf>,

    /// Serial port of the haptic device
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate of the haptic device
    #[arg(short, long)]
    baud: Option<u32>,

    /// Skip the device entirely
    #[arg(long)]
    no_device: bool,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Autopilot RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Start each level with a fresh kinematic history
    #[arg(long)]
    reset_history: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(level.to_string());
    let _ = Builder::from_env(env).try_init();
}

fn load_settings(args: &Args) -> anyhow::Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    if let Some(port) = &args.port {
        settings.device.port = port.clone();
    }
    if let Some(baud) = args.baud {
        settings.device.baud_rate = baud;
    }
    if args.no_device {
        settings.device.enabled = false;
    }
    if let Some(seed) = args.seed {
        settings.autopilot.seed = seed;
    }
    if args.reset_history {
        settings.reset_history_on_level_load = true;
    }
    if let Some(path) = &args.levels {
        settings.levels_file = Some(path.clone());
    }
    Ok(settings)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    log::info!("Haptic Maze starting...");

    let settings = load_settings(&args)?;

    let level_table = match &settings.levels_file {
        Some(path) => levels::load_file(path)?,
        None => levels::builtin(),
    };
    let session = Session::new(level_table, settings.session_config())
        .context("level data rejected at startup")?;

    let transport = if settings.device.enabled {
        HapticTransport::open_or_disconnected(&settings.device)
    } else {
        log::info!("Haptic device disabled; running in software-only mode");
        HapticTransport::disconnected()
    };

    let pilot = Autopilot::new(&settings.autopilot);
    let renderer = LogRenderer::new(settings.effective_frame_rate() as u64);
    let mut driver = FrameDriver::new(session, transport, pilot, renderer, &settings);
    if let Some(frames) = args.frames {
        driver = driver.with_max_frames(frames);
    }

    let quit = driver.quit_handle();
    ctrlc::set_handler(move || {
        quit.store(true, std::sync::atomic::Ordering::SeqCst);
    })
    .context("failed to install Ctrl-C handler")?;

    let summary = driver.run();
    log::info!(
        "Session finished: {} frames, {} levels cleared, {} commands sent, {} failed",
        summary.frames,
        summary.levels_cleared,
        summary.transport.sent,
        summary.transport.failed
    );
    Ok(())
}

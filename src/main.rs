//! Dew Valley entry point.
//!
//! Reads `config.ini` (or the file given with `--config`), applies command
//! line overrides and runs the game. Built with the `window` feature it
//! opens a raylib window; `--headless` runs the same game loop without one,
//! which is how CI smoke-tests the assets.
//!
//! ```sh
//! cargo run --release --features window
//! cargo run -- --headless --frames 600
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;

use clap::Parser;
use log::{error, info, warn};

use dewvalley::game;
use dewvalley::resources::gameconfig::GameConfig;

/// Dew Valley, a small farming game.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = "config.ini")]
    config: PathBuf,

    /// Window width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels.
    #[arg(long)]
    height: Option<u32>,

    #[arg(long)]
    fullscreen: bool,

    /// Start with debug overlays on.
    #[arg(long)]
    debug: bool,

    /// Run without a window.
    #[arg(long)]
    headless: bool,

    /// Stop after this many frames (headless only).
    #[arg(long, value_name = "N")]
    frames: Option<u64>,

    /// Write the effective configuration back to the config file and exit.
    #[arg(long)]
    write_config: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(cli.config.clone());
    if let Err(e) = config.load_from_file() {
        warn!("Using default configuration: {}", e);
    }
    let width = cli.width.unwrap_or(config.window_width);
    let height = cli.height.unwrap_or(config.window_height);
    config.set_window_size(width, height);
    config.fullscreen |= cli.fullscreen;
    config.debug |= cli.debug;

    if cli.write_config {
        match config.save_to_file() {
            Ok(()) => info!("Configuration written to {}", config.config_path.display()),
            Err(e) => {
                error!("Could not write configuration: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if cli.frames.is_some() && !cli.headless {
        warn!("--frames only applies to --headless runs");
    }
    let frames = if cli.headless { cli.frames } else { None };
    if let Err(e) = game::run(&config, cli.headless, frames) {
        if !e.is_fatal() {
            warn!("{}", e);
            return;
        }
        error!("{}", e);
        std::process::exit(1);
    }
}

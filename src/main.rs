//! Terminalium - a terminal RPG built on a small cooperative widget toolkit.
//!
//! Widgets draw onto a character grid and react to keys routed through a
//! single focus ring; the game layer wires them into screens.

mod app;
mod config;
mod core;
mod frontend;
mod game;
mod sound;
mod widgets;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use crate::core::{ThreadPacer, Ui};
use frontend::{CrosstermInput, TerminalSurface};
use game::{Game, Screen};
use std::path::PathBuf;
use std::time::Duration;

#[derive(ClapParser)]
#[command(name = "terminalium")]
#[command(about = "Terminal RPG", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Custom data directory (default: ~/.terminalium)
    /// Can also be set via TERMINALIUM_DIR environment variable
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Disable music and keystroke sounds
    #[arg(long)]
    no_sound: bool,

    /// Draw everything at once: no output delay, no animations
    #[arg(long)]
    instant: bool,

    /// Screen to start on
    #[arg(long, value_enum, default_value = "menu")]
    scene: StartScene,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum StartScene {
    Menu,
    Map,
}

impl StartScene {
    fn screen(self) -> Screen {
        match self {
            StartScene::Menu => Screen::MainMenu,
            StartScene::Map => Screen::WorldMap,
        }
    }
}

fn init_logging() -> Result<()> {
    // TUI apps can't log to stdout, so we write to a file in the data directory
    let base_dir = config::Config::base_dir()?;
    std::fs::create_dir_all(&base_dir)
        .context(format!("Failed to create data directory: {:?}", base_dir))?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(base_dir.join("terminalium.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set custom data directory before anything resolves paths
    if let Some(data_dir) = &cli.data_dir {
        std::env::set_var(config::DATA_DIR_ENV, data_dir);
    }
    init_logging()?;
    if let Some(data_dir) = &cli.data_dir {
        tracing::info!("Using custom data directory: {:?}", data_dir);
    }

    let mut config = match &cli.config {
        Some(path) => config::Config::load_from_path(path)?,
        None => config::Config::load()?,
    };

    let first_launch = config.game.launch_count == 0;
    config.game.launch_count = config.game.launch_count.saturating_add(1);
    if let Err(e) = config.save() {
        tracing::warn!("Failed to record launch count: {:#}", e);
    }

    let mut ui_config = config.ui_config();
    if cli.instant {
        ui_config.output_delay = Duration::ZERO;
        ui_config.animations = false;
    }
    let poll_timeout = config.poll_timeout();
    let audio = sound::build_audio(&config.sound, !cli.no_sound);

    let surface = TerminalSurface::new()?;
    let ui = Ui::new(Box::new(surface), audio, Box::new(ThreadPacer), ui_config);

    let boot = if first_launch {
        ui.loading_animation().map(|_| ())
    } else {
        ui.fast_loading().map(|_| ())
    };
    if let Err(e) = boot {
        tracing::warn!("Skipping loading screen: {}", e);
    }

    let game = Game::new(ui, config)?;
    game.show(cli.scene.screen());

    let mut app = app::App::new(game, poll_timeout);
    let result = app.run(&mut CrosstermInput::new());

    // Dropping the app drops the Ui, which restores the terminal
    drop(app);
    if let Err(e) = &result {
        tracing::error!("Game loop failed: {:#}", e);
    }
    result
}

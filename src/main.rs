use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{Config, WriteLogger};

use snake_arcade::game::TerminalGame;
use snake_arcade::{GameConfig, GameState};

#[derive(Parser)]
#[command(name = "snake_arcade")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// YAML file with game settings. A missing file means defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board width in cells
    #[arg(long)]
    width: Option<i32>,

    /// Board height in cells
    #[arg(long)]
    height: Option<i32>,

    /// Starting tick interval in milliseconds
    #[arg(long)]
    speed: Option<u32>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file. Nothing is logged without it.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Print the effective settings as YAML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };

    // A resized board gets the snake re-centred
    if cli.width.is_some() || cli.height.is_some() {
        config.board_width = cli.width.unwrap_or(config.board_width);
        config.board_height = cli.height.unwrap_or(config.board_height);
        config.initial_snake_x = config.board_width / 2;
        config.initial_snake_y = config.board_height / 2;
    }
    if let Some(speed) = cli.speed {
        config.initial_speed = speed;
    }
    config.validate().context("Invalid game settings")?;

    if cli.print_config {
        print!("{}", config.to_yaml_string()?);
        return Ok(());
    }

    // The terminal belongs to the game, so logs go to a file
    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        WriteLogger::init(cli.log_level, Config::default(), file)?;
    }

    info!(
        "Starting snake_arcade on a {}x{} board",
        config.board_width, config.board_height
    );

    let state = match cli.seed {
        Some(seed) => GameState::with_seed(config, seed),
        None => GameState::new(config),
    };

    let mut game = TerminalGame::new(state)?;
    game.run()?;

    info!("Bye");
    Ok(())
}

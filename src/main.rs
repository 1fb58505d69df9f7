mod config;
mod food;
mod game;
mod input;
mod render;
mod scheduler;
mod sim;
mod snake;
mod store;
mod term;

use std::{fs::File, path::PathBuf, time::{Duration, Instant}};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, LevelFilter};
use rand::{rngs::StdRng, SeedableRng};
use simplelog::{Config, WriteLogger};

use config::GameConfig;
use game::{Flow, SnakeGame};
use input::Command;
use store::JsonFileStore;
use term::TermSurface;

pub type GridInt = i16;
pub type Cell = (GridInt, GridInt);
pub type TermInt = u16;

/// How long to wait for input while no tick source is running.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Grid snake in the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON file with game settings; flags below take precedence over it.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Cells per side of the square board.
    #[arg(short, long)]
    grid_size: Option<GridInt>,

    /// Starting tick interval in milliseconds.
    #[arg(short, long, value_name = "MS")]
    speed: Option<f64>,

    #[arg(long, value_name = "FILE", default_value = ".snake_high_score.json")]
    high_score_file: PathBuf,

    #[arg(long, value_name = "FILE", default_value = "snake.log")]
    log_file: PathBuf,

    #[arg(short, long)]
    verbose: bool,

    /// Seed for food placement, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(speed) = self.speed {
            config.initial_speed_ms = speed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The terminal is in raw mode while playing, so logs go to a file
    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let log_file = File::create(&args.log_file)
        .with_context(|| format!("creating log file {}", args.log_file.display()))?;
    WriteLogger::init(level, Config::default(), log_file).context("initialising logger")?;

    let config = args.game_config()?;
    info!("starting with {:?}", config);

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut view = TermSurface::new(config.grid_size as usize, config.cell_size());
    view.setup()?;

    let store = JsonFileStore::new(&args.high_score_file);
    let mut game = SnakeGame::new(config, view, store, rng);
    let res = run(&mut game);

    // Leave the terminal usable whether or not the loop failed
    let restored = game.into_view().restore();
    if let Err(e) = &res {
        error!("game loop failed: {:#}", e);
    }
    info!("exiting");

    res.and(restored)
}

fn run(game: &mut SnakeGame<TermSurface, JsonFileStore, StdRng>) -> Result<()> {
    game.show_intro()?;

    loop {
        let wait = game.time_until_tick(Instant::now()).unwrap_or(IDLE_POLL);

        for key_ev in term::read_key_events(wait)? {
            if let Some(cmd) = Command::from_key_event(&key_ev) {
                if game.handle(cmd, Instant::now())? == Flow::Quit {
                    return Ok(());
                }
            }
        }

        game.update(Instant::now())?;
    }
}

//! Retro Flight CLI
//!
//! Dodge the asteroids with the arrow keys; Ctrl-C quits.

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use retro_core::{GameConfig, GameContext, GameRng, TerminalScreen, TokioContext};
use retro_demo::flight;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Random stream used by the asteroid spawner
const SPAWN_STREAM: u64 = 1;

/// Retro Flight: an asteroid-dodging terminal game
#[derive(Parser, Debug)]
#[command(name = "retro-flight")]
#[command(about = "Steer a ship through a falling asteroid field", long_about = None)]
struct Args {
    /// Seed for asteroid placement (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Frames per second
    #[arg(short, long)]
    framerate: Option<f64>,

    /// Board width in cells
    #[arg(long)]
    width: Option<u16>,

    /// Board height in cells
    #[arg(long)]
    height: Option<u16>,

    /// Show the game log next to the board
    #[arg(short, long)]
    debug: bool,

    /// JSON game configuration; flags override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write logs (the terminal is busy drawing)
    #[arg(long, default_value = "retro-flight.log")]
    log_file: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Config file (or the classic board) overlaid with command-line flags.
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => flight::flight_config(),
        };
        if let Some(framerate) = self.framerate {
            config = config.with_framerate(framerate);
        }
        let width = self.width.unwrap_or(config.board_size.width);
        let height = self.height.unwrap_or(config.board_size.height);
        config = config.with_board_size((width, height));
        if self.debug {
            config = config.with_debug(true);
        }
        Ok(config.validate()?)
    }
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn init_logging(args: &Args) -> Result<()> {
    let file = File::create(&args.log_file)
        .with_context(|| format!("creating log file {}", args.log_file.display()))?;
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = args.game_config()?;
    let ctx = TokioContext::new();
    let rng = match args.seed {
        Some(seed) => GameRng::seed_from_u64(seed),
        None => ctx.rng(SPAWN_STREAM),
    };
    info!(seed = ?args.seed, ?config, "starting retro-flight");

    let mut game = flight::new_game(config, rng)?;
    let mut screen = TerminalScreen::open()?;
    let outcome = game.play(&ctx, &mut screen).await;
    // Restore the terminal before reporting anything
    drop(screen);
    outcome.context("game aborted")?;

    let score = flight::score(&game);
    info!(score, "game over");
    println!("Final score: {score}");
    Ok(())
}

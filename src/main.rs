use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use snake_q::config::AppConfig;
use snake_q::modes::{PlayMode, TrainMode};
use snake_q::render::TerminalRenderer;
use snake_q::rl::{InferenceBackend, TrainingBackend, default_device};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "snake_q")]
#[command(version, about = "Snake game with a Q-learning agent")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the agent, saving the network on every new record
    Train(TrainArgs),
    /// Watch a saved network play
    Play(PlayArgs),
}

#[derive(Parser)]
struct TrainArgs {
    /// TOML configuration file (default: ./snake_q.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many episodes (default: run until interrupted)
    #[arg(long)]
    episodes: Option<usize>,

    /// Where to save the best network
    #[arg(long)]
    save_path: Option<PathBuf>,

    /// Seed for the game and the agent
    #[arg(long)]
    seed: Option<u64>,

    /// Draw every frame to stdout
    #[arg(long, default_value_t = false)]
    render: bool,
}

#[derive(Parser)]
struct PlayArgs {
    /// Saved model (.mpk with its .meta.json sidecar)
    #[arg(long)]
    model: PathBuf,

    /// TOML configuration file (only the [game] section is used)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "1")]
    episodes: usize,

    /// Cap on moves per episode
    #[arg(long)]
    max_steps: Option<usize>,

    /// Pause between frames in milliseconds
    #[arg(long, default_value = "100")]
    delay_ms: u64,
}

/// Config picked up from the working directory when `--config` is not given
const DEFAULT_CONFIG_FILE: &str = "snake_q.toml";

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    Ok(match path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    })
}

fn train(args: TrainArgs) -> Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    if args.episodes.is_some() {
        config.train.max_episodes = args.episodes;
    }
    if let Some(save_path) = args.save_path {
        config.train.save_path = save_path;
    }
    if let Some(seed) = args.seed {
        config.game.seed = Some(seed);
        config.agent.seed = Some(seed);
    }
    config.validate()?;

    let mut train_mode = TrainMode::<TrainingBackend>::new(
        config.game,
        config.agent,
        config.train,
        default_device(),
    )?;
    if args.render {
        let renderer = TerminalRenderer::stdout().context("Failed to set up terminal")?;
        train_mode = train_mode.with_renderer(Box::new(renderer));
    }

    train_mode.run();
    Ok(())
}

async fn play(args: PlayArgs) -> Result<()> {
    let config = load_config(args.config.as_ref())?;

    let mut play_mode =
        PlayMode::<InferenceBackend>::new(&args.model, config.game, &default_device())?
            .with_renderer(Box::new(
                TerminalRenderer::stdout().context("Failed to set up terminal")?,
            ))
            .with_max_steps(args.max_steps)
            .with_frame_delay(Duration::from_millis(args.delay_ms));

    let scores = play_mode.run(args.episodes).await;
    // Restore the screen before reporting
    drop(play_mode);
    info!("Scores: {:?}", scores);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Train(args) => train(args),
        Commands::Play(args) => play(args).await,
    }
}

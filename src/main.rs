use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use super_snake::game::{Ladder, clock_seed};
use super_snake::modes::{HumanMode, LEADERBOARD_SIZE};
use super_snake::score::{
    InMemorySessionManager, MemoryScoreStore, PersistenceWorker, ScoreBridge, ScoreStore,
    SessionManager, SqliteScoreStore,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "super_snake")]
#[command(version, about = "Snake with a five-level ladder and persistent scores")]
struct Cli {
    /// SQLite database holding scores
    #[arg(long, default_value = "super_snake.db")]
    db: PathBuf,

    /// Keep scores in memory only
    #[arg(long, conflicts_with = "db")]
    memory: bool,

    /// Player name stored with each score (defaults to $USER)
    #[arg(long)]
    user: Option<String>,

    /// Level to start each new game on
    #[arg(long, default_value = "1")]
    start_level: u32,

    /// JSON file with a custom level ladder
    #[arg(long)]
    levels: Option<PathBuf>,

    /// Log destination; the terminal is taken by the game
    #[arg(long, default_value = "super_snake.log")]
    log_file: PathBuf,

    /// Fixed seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Print the top scores and exit
    #[arg(long)]
    leaderboard: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let ladder = match &cli.levels {
        Some(path) => Ladder::load(path)
            .with_context(|| format!("Failed to load levels from {:?}", path))?,
        None => Ladder::default(),
    };
    if ladder.get(cli.start_level).is_none() {
        anyhow::bail!("start level {} is not in the ladder", cli.start_level);
    }

    let user = cli.user.clone().unwrap_or_else(default_user);
    let store: Arc<dyn ScoreStore> = if cli.memory {
        Arc::new(MemoryScoreStore::new(user))
    } else {
        Arc::new(
            SqliteScoreStore::open(&cli.db, user)
                .with_context(|| format!("Failed to open score database {:?}", cli.db))?,
        )
    };

    // Without a session there is no score continuity; refuse to start
    let sessions = Arc::new(InMemorySessionManager::new());
    sessions
        .current_session()
        .context("Failed to create a session")?;

    let (bridge, queue) = ScoreBridge::new(Arc::clone(&store), sessions);

    if cli.leaderboard {
        print_leaderboard(&bridge);
        return Ok(());
    }

    let worker = PersistenceWorker::spawn(store, queue);
    let seed = cli.seed.unwrap_or_else(clock_seed);
    tracing::info!(seed, levels = ladder.len(), "starting");

    let mut mode = HumanMode::new(Arc::new(ladder), bridge, cli.start_level, seed);
    let result = mode.run().await;

    // Closing the last bridge lets the worker drain and stop
    drop(mode);
    let applied = worker.shutdown().await;
    tracing::info!(applied, "score writes flushed");

    result
}

fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn default_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "player".to_string())
}

fn print_leaderboard(bridge: &ScoreBridge) {
    match bridge.high_score() {
        Some(best) => println!("High score: {} by {}", best.value, best.user),
        None => println!("No scores recorded yet"),
    }

    for (rank, record) in bridge.leaderboard(LEADERBOARD_SIZE).iter().enumerate() {
        println!("{:>2}. {:<16} {:>6}", rank + 1, record.user, record.value);
    }
}

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tools::{JsonScoreStore, RunConfig, init_tracing};
use tower_core::{
    Command, Direction, HighScoreStore, MemoryScoreStore, Recorder, Session, SessionState,
};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run configuration TOML; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(short, long, default_value_t = 1000)]
    ticks: u32,
    /// Write the generated journal here for the replay tool
    #[arg(short, long)]
    journal: Option<PathBuf>,
    /// Report finished runs to the configured high-score file
    #[arg(long)]
    keep_scores: bool,
}

const COMMANDS: [Command; 6] = [
    Command::Move(Direction::Up),
    Command::Move(Direction::Down),
    Command::Move(Direction::Left),
    Command::Move(Direction::Right),
    Command::Pulse,
    Command::Pulse,
];

fn main() -> Result<()> {
    init_tracing("info");
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RunConfig::load(path).context("Failed to load run configuration")?,
        None => RunConfig::default(),
    };
    let base = args.config.as_ref().and_then(|path| path.parent()).map(PathBuf::from).unwrap_or_default();
    let campaign = config.campaign(&base).context("Failed to load campaign")?;
    let seed = args.seed.unwrap_or(config.seed);

    println!("Starting fuzz harness on seed {} for {} pulses...", seed, args.ticks);
    let scores: Box<dyn HighScoreStore> = match config.score_path().filter(|_| args.keep_scores) {
        Some(path) => Box::new(
            JsonScoreStore::open(&path, config.engine.high_score_capacity)
                .with_context(|| format!("Failed to load high scores from {}", path.display()))?,
        ),
        None => Box::new(MemoryScoreStore::new(config.engine.high_score_capacity)),
    };
    let mut recorder =
        Recorder::with_store(&campaign, config.engine.clone(), seed, &config.player_name, scores)
            .context("Failed to build the campaign")?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    recorder.apply(Command::Start);
    while recorder.session().current_tick() < u64::from(args.ticks) {
        let command = COMMANDS[rng.next_u64() as usize % COMMANDS.len()].clone();
        recorder.apply(command);
        check_invariants(recorder.session())?;
        if recorder.session().state().is_terminal() {
            break;
        }
    }

    let session = recorder.session();
    println!(
        "Stopped in {:?} on floor {} after {} pulses ({:?} of {:?} play), score {}, hash {:#018x}",
        session.state(),
        session.floor_index(),
        session.current_tick(),
        config.play_time(session.current_tick()),
        config.difficulty,
        session.score(),
        session.snapshot_hash()
    );

    if session.state() == SessionState::GameOver && args.keep_scores {
        for (rank, entry) in session.high_scores().iter().enumerate() {
            println!("{:>2}. {:<16} {}", rank + 1, entry.name, entry.score);
        }
    }

    if let Some(path) = &args.journal {
        let json = serde_json::to_string_pretty(recorder.journal())?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write journal: {}", path.display()))?;
        info!(path = %path.display(), "journal written");
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}

fn check_invariants(session: &Session) -> Result<()> {
    let floor = session.current_floor();
    anyhow::ensure!(floor.in_bounds(session.player().pos()), "Invariant failed: player off the grid");
    anyhow::ensure!(
        session.levels().floors().iter().all(|floor| floor.countdowns_consistent()),
        "Invariant failed: countdown table out of sync with the grid"
    );
    anyhow::ensure!(
        session.player().trophies <= session.total_trophies(),
        "Invariant failed: more trophies than the tower holds"
    );
    Ok(())
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tools::{JsonScoreStore, RunConfig, init_tracing};
use tower_core::{HighScoreStore, InputJournal, replay_to_end};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run configuration TOML; defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Re-execute a recorded journal and print the final state
    Replay {
        /// Path to the journal JSON file to replay
        #[arg(short, long)]
        journal: PathBuf,
        /// Fail unless the replay ends on this snapshot hash (hex)
        #[arg(long)]
        expect_hash: Option<String>,
    },
    /// Print the stored high-score table
    Scores,
}

fn main() -> Result<()> {
    init_tracing("warn");
    let args = Args::parse();

    let (config, base) = match &args.config {
        Some(path) => (
            RunConfig::load(path).context("Failed to load run configuration")?,
            path.parent().map(Path::to_path_buf).unwrap_or_default(),
        ),
        None => (RunConfig::default(), PathBuf::new()),
    };

    match args.command {
        Action::Replay { journal, expect_hash } => replay(&config, &base, &journal, expect_hash),
        Action::Scores => scores(&config),
    }
}

fn replay(config: &RunConfig, base: &Path, path: &Path, expect_hash: Option<String>) -> Result<()> {
    let journal_data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read journal file: {}", path.display()))?;
    let journal: InputJournal =
        serde_json::from_str(&journal_data).context("Failed to deserialize journal JSON")?;
    let campaign = config.campaign(base).context("Failed to load campaign")?;
    info!(seed = journal.seed, inputs = journal.inputs.len(), "replaying journal");

    let result = replay_to_end(&campaign, &config.engine, &journal).context("Replay failed")?;

    println!("Replay complete.");
    println!("Final Tick: {}", result.final_tick);
    println!("Final State: {:?}", result.final_state);
    println!("Final Floor: {}", result.final_floor);
    println!("Score: {}", result.final_score);
    println!("Snapshot Hash: {:#018x}", result.final_snapshot_hash);

    if let Some(expected) = expect_hash {
        let expected = u64::from_str_radix(expected.trim_start_matches("0x"), 16)
            .with_context(|| format!("Invalid expected hash: {expected}"))?;
        anyhow::ensure!(
            expected == result.final_snapshot_hash,
            "Snapshot hash mismatch: expected {expected:#018x}, got {:#018x}",
            result.final_snapshot_hash
        );
    }
    Ok(())
}

fn scores(config: &RunConfig) -> Result<()> {
    let path = config.score_path().context("No high score location available on this platform")?;
    let store = JsonScoreStore::open(&path, config.engine.high_score_capacity)
        .with_context(|| format!("Failed to load high scores from {}", path.display()))?;
    if store.entries().is_empty() {
        println!("No high scores yet.");
    }
    for (rank, entry) in store.entries().iter().enumerate() {
        println!("{:>2}. {:<16} {}", rank + 1, entry.name, entry.score);
    }
    Ok(())
}

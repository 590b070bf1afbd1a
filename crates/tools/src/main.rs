use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use log::info;
use serde::Serialize;
use umbra_core::journal_file::load_journal_from_file;
use umbra_core::{ReplayResult, RunOutcome, replay_to_end};
use umbra_tools::{logging, settings};

#[derive(Parser)]
#[command(author, version, about = "Replays a recorded command journal headlessly", long_about = None)]
struct Args {
    /// Path to the JSONL journal file to replay
    #[arg(short, long)]
    journal: PathBuf,
    /// Fail unless the journal was recorded with the config in this TOML file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Expected final snapshot hash, in hex
    #[arg(long)]
    expect_hash: Option<String>,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
    /// Raise log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct Summary {
    outcome: RunOutcome,
    final_rank: i64,
    snapshot_hash: String,
    commands: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose).context("failed to install logger")?;

    let loaded = load_journal_from_file(&args.journal)
        .with_context(|| format!("failed to load journal {}", args.journal.display()))?;
    info!(
        "loaded {} commands for seed {} from {}",
        loaded.journal.inputs.len(),
        loaded.journal.seed,
        args.journal.display()
    );
    if let Some(path) = &args.config {
        let expected = settings::load_config(Some(path))?;
        if expected != loaded.journal.config {
            bail!("journal was recorded with a different config than {}", path.display());
        }
    }

    let result: ReplayResult =
        replay_to_end(&loaded.journal).context("replay failed during execution")?;
    let snapshot_hash = format!("{:016x}", result.final_snapshot_hash);

    if args.json {
        let summary = Summary {
            outcome: result.final_outcome,
            final_rank: result.final_rank,
            snapshot_hash: snapshot_hash.clone(),
            commands: loaded.journal.inputs.len(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Replay complete.");
        println!("Final rank: {}", result.final_rank);
        println!("Outcome: {:?}", result.final_outcome);
        println!("Snapshot hash: {snapshot_hash}");
    }

    if let Some(expected) = &args.expect_hash
        && !expected.eq_ignore_ascii_case(&snapshot_hash)
    {
        bail!("snapshot hash {snapshot_hash} does not match expected {expected}");
    }
    Ok(())
}

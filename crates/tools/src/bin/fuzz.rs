use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use log::{info, warn};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use umbra_core::journal_file::JournalWriter;
use umbra_core::{AdvanceStopReason, Command, CommandJournal, Dir, Game, Pos, save_snapshot};
use umbra_tools::{logging, settings};

#[derive(Parser)]
#[command(author, version, about = "Drives a generated level with random commands", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of player commands to issue before quitting
    #[arg(short = 'n', long, default_value_t = 1000)]
    commands: u32,
    /// Optional TOML config layered over the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Record every command to this JSONL journal
    #[arg(short, long)]
    record: Option<PathBuf>,
    /// Save a snapshot of the final state here
    #[arg(long)]
    save: Option<PathBuf>,
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn random_command(rng: &mut ChaCha8Rng, width: i32, height: i32) -> Command {
    match rng.next_u64() % 8 {
        0 => Command::Wait,
        1 => Command::Rest,
        2 => Command::Explore,
        3 => {
            let x = (rng.next_u64() % width.max(1) as u64) as i32;
            let y = (rng.next_u64() % height.max(1) as u64) as i32;
            Command::TravelTo(Pos { y, x })
        }
        _ => Command::Move(Dir::ALL[(rng.next_u64() % 16) as usize]),
    }
}

/// Invariants every reachable state must hold.
fn check_invariants(game: &Game) -> Result<()> {
    let state = game.state();
    if state.player.hp > state.player.max_hp {
        bail!("player hp {} above max {}", state.player.hp, state.player.max_hp);
    }
    if !state.dungeon.is_passable(state.player.pos) {
        bail!("player inside a wall at {:?}", state.player.pos);
    }
    for (index, monster) in state.living_monsters() {
        if !state.dungeon.is_passable(monster.pos) {
            bail!("monster {} inside a wall at {:?}", index.0, monster.pos);
        }
        if monster.pos == state.player.pos {
            bail!("monster {} shares the player cell", index.0);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose).context("failed to install logger")?;
    let config = settings::load_config(args.config.as_deref())?;
    let (width, height) = (config.level.width, config.level.height);

    println!("Starting fuzz harness on seed {} for {} commands...", args.seed, args.commands);
    let mut game = Game::new(args.seed, config.clone()).context("level generation failed")?;
    let mut writer = match &args.record {
        Some(path) => Some(
            JournalWriter::create(path, &CommandJournal::new(args.seed, config))
                .with_context(|| format!("failed to create journal {}", path.display()))?,
        ),
        None => None,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut issued = 0;
    let mut refused = 0;
    loop {
        let result = game.advance(500);
        match result.stop_reason {
            AdvanceStopReason::Finished(outcome) => {
                println!("Finished with {outcome:?} at rank {} after {issued} commands", game.current_rank());
                break;
            }
            AdvanceStopReason::AwaitingInput => {
                let command = if issued >= args.commands {
                    Command::Quit
                } else {
                    random_command(&mut rng, width, height)
                };
                issued += 1;
                if let Some(writer) = writer.as_mut() {
                    writer.append(game.current_rank(), command)?;
                }
                if let Err(error) = game.submit(command) {
                    refused += 1;
                    info!("{command:?} refused: {error}");
                }
            }
            AdvanceStopReason::BudgetExhausted => {}
            AdvanceStopReason::QueueEmpty => bail!("event queue drained at rank {}", game.current_rank()),
            AdvanceStopReason::EngineFailure(failure) => {
                warn!("engine failure after {issued} commands");
                return Err(failure).context("simulation failed");
            }
        }
        check_invariants(&game)
            .with_context(|| format!("invariant broken at rank {}", game.current_rank()))?;
    }

    if let Some(path) = &args.save {
        save_snapshot(path, &game.to_snapshot())
            .with_context(|| format!("failed to save snapshot {}", path.display()))?;
    }
    println!(
        "Fuzzing completed: {refused} refusals, {} log events, hash {:016x}",
        game.log().len(),
        game.snapshot_hash()
    );
    Ok(())
}

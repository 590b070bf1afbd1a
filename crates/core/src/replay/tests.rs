use super::*;
use crate::config::SimConfig;
use crate::types::{Command, Dir, LogEvent, Pos};

/// Plays `script` round-robin for `turns` player turns, then quits, journaling every command.
fn record_run(seed: u64, script: &[Command], turns: usize) -> (Game, CommandJournal) {
    let config = SimConfig::default();
    let mut game = Game::new(seed, config.clone()).unwrap();
    let mut journal = CommandJournal::new(seed, config);
    let mut issued = 0;
    loop {
        match game.advance(REPLAY_BATCH).stop_reason {
            AdvanceStopReason::Finished(_) => break,
            AdvanceStopReason::AwaitingInput => {
                let command =
                    if issued >= turns { Command::Quit } else { script[issued % script.len()] };
                issued += 1;
                journal.append(game.current_rank(), command);
                let _ = game.submit(command);
            }
            AdvanceStopReason::BudgetExhausted => {}
            other => panic!("unexpected stop: {other:?}"),
        }
    }
    (game, journal)
}

#[test]
fn replay_reproduces_a_walking_run() {
    let script = [
        Command::Move(Dir::E),
        Command::Move(Dir::E),
        Command::Move(Dir::S),
        Command::Wait,
        Command::Move(Dir::W),
        Command::Move(Dir::N),
    ];
    let (game, journal) = record_run(777, &script, 60);
    let replayed = replay_to_end(&journal).unwrap();

    assert_eq!(replayed.final_snapshot_hash, game.snapshot_hash());
    assert_eq!(replayed.final_rank, game.current_rank());
    assert_eq!(Some(replayed.final_outcome), game.outcome());
}

#[test]
fn replay_reproduces_auto_modes_and_refusals() {
    let script = [
        Command::Explore,
        Command::Move(Dir::Nne),
        Command::Rest,
        Command::TravelTo(Pos { y: 0, x: 0 }),
        Command::Wait,
    ];
    let (game, journal) = record_run(1_234, &script, 40);
    assert!(
        game.log().iter().any(|event| matches!(event, LogEvent::ActionFailed { .. })),
        "the script includes commands that are always refused"
    );

    let replayed = replay_to_end(&journal).unwrap();
    assert_eq!(replayed.final_snapshot_hash, game.snapshot_hash());
}

#[test]
fn journal_survives_a_json_round_trip() {
    let (game, journal) = record_run(42, &[Command::Explore, Command::Wait], 25);
    let json = serde_json::to_string(&journal).unwrap();
    let restored: CommandJournal = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, journal);
    assert_eq!(replay_to_end(&restored).unwrap().final_snapshot_hash, game.snapshot_hash());
}

#[test]
fn truncated_journal_reports_missing_input() {
    let (_, mut journal) = record_run(9, &[Command::Wait], 5);
    journal.inputs.pop();

    assert!(matches!(replay_to_end(&journal), Err(ReplayError::MissingInput { .. })));
}

#[test]
fn shifted_rank_is_detected() {
    let (_, mut journal) = record_run(9, &[Command::Wait], 5);
    journal.inputs[2].rank += 1;

    assert_eq!(
        replay_to_end(&journal),
        Err(ReplayError::RankMismatch {
            seq: 2,
            expected: journal.inputs[2].rank,
            actual: journal.inputs[2].rank - 1,
        })
    );
}

use umbra_core::journal_file::{JournalWriter, load_journal_from_file};
use umbra_core::{
    AdvanceStopReason, Command, CommandJournal, Dir, Game, SimConfig, load_snapshot,
    replay_to_end, save_snapshot,
};

const SCRIPT: [Command; 6] = [
    Command::Explore,
    Command::Move(Dir::E),
    Command::Move(Dir::Se),
    Command::Wait,
    Command::Rest,
    Command::Move(Dir::N),
];

/// Feeds `SCRIPT` to the game until `turns` commands were issued, then quits.
/// Every command is handed to `record` before it is applied.
fn play(game: &mut Game, start: usize, turns: usize, mut record: impl FnMut(i64, Command)) {
    let mut issued = start;
    loop {
        match game.advance(256).stop_reason {
            AdvanceStopReason::AwaitingInput => {
                let command =
                    if issued >= turns { Command::Quit } else { SCRIPT[issued % SCRIPT.len()] };
                issued += 1;
                record(game.current_rank(), command);
                let _ = game.submit(command);
            }
            AdvanceStopReason::BudgetExhausted => {}
            AdvanceStopReason::Finished(_) => return,
            other => panic!("unexpected stop: {other:?}"),
        }
    }
}

/// Plays until `count` commands have been applied and the next one is awaited.
fn play_until_turn(game: &mut Game, count: usize) {
    let mut issued = 0;
    while issued < count {
        match game.advance(256).stop_reason {
            AdvanceStopReason::AwaitingInput => {
                let _ = game.submit(SCRIPT[issued % SCRIPT.len()]);
                issued += 1;
            }
            AdvanceStopReason::BudgetExhausted => {}
            AdvanceStopReason::Finished(_) => return,
            other => panic!("unexpected stop: {other:?}"),
        }
    }
}

#[test]
fn file_journal_replays_to_the_same_hash() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.jsonl");
    let seed = 12_345;
    let config = SimConfig::default();

    let mut game = Game::new(seed, config.clone()).unwrap();
    let mut writer = JournalWriter::create(&path, &CommandJournal::new(seed, config)).unwrap();
    play(&mut game, 0, 120, |rank, command| writer.append(rank, command).unwrap());
    drop(writer);

    let loaded = load_journal_from_file(&path).expect("journal loads");
    assert_eq!(loaded.journal.seed, seed);
    let replayed = replay_to_end(&loaded.journal).expect("journal replays");

    assert_eq!(replayed.final_snapshot_hash, game.snapshot_hash());
    assert_eq!(replayed.final_rank, game.current_rank());
    assert_eq!(Some(replayed.final_outcome), game.outcome());
}

#[test]
fn resumed_snapshot_continues_like_the_original_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saves").join("slot.json");
    let seed = 2_024;
    let pause_at = 15;

    let mut original = Game::new(seed, SimConfig::default()).unwrap();
    play_until_turn(&mut original, pause_at);
    save_snapshot(&path, &original.to_snapshot()).unwrap();

    let mut resumed = Game::from_snapshot(load_snapshot(&path).unwrap()).unwrap();
    assert_eq!(resumed.snapshot_hash(), original.snapshot_hash());

    play(&mut original, pause_at, 60, |_, _| {});
    play(&mut resumed, pause_at, 60, |_, _| {});
    assert_eq!(resumed.snapshot_hash(), original.snapshot_hash());
    assert_eq!(resumed.log(), original.log());
}

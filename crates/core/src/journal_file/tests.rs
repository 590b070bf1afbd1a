use std::fs::{self, OpenOptions};
use std::io::Write;

use tempfile::tempdir;

use super::*;
use crate::types::{Dir, Pos};

fn sample_journal(seed: u64) -> CommandJournal {
    CommandJournal::new(seed, SimConfig::default())
}

#[test]
fn header_and_records_load_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.jsonl");

    let mut writer = JournalWriter::create(&path, &sample_journal(42)).unwrap();
    writer.append(0, Command::Move(Dir::E)).unwrap();
    writer.append(10, Command::TravelTo(Pos { y: 3, x: 4 })).unwrap();
    writer.append(25, Command::Quit).unwrap();

    let loaded = load_journal_from_file(&path).unwrap();
    assert_eq!(loaded.journal.seed, 42);
    assert_eq!(loaded.journal.config, SimConfig::default());
    let commands: Vec<(u64, i64, Command)> = loaded
        .journal
        .inputs
        .iter()
        .map(|record| (record.seq, record.rank, record.command))
        .collect();
    assert_eq!(
        commands,
        vec![
            (0, 0, Command::Move(Dir::E)),
            (1, 10, Command::TravelTo(Pos { y: 3, x: 4 })),
            (2, 25, Command::Quit),
        ]
    );
    assert_eq!(loaded.next_seq, 3);
    assert_ne!(loaded.last_sha256_hex, INITIAL_HASH);
}

#[test]
fn edited_record_breaks_the_chain() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("edited.jsonl");
    let mut writer = JournalWriter::create(&path, &sample_journal(1)).unwrap();
    writer.append(0, Command::Wait).unwrap();
    writer.append(10, Command::Move(Dir::N)).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let mut lines: Vec<String> = content.lines().map(String::from).collect();
    lines[2] = lines[2].replace("\"N\"", "\"S\"");
    fs::write(&path, lines.join("\n") + "\n").unwrap();

    let result = load_journal_from_file(&path);
    assert!(
        matches!(result, Err(JournalLoadError::HashChainBroken { line: 3 })),
        "expected a broken chain at line 3, got: {result:?}"
    );
}

#[test]
fn removed_record_is_detected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("removed.jsonl");
    let mut writer = JournalWriter::create(&path, &sample_journal(1)).unwrap();
    for rank in [0, 10, 20] {
        writer.append(rank, Command::Wait).unwrap();
    }

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    fs::write(&path, format!("{}\n{}\n{}\n", lines[0], lines[1], lines[3])).unwrap();

    let result = load_journal_from_file(&path);
    assert!(
        matches!(result, Err(JournalLoadError::InvalidRecord { line: 3, .. })),
        "expected the sequence gap at line 3, got: {result:?}"
    );
}

#[test]
fn half_written_record_is_incomplete() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("torn.jsonl");
    let mut writer = JournalWriter::create(&path, &sample_journal(1)).unwrap();
    writer.append(0, Command::Wait).unwrap();

    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    write!(file, "{{\"seq\":1,\"ra").unwrap();

    let result = load_journal_from_file(&path);
    assert!(
        matches!(result, Err(JournalLoadError::IncompleteLine { line: 3 })),
        "expected an incomplete line 3, got: {result:?}"
    );
}

#[test]
fn empty_and_garbage_files_are_rejected() {
    let dir = tempdir().unwrap();
    let empty = dir.path().join("empty.jsonl");
    fs::write(&empty, "").unwrap();
    assert!(matches!(load_journal_from_file(&empty), Err(JournalLoadError::EmptyFile)));

    let garbage = dir.path().join("garbage.jsonl");
    fs::write(&garbage, "not json\n").unwrap();
    assert!(matches!(
        load_journal_from_file(&garbage),
        Err(JournalLoadError::InvalidHeader { line: 1, .. })
    ));
}

#[test]
fn resumed_writer_extends_the_chain() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("resume.jsonl");
    let mut writer = JournalWriter::create(&path, &sample_journal(8)).unwrap();
    writer.append(0, Command::Explore).unwrap();
    drop(writer);

    let loaded = load_journal_from_file(&path).unwrap();
    let mut writer = JournalWriter::resume(&path, &loaded).unwrap();
    writer.append(40, Command::Rest).unwrap();
    drop(writer);

    let reloaded = load_journal_from_file(&path).unwrap();
    assert_eq!(reloaded.journal.inputs.len(), 2);
    assert_eq!(reloaded.journal.inputs[1].command, Command::Rest);
    assert_eq!(reloaded.next_seq, 2);
}

//! Line-delimited JSON command journal with a SHA-256 chain.
//!
//! Line 1 is the header (`format_version`, `seed`, `config`). Every later line
//! is one submitted command carrying `prev_sha256_hex` and `sha256_hex`, where
//! the digest covers the record body followed by the previous digest. Each
//! record is flushed as soon as it is written; loading stops at the first line
//! that is malformed, out of sequence or breaks the chain.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::SimConfig;
use crate::journal::{CommandJournal, CommandRecord};
use crate::types::Command;

#[derive(Serialize, Deserialize)]
struct FileHeader {
    format_version: u16,
    seed: u64,
    config: SimConfig,
}

/// The hashed part of a record.
#[derive(Serialize)]
struct RecordBody<'a> {
    seq: u64,
    rank: i64,
    command: &'a Command,
}

#[derive(Serialize, Deserialize)]
struct FileRecord {
    seq: u64,
    rank: i64,
    command: Command,
    prev_sha256_hex: String,
    sha256_hex: String,
}

/// Digest that precedes the first record.
pub const INITIAL_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

fn chain_sha256(body_json: &str, prev_sha256_hex: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body_json.as_bytes());
    hasher.update(prev_sha256_hex.as_bytes());
    format!("{:064x}", hasher.finalize())
}

fn body_json(seq: u64, rank: i64, command: &Command) -> serde_json::Result<String> {
    serde_json::to_string(&RecordBody { seq, rank, command })
}

pub struct JournalWriter {
    writer: BufWriter<File>,
    last_sha256_hex: String,
    next_seq: u64,
}

impl JournalWriter {
    /// Creates the file and writes the header line.
    pub fn create(path: &Path, journal: &CommandJournal) -> io::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        let header = FileHeader {
            format_version: journal.format_version,
            seed: journal.seed,
            config: journal.config.clone(),
        };
        writeln!(writer, "{}", serde_json::to_string(&header).map_err(io::Error::other)?)?;
        writer.flush()?;
        Ok(Self { writer, last_sha256_hex: INITIAL_HASH.to_string(), next_seq: 0 })
    }

    /// Reopens a loaded journal for appending.
    pub fn resume(path: &Path, loaded: &LoadedJournal) -> io::Result<Self> {
        let file = OpenOptions::new().append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            last_sha256_hex: loaded.last_sha256_hex.clone(),
            next_seq: loaded.next_seq,
        })
    }

    pub fn append(&mut self, rank: i64, command: Command) -> io::Result<()> {
        let body = body_json(self.next_seq, rank, &command).map_err(io::Error::other)?;
        let sha256_hex = chain_sha256(&body, &self.last_sha256_hex);
        let record = FileRecord {
            seq: self.next_seq,
            rank,
            command,
            prev_sha256_hex: self.last_sha256_hex.clone(),
            sha256_hex: sha256_hex.clone(),
        };
        writeln!(self.writer, "{}", serde_json::to_string(&record).map_err(io::Error::other)?)?;
        self.writer.flush()?;

        self.last_sha256_hex = sha256_hex;
        self.next_seq += 1;
        Ok(())
    }
}

#[derive(Debug)]
pub struct LoadedJournal {
    pub journal: CommandJournal,
    pub last_sha256_hex: String,
    pub next_seq: u64,
}

#[derive(Debug, Error)]
pub enum JournalLoadError {
    #[error("journal I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("journal file is empty")]
    EmptyFile,
    #[error("invalid journal header at line {line}: {message}")]
    InvalidHeader { line: usize, message: String },
    #[error("invalid journal record at line {line}: {message}")]
    InvalidRecord { line: usize, message: String },
    #[error("incomplete journal line at line {line}")]
    IncompleteLine { line: usize },
    #[error("SHA-256 chain broken at line {line}")]
    HashChainBroken { line: usize },
}

pub fn load_journal_from_file(path: &Path) -> Result<LoadedJournal, JournalLoadError> {
    let content = fs::read_to_string(path)?;
    let lines: Vec<&str> = content.lines().collect();
    if lines.is_empty() {
        return Err(JournalLoadError::EmptyFile);
    }
    if !content.ends_with('\n') {
        return Err(JournalLoadError::IncompleteLine { line: lines.len() });
    }

    let header: FileHeader = serde_json::from_str(lines[0])
        .map_err(|e| JournalLoadError::InvalidHeader { line: 1, message: e.to_string() })?;
    let mut journal = CommandJournal {
        format_version: header.format_version,
        seed: header.seed,
        config: header.config,
        inputs: Vec::new(),
    };

    let mut prev_sha256_hex = INITIAL_HASH.to_string();
    for (offset, line) in lines.iter().enumerate().skip(1) {
        let line_number = offset + 1;
        let invalid = |message: String| JournalLoadError::InvalidRecord { line: line_number, message };

        let record: FileRecord = serde_json::from_str(line).map_err(|e| invalid(e.to_string()))?;
        let expected_seq = journal.inputs.len() as u64;
        if record.seq != expected_seq {
            return Err(invalid(format!("expected seq {expected_seq}, found {}", record.seq)));
        }
        if record.prev_sha256_hex != prev_sha256_hex {
            return Err(JournalLoadError::HashChainBroken { line: line_number });
        }
        let body = body_json(record.seq, record.rank, &record.command)
            .map_err(|e| invalid(e.to_string()))?;
        if chain_sha256(&body, &prev_sha256_hex) != record.sha256_hex {
            return Err(JournalLoadError::HashChainBroken { line: line_number });
        }

        journal.inputs.push(CommandRecord {
            seq: record.seq,
            rank: record.rank,
            command: record.command,
        });
        prev_sha256_hex = record.sha256_hex;
    }

    let next_seq = journal.inputs.len() as u64;
    Ok(LoadedJournal { journal, last_sha256_hex: prev_sha256_hex, next_seq })
}

#[cfg(test)]
mod tests;

//! Saved games: a serialisable image of a run plus a digest-checked file envelope.
//!
//! The file is a single JSON object `{ format_version, sha256_hex, body }` where
//! `sha256_hex` covers the canonical JSON text of `body`. Writes go to a sibling
//! temporary file first and are renamed into place.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::SimConfig;
use crate::schedule::{Event, Scheduler};
use crate::state::GameState;
use crate::types::{AutoMode, LogEvent, MonsterIdx, Pos, RunOutcome};

pub const SNAPSHOT_FORMAT_VERSION: u16 = 1;

/// Everything needed to resume a run exactly where it stopped.
/// Search structures and ray maps are rebuilt on load.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub seed: u64,
    pub config: SimConfig,
    pub state: GameState,
    pub scheduler: Scheduler,
    pub log: Vec<LogEvent>,
    pub rng_draws: u64,
    pub current_rank: i64,
    pub awaiting: Option<Event>,
    pub auto: Option<AutoMode>,
    pub outcome: Option<RunOutcome>,
    pub visible_monsters: BTreeSet<MonsterIdx>,
    pub heard: BTreeSet<Pos>,
    pub watched: BTreeSet<Pos>,
}

#[derive(Serialize, Deserialize)]
struct SnapshotEnvelope {
    format_version: u16,
    sha256_hex: String,
    body: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("snapshot could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("snapshot digest does not match its contents")]
    DigestMismatch,
    #[error("unsupported snapshot format version {0}")]
    UnsupportedVersion(u16),
}

fn body_sha256(body: &serde_json::Value) -> Result<String, SnapshotError> {
    let text = serde_json::to_string(body)?;
    let digest = Sha256::digest(text.as_bytes());
    Ok(format!("{digest:064x}"))
}

pub fn save_snapshot(path: &Path, snapshot: &GameSnapshot) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let body = serde_json::to_value(snapshot)?;
    let envelope = SnapshotEnvelope {
        format_version: SNAPSHOT_FORMAT_VERSION,
        sha256_hex: body_sha256(&body)?,
        body,
    };

    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path)?;
    serde_json::to_writer(&mut file, &envelope)?;
    file.flush()?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<GameSnapshot, SnapshotError> {
    let text = fs::read_to_string(path)?;
    let envelope: SnapshotEnvelope = serde_json::from_str(&text)?;
    if envelope.format_version != SNAPSHOT_FORMAT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(envelope.format_version));
    }
    if body_sha256(&envelope.body)? != envelope.sha256_hex {
        return Err(SnapshotError::DigestMismatch);
    }
    Ok(serde_json::from_value(envelope.body)?)
}

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::types::Command;

pub const JOURNAL_FORMAT_VERSION: u16 = 1;

/// Every command a run accepted, in order. Together with the seed and
/// config this reproduces the run exactly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommandJournal {
    pub format_version: u16,
    pub seed: u64,
    pub config: SimConfig,
    pub inputs: Vec<CommandRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub seq: u64,
    /// Rank of the player turn the command was applied to.
    pub rank: i64,
    pub command: Command,
}

impl CommandJournal {
    pub fn new(seed: u64, config: SimConfig) -> Self {
        Self { format_version: JOURNAL_FORMAT_VERSION, seed, config, inputs: Vec::new() }
    }

    pub fn append(&mut self, rank: i64, command: Command) {
        let seq = self.inputs.len() as u64;
        self.inputs.push(CommandRecord { seq, rank, command });
    }
}

//! Headless re-execution of a command journal.

use thiserror::Error;

use crate::error::{GameError, SimError};
use crate::game::Game;
use crate::journal::CommandJournal;
use crate::types::{AdvanceStopReason, RunOutcome};

const REPLAY_BATCH: u32 = 256;

#[derive(Debug, PartialEq, Error)]
pub enum ReplayError {
    #[error("the run awaited input at rank {rank} but the journal has no more commands")]
    MissingInput { rank: i64 },
    #[error("journal command {seq} expected rank {expected} but the run is at {actual}")]
    RankMismatch { seq: u64, expected: i64, actual: i64 },
    #[error("event queue drained before the run ended")]
    QueueEmpty,
    #[error(transparent)]
    Engine(#[from] SimError),
}

#[derive(Debug, PartialEq, Eq)]
pub struct ReplayResult {
    pub final_outcome: RunOutcome,
    pub final_snapshot_hash: u64,
    pub final_rank: i64,
}

/// Replays `journal` on a fresh game until the run ends.
pub fn replay_to_end(journal: &CommandJournal) -> Result<ReplayResult, ReplayError> {
    let mut game = Game::new(journal.seed, journal.config.clone())?;
    let mut inputs = journal.inputs.iter();

    loop {
        let batch = game.advance(REPLAY_BATCH);
        match batch.stop_reason {
            AdvanceStopReason::Finished(outcome) => {
                return Ok(ReplayResult {
                    final_outcome: outcome,
                    final_snapshot_hash: game.snapshot_hash(),
                    final_rank: game.current_rank(),
                });
            }
            AdvanceStopReason::AwaitingInput => {
                let Some(record) = inputs.next() else {
                    return Err(ReplayError::MissingInput { rank: game.current_rank() });
                };
                if record.rank != game.current_rank() {
                    return Err(ReplayError::RankMismatch {
                        seq: record.seq,
                        expected: record.rank,
                        actual: game.current_rank(),
                    });
                }
                // Refusals are part of the recorded run and replay the same way.
                match game.submit(record.command) {
                    Ok(()) | Err(GameError::Action(_)) => {}
                    Err(GameError::Engine(failure)) => return Err(ReplayError::Engine(failure)),
                    Err(GameError::NotAwaitingInput | GameError::Finished) => {
                        return Err(ReplayError::MissingInput { rank: game.current_rank() });
                    }
                }
            }
            AdvanceStopReason::BudgetExhausted => {}
            AdvanceStopReason::QueueEmpty => return Err(ReplayError::QueueEmpty),
            AdvanceStopReason::EngineFailure(failure) => return Err(ReplayError::Engine(failure)),
        }
    }
}

#[cfg(test)]
mod tests;

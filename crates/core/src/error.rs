//! Error types for search contract violations, engine failures and rejected player actions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Pos;

/// A capability or caller broke the search contract. These indicate corrupted
/// world state and abort the current operation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("position {pos:?} is outside the {width}x{height} grid")]
    OutOfBounds { pos: Pos, width: i32, height: i32 },
    #[error("negative step cost {cost} from {from:?} to {to:?}")]
    NegativeCost { from: Pos, to: Pos, cost: i32 },
    #[error("search exceeded the iteration cap of {limit}")]
    IterationCap { limit: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimError {
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("monster index {0} does not exist")]
    UnknownMonster(usize),
    #[error("level layout is invalid: {0}")]
    InvalidLayout(String),
}

/// Ordinary gameplay refusals. They are logged and leave the player's turn pending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ActionError {
    #[error("that way is blocked")]
    Blocked,
    #[error("that direction is not a single step")]
    NotAStep,
    #[error("no known path leads there")]
    NoPath,
    #[error("nothing left to explore")]
    NothingToExplore,
    #[error("a monster is in view")]
    MonsterInView,
    #[error("target is outside the level")]
    OutOfBounds,
}

/// Misuse of the game API by its caller.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("the game is not waiting for a player command")]
    NotAwaitingInput,
    #[error("the run has already ended")]
    Finished,
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("engine failure: {0}")]
    Engine(#[from] SimError),
}

pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod journal;
pub mod journal_file;
pub mod mapgen;
pub mod replay;
pub mod schedule;
pub mod search;
pub mod snapshot;
pub mod state;
pub mod types;
pub mod vision;

pub use config::SimConfig;
pub use error::{ActionError, GameError, SearchError, SimError};
pub use game::Game;
pub use grid::GridSize;
pub use journal::{CommandJournal, CommandRecord};
pub use mapgen::{LevelSetup, generate_level};
pub use replay::*;
pub use snapshot::{GameSnapshot, SnapshotError, load_snapshot, save_snapshot};
pub use state::{Dungeon, GameState, Monster, Player};
pub use types::*;

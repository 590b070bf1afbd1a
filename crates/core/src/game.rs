//! Turn/actor simulation driven by the event scheduler.
//! This module exists to own the one live level and advance it event by event.
//! It does not own rendering, narrative text or input handling.

mod engine;
mod environment;
mod hash;
mod monsters;
mod pathers;
mod perception;
mod player;
mod restore;

#[cfg(test)]
mod test_support;

use std::collections::BTreeSet;

use log::info;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

use crate::config::SimConfig;
use crate::error::SimError;
use crate::grid::GridSize;
use crate::mapgen::{LevelSetup, generate_level, seed::mix_seed_stream};
use crate::schedule::{Event, EventKind, MonsterAction, Scheduler, SimpleAction};
use crate::search::Searcher;
use crate::state::{GameState, Monster, Player};
use crate::types::*;
use crate::vision::RayMap;

pub use pathers::SightView;

/// Keeps in-game rolls on a different stream from level generation.
const GAME_STREAM_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// What the player perceived at the start of the latest player turn.
#[derive(Clone, Debug)]
pub(crate) struct Perception {
    pub(crate) rays: RayMap,
    pub(crate) visible_monsters: BTreeSet<MonsterIdx>,
    pub(crate) heard: BTreeSet<Pos>,
    pub(crate) watched: BTreeSet<Pos>,
}

pub struct Game {
    seed: u64,
    config: SimConfig,
    state: GameState,
    scheduler: Scheduler,
    searcher: Searcher,
    log: Vec<LogEvent>,
    rng_draws: u64,
    current_rank: i64,
    /// The player turn held while waiting for a command.
    awaiting: Option<Event>,
    auto: Option<AutoMode>,
    interrupt_requested: bool,
    outcome: Option<RunOutcome>,
    failure: Option<SimError>,
    perception: Perception,
}

impl Game {
    /// Starts a run on a freshly generated level.
    pub fn new(seed: u64, config: SimConfig) -> Result<Self, SimError> {
        let size = GridSize::new(config.level.width, config.level.height);
        let mut searcher = Searcher::new(size).with_iteration_cap(config.search.iteration_cap);
        let setup = generate_level(seed, &config.level, &mut searcher)?;
        Self::from_level(seed, config, setup)
    }

    /// Starts a run on a caller-supplied level.
    pub fn from_level(seed: u64, config: SimConfig, setup: LevelSetup) -> Result<Self, SimError> {
        let LevelSetup { dungeon, player, monsters } = setup;
        let size = dungeon.size();
        if !dungeon.is_passable(player) {
            return Err(SimError::InvalidLayout(format!("player start {player:?} is blocked")));
        }
        if let Some((kind, pos)) =
            monsters.iter().find(|(_, pos)| !dungeon.is_passable(*pos) || *pos == player)
        {
            return Err(SimError::InvalidLayout(format!("{kind:?} cannot start at {pos:?}")));
        }

        let mut scheduler = Scheduler::new();
        scheduler.push(Event::new(0, EventKind::Simple(SimpleAction::PlayerTurn)));
        for (index, (kind, _)) in monsters.iter().enumerate() {
            scheduler.push(Event::new(
                i64::from(kind.delay()),
                EventKind::Monster { index: MonsterIdx(index), action: MonsterAction::Turn },
            ));
        }

        let state = GameState {
            dungeon,
            player: Player {
                pos: player,
                hp: config.combat.player_hp,
                max_hp: config.combat.player_hp,
                statuses: Default::default(),
            },
            monsters: monsters.into_iter().map(|(kind, pos)| Monster::new(kind, pos)).collect(),
            clouds: Default::default(),
            cloud_expiry: Default::default(),
            temporary_walls: Default::default(),
            excluded: Default::default(),
        };

        info!("run started seed={seed} monsters={}", state.monsters.len());
        Ok(Self {
            seed,
            searcher: Searcher::new(size).with_iteration_cap(config.search.iteration_cap),
            config,
            state,
            scheduler,
            log: Vec::new(),
            rng_draws: 0,
            current_rank: 0,
            awaiting: None,
            auto: None,
            interrupt_requested: false,
            outcome: None,
            failure: None,
            perception: Perception {
                rays: RayMap::empty(size, player),
                visible_monsters: BTreeSet::new(),
                heard: BTreeSet::new(),
                watched: BTreeSet::new(),
            },
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    pub fn current_rank(&self) -> i64 {
        self.current_rank
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    pub fn is_awaiting_input(&self) -> bool {
        self.awaiting.is_some()
    }

    pub fn auto_mode(&self) -> Option<AutoMode> {
        self.auto
    }

    pub fn pending_events(&self) -> usize {
        self.scheduler.len() + usize::from(self.awaiting.is_some())
    }

    /// Player ray map from the start of the latest player turn.
    pub fn player_rays(&self) -> &RayMap {
        &self.perception.rays
    }

    pub fn visible_monsters(&self) -> &BTreeSet<MonsterIdx> {
        &self.perception.visible_monsters
    }

    /// Positions of unseen monsters the player heard moving.
    pub fn heard_noises(&self) -> &BTreeSet<Pos> {
        &self.perception.heard
    }

    /// Cells watched by monsters the player can see.
    pub fn watched_cells(&self) -> &BTreeSet<Pos> {
        &self.perception.watched
    }

    /// Stops the active auto mode before its next step.
    pub fn request_interrupt(&mut self) {
        self.interrupt_requested = true;
    }

    fn roll(&mut self, bound: u32) -> u32 {
        if bound <= 1 {
            return 0;
        }
        self.rng_draws += 1;
        let mut rng =
            ChaCha8Rng::seed_from_u64(mix_seed_stream(self.seed ^ GAME_STREAM_SALT, self.rng_draws));
        (rng.next_u64() % u64::from(bound)) as u32
    }

    fn push_log(&mut self, event: LogEvent) {
        self.log.push(event);
    }

    fn finish(&mut self, outcome: RunOutcome) {
        if self.outcome.is_none() {
            info!("run ended with {outcome:?} at rank {}", self.current_rank);
            self.outcome = Some(outcome);
            self.awaiting = None;
            self.auto = None;
            self.push_log(LogEvent::RunEnded { outcome });
        }
    }

    fn schedule_at(&mut self, delay: u32, kind: EventKind) {
        self.scheduler.push(Event::new(self.current_rank + i64::from(delay), kind));
    }
}

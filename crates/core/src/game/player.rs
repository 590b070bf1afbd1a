//! Player turns: parking for input, command handling and auto modes.

use log::{debug, error};

use super::pathers::{ExplorePather, TravelPather};
use super::*;
use crate::error::{ActionError, GameError, SearchError};
use crate::search::Path;

/// Why a player action did not happen.
#[derive(Debug)]
enum TurnError {
    Action(ActionError),
    Engine(SimError),
}

impl From<ActionError> for TurnError {
    fn from(error: ActionError) -> Self {
        Self::Action(error)
    }
}

impl From<SimError> for TurnError {
    fn from(error: SimError) -> Self {
        Self::Engine(error)
    }
}

impl From<SearchError> for TurnError {
    fn from(error: SearchError) -> Self {
        Self::Engine(error.into())
    }
}

impl Game {
    /// Runs the player-turn prelude, then either parks the turn for a command or
    /// takes one step of the active auto mode.
    pub(super) fn player_turn(&mut self, event: Event) -> Result<(), SimError> {
        let newly_visible = self.refresh_perception()?;
        let Some(mode) = self.auto else {
            self.interrupt_requested = false;
            self.awaiting = Some(event);
            return Ok(());
        };

        // A rest wait heals once its delay has run out.
        if let AutoMode::Rest { remaining } = mode
            && remaining < self.config.explore.rest_turns
        {
            let player = &mut self.state.player;
            player.hp = (player.hp + 1).min(player.max_hp);
        }

        let resting_in_view =
            matches!(mode, AutoMode::Rest { .. }) && !self.perception.visible_monsters.is_empty();
        if self.interrupt_requested || !newly_visible.is_empty() || resting_in_view {
            self.interrupt_requested = false;
            self.auto = None;
            let monster = newly_visible
                .first()
                .or_else(|| self.perception.visible_monsters.first())
                .copied();
            debug!("auto mode {mode:?} interrupted at rank {}", self.current_rank);
            self.push_log(LogEvent::AutoInterrupted { monster });
            self.awaiting = Some(event);
            return Ok(());
        }

        match self.auto_step(mode) {
            Ok(Some(delay)) => self.scheduler.reschedule(event, delay),
            Ok(None) => {
                self.auto = None;
                self.push_log(LogEvent::AutoFinished);
                self.awaiting = Some(event);
            }
            Err(TurnError::Action(error)) => {
                self.auto = None;
                self.push_log(LogEvent::ActionFailed { error });
                self.awaiting = Some(event);
            }
            Err(TurnError::Engine(error)) => return Err(error),
        }
        Ok(())
    }

    /// Applies a command to the parked player turn.
    ///
    /// Refused actions are logged and leave the turn parked with no time spent.
    pub fn submit(&mut self, command: Command) -> Result<(), GameError> {
        if self.outcome.is_some() {
            return Err(GameError::Finished);
        }
        let Some(event) = self.awaiting else {
            return Err(GameError::NotAwaitingInput);
        };

        match self.perform(command, event) {
            Ok(()) => Ok(()),
            Err(TurnError::Action(error)) => {
                debug!("command {command:?} refused: {error}");
                self.push_log(LogEvent::ActionFailed { error });
                Err(error.into())
            }
            Err(TurnError::Engine(failure)) => {
                error!("command {command:?} failed at rank {}: {failure}", self.current_rank);
                self.awaiting = None;
                self.failure = Some(failure.clone());
                Err(failure.into())
            }
        }
    }

    fn perform(&mut self, command: Command, event: Event) -> Result<(), TurnError> {
        let delay = match command {
            Command::Move(dir) => {
                let (dx, dy) = dir.step().ok_or(ActionError::NotAStep)?;
                let to = self.state.player.pos.offset(dx, dy);
                self.move_player(to)?
            }
            Command::Wait => {
                self.push_log(LogEvent::PlayerWaited);
                self.player_delay()
            }
            Command::Rest => {
                self.ensure_no_monster_in_view()?;
                let remaining = self.config.explore.rest_turns;
                self.start_auto(AutoMode::Rest { remaining }, event);
                return Ok(());
            }
            Command::Explore => {
                self.ensure_no_monster_in_view()?;
                self.explore_step()?;
                self.start_auto(AutoMode::Explore, event);
                return Ok(());
            }
            Command::TravelTo(target) => {
                if !self.state.dungeon.in_bounds(target) {
                    return Err(ActionError::OutOfBounds.into());
                }
                self.ensure_no_monster_in_view()?;
                self.travel_path(target)?.ok_or(ActionError::NoPath)?;
                self.start_auto(AutoMode::Travel { target }, event);
                return Ok(());
            }
            Command::Quit => {
                self.finish(RunOutcome::Quit);
                return Ok(());
            }
        };
        self.awaiting = None;
        self.scheduler.reschedule(event, delay);
        Ok(())
    }

    fn start_auto(&mut self, mode: AutoMode, event: Event) {
        self.auto = Some(mode);
        self.interrupt_requested = false;
        self.awaiting = None;
        self.push_log(LogEvent::AutoStarted { mode });
        self.scheduler.push_again(event);
    }

    fn ensure_no_monster_in_view(&self) -> Result<(), ActionError> {
        let in_view = self
            .perception
            .visible_monsters
            .iter()
            .any(|&index| self.state.monster(index).is_some_and(|monster| monster.alive));
        if in_view { Err(ActionError::MonsterInView) } else { Ok(()) }
    }

    /// One synthetic step. `Ok(None)` means the mode is complete.
    fn auto_step(&mut self, mode: AutoMode) -> Result<Option<u32>, TurnError> {
        match mode {
            AutoMode::Explore => {
                let next = self.explore_step()?;
                self.move_player(next).map(Some)
            }
            AutoMode::Travel { target } => {
                if self.state.player.pos == target {
                    return Ok(None);
                }
                let path = self.travel_path(target)?.ok_or(ActionError::NoPath)?;
                let next = path.first_step().ok_or(ActionError::NoPath)?;
                self.move_player(next).map(Some)
            }
            AutoMode::Rest { remaining } => {
                if remaining == 0 {
                    return Ok(None);
                }
                self.auto = Some(AutoMode::Rest { remaining: remaining - 1 });
                self.push_log(LogEvent::PlayerWaited);
                Ok(Some(self.player_delay()))
            }
        }
    }

    /// The neighbour to step to while exploring: the cheapest one on the
    /// frontier flood, strictly cheaper than the player's own cell.
    fn explore_step(&mut self) -> Result<Pos, TurnError> {
        let pather = ExplorePather { state: &self.state };
        let frontier = pather.frontier();
        if frontier.is_empty() {
            return Err(ActionError::NothingToExplore.into());
        }
        let ceiling = i32::try_from(self.state.dungeon.size().len()).unwrap_or(i32::MAX);
        let map = self.searcher.dijkstra_map(&pather, &frontier, ceiling)?;

        let here = self.state.player.pos;
        let own = map.get(here).ok_or(ActionError::NothingToExplore)?;
        here.neighbors_8()
            .into_iter()
            .filter(|&next| self.state.dungeon.is_passable(next))
            .filter_map(|next| map.get(next).map(|cost| (cost, next)))
            .filter(|&(cost, _)| cost < own)
            .min()
            .map(|(_, next)| next)
            .ok_or_else(|| ActionError::NothingToExplore.into())
    }

    fn travel_path(&mut self, target: Pos) -> Result<Option<Path>, SearchError> {
        let from = self.state.player.pos;
        self.searcher.astar(&TravelPather { state: &self.state }, from, target)
    }

    pub(super) fn player_delay(&self) -> u32 {
        let player = &self.state.player;
        let base = self.config.timing.normal_delay;
        if player.has(PlayerStatus::Slow) {
            base * 2
        } else if player.has(PlayerStatus::Swift) {
            (base / 2).max(1)
        } else {
            base
        }
    }

    /// Steps onto `to`, or attacks the monster standing there.
    fn move_player(&mut self, to: Pos) -> Result<u32, TurnError> {
        if let Some(index) = self.state.monster_at(to) {
            self.player_attack(index)?;
            return Ok(self.player_delay());
        }
        if !self.state.dungeon.is_passable(to) {
            return Err(ActionError::Blocked.into());
        }
        self.state.player.pos = to;
        self.push_log(LogEvent::PlayerMoved { to });
        if self.state.dungeon.terrain_at(to) == Terrain::Door {
            self.push_log(LogEvent::DoorNoise { pos: to });
            self.make_noise(to, self.config.noise.door_noise)?;
        }
        Ok(self.player_delay())
    }

    fn player_attack(&mut self, index: MonsterIdx) -> Result<(), SimError> {
        let damage = self.config.combat.player_damage;
        let player = self.state.player.pos;
        let monster = self.state.monster_mut(index).ok_or(SimError::UnknownMonster(index.0))?;
        monster.hp -= damage;
        monster.state = MonsterState::Hunting;
        monster.target = Some(player);
        let (pos, killed) = (monster.pos, monster.hp <= 0);
        if killed {
            monster.alive = false;
        }

        self.push_log(LogEvent::PlayerAttacked { monster: index, damage });
        if killed {
            debug!("monster {} killed at {pos:?}", index.0);
            self.push_log(LogEvent::MonsterKilled { monster: index });
        }
        self.make_noise(pos, self.config.noise.combat_noise)?;
        Ok(())
    }
}

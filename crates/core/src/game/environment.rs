//! Content-layer mutators and the timed environment events they schedule:
//! clouds, fire, temporary walls, statuses, noise and magic mapping.

use std::iter;

use log::{debug, warn};

use super::pathers::{CloudPather, HearingPather, RevealPather};
use super::*;
use crate::error::ActionError;
use crate::schedule::CloudAction;

impl Game {
    /// Covers the walkable cells within `radius` cardinal steps of `center` with fog.
    /// Returns the newly covered cells.
    pub fn spawn_fog(&mut self, center: Pos, radius: i32) -> Result<Vec<Pos>, SimError> {
        let duration = self.config.timing.fog_duration;
        self.spawn_cloud(center, radius, CloudKind::Fog, CloudAction::FogDissipate, duration)
    }

    pub fn spawn_night(&mut self, center: Pos, radius: i32) -> Result<Vec<Pos>, SimError> {
        let duration = self.config.timing.night_duration;
        self.spawn_cloud(center, radius, CloudKind::Night, CloudAction::NightDissipate, duration)
    }

    // Re-covering a cell with the same cloud does not extend it.
    fn spawn_cloud(
        &mut self,
        center: Pos,
        radius: i32,
        kind: CloudKind,
        action: CloudAction,
        duration: u32,
    ) -> Result<Vec<Pos>, SimError> {
        let area = self.searcher.dijkstra_map(
            &CloudPather { state: &self.state },
            &[center],
            radius.max(0).saturating_add(1),
        )?;
        let mut covered = Vec::new();
        for (pos, _) in area.iter() {
            match self.state.clouds.get(&pos) {
                Some(&CloudKind::Fire) => continue,
                Some(&existing) if existing == kind => continue,
                _ => {}
            }
            self.cover(pos, kind, action, duration);
            covered.push(pos);
        }
        debug!("{kind:?} cloud at {center:?} covered {} cells", covered.len());
        Ok(covered)
    }

    fn cover(&mut self, pos: Pos, kind: CloudKind, action: CloudAction, duration: u32) {
        self.state.clouds.insert(pos, kind);
        self.state.cloud_expiry.insert(pos, self.current_rank + i64::from(duration));
        self.schedule_at(duration, EventKind::Cloud { pos, action });
    }

    /// Sets a flammable cell on fire.
    pub fn ignite(&mut self, pos: Pos) -> Result<(), ActionError> {
        if !self.state.dungeon.in_bounds(pos) {
            return Err(ActionError::OutOfBounds);
        }
        if !self.state.dungeon.terrain_at(pos).is_flammable() {
            return Err(ActionError::Blocked);
        }
        self.start_fire(pos);
        Ok(())
    }

    fn start_fire(&mut self, pos: Pos) -> bool {
        if self.state.clouds.get(&pos) == Some(&CloudKind::Fire) {
            return false;
        }
        self.state.clouds.insert(pos, CloudKind::Fire);
        self.state.cloud_expiry.remove(&pos);
        self.schedule_at(
            self.config.timing.fire_delay,
            EventKind::Cloud { pos, action: CloudAction::FireBurn },
        );
        true
    }

    /// Walls off a free walkable cell until `duration` ranks have passed.
    pub fn raise_temporary_wall(&mut self, pos: Pos, duration: u32) -> Result<(), ActionError> {
        if !self.state.dungeon.in_bounds(pos) {
            return Err(ActionError::OutOfBounds);
        }
        let terrain = self.state.dungeon.terrain_at(pos);
        if !terrain.is_passable()
            || self.state.is_occupied(pos)
            || self.state.temporary_walls.contains_key(&pos)
        {
            return Err(ActionError::Blocked);
        }
        self.state.temporary_walls.insert(pos, terrain);
        self.state.dungeon.set_terrain(pos, Terrain::Wall);
        self.push_log(LogEvent::TemporaryWallRaised { pos });
        self.schedule_at(duration, EventKind::Cloud { pos, action: CloudAction::TemporaryWallExpire });
        Ok(())
    }

    pub fn set_light(&mut self, pos: Pos, lit: bool) {
        self.state.dungeon.set_lit(pos, lit);
    }

    /// Adds or removes `pos` from the cells travel routes avoid.
    pub fn set_excluded(&mut self, pos: Pos, excluded: bool) {
        if excluded {
            self.state.excluded.insert(pos);
        } else {
            self.state.excluded.remove(&pos);
        }
    }

    /// Starts or refreshes a player status. Only the first application schedules a tick.
    pub fn apply_player_status(&mut self, status: PlayerStatus, duration: u32) {
        if duration == 0 {
            return;
        }
        if self.state.player.statuses.insert(status, duration).is_none() {
            self.push_log(LogEvent::PlayerStatusStarted { status });
            self.schedule_at(
                self.config.timing.normal_delay,
                EventKind::Simple(SimpleAction::PlayerStatusTick(status)),
            );
        }
    }

    pub fn apply_monster_status(
        &mut self,
        index: MonsterIdx,
        status: MonsterStatus,
        duration: u32,
    ) -> Result<(), SimError> {
        let monster = self.state.monster_mut(index).ok_or(SimError::UnknownMonster(index.0))?;
        if duration == 0 || !monster.alive {
            return Ok(());
        }
        if monster.statuses.insert(status, duration).is_none() {
            self.push_log(LogEvent::MonsterStatusStarted { monster: index, status });
            self.schedule_at(
                self.config.timing.normal_delay,
                EventKind::Monster { index, action: MonsterAction::StatusTick(status) },
            );
        }
        Ok(())
    }

    pub(super) fn player_status_tick(&mut self, event: Event, status: PlayerStatus) {
        let statuses = &mut self.state.player.statuses;
        let Some(remaining) = statuses.get_mut(&status) else {
            return;
        };
        *remaining = remaining.saturating_sub(1);
        if *remaining > 0 {
            self.scheduler.reschedule(event, self.config.timing.normal_delay);
        } else {
            statuses.remove(&status);
            self.push_log(LogEvent::PlayerStatusEnded { status });
        }
    }

    pub(super) fn monster_status_tick(
        &mut self,
        event: Event,
        index: MonsterIdx,
        status: MonsterStatus,
    ) -> Result<(), SimError> {
        let monster = self.state.monster_mut(index).ok_or(SimError::UnknownMonster(index.0))?;
        if !monster.alive {
            return Ok(());
        }
        let Some(remaining) = monster.statuses.get_mut(&status) else {
            return Ok(());
        };
        *remaining = remaining.saturating_sub(1);
        if *remaining > 0 {
            self.scheduler.reschedule(event, self.config.timing.normal_delay);
        } else {
            monster.statuses.remove(&status);
            self.push_log(LogEvent::MonsterStatusEnded { monster: index, status });
        }
        Ok(())
    }

    pub(super) fn cloud_event(&mut self, event: Event, pos: Pos, action: CloudAction) {
        match action {
            CloudAction::FogDissipate => self.dissipate(event, pos, CloudKind::Fog),
            CloudAction::NightDissipate => self.dissipate(event, pos, CloudKind::Night),
            CloudAction::FireBurn => self.burn(pos),
            CloudAction::TemporaryWallExpire => self.expire_wall(pos),
        }
    }

    /// Clears the cloud only if this timer belongs to it. Timers of replaced
    /// clouds retire silently.
    fn dissipate(&mut self, event: Event, pos: Pos, kind: CloudKind) {
        if self.state.clouds.get(&pos) != Some(&kind)
            || self.state.cloud_expiry.get(&pos) != Some(&event.rank)
        {
            return;
        }
        self.state.clouds.remove(&pos);
        self.state.cloud_expiry.remove(&pos);
        self.push_log(LogEvent::CloudDissipated { pos, kind });
    }

    /// Burns the cell down to smoking ground and spreads to flammable cardinal neighbours.
    fn burn(&mut self, pos: Pos) {
        if self.state.clouds.get(&pos) != Some(&CloudKind::Fire) {
            return;
        }
        self.state.dungeon.set_terrain(pos, Terrain::Ground);
        self.push_log(LogEvent::BurntOut { pos });
        let smoke = self.config.timing.smoke_duration;
        self.cover(pos, CloudKind::Fog, CloudAction::FogDissipate, smoke);

        for next in pos.neighbors_4() {
            if self.state.dungeon.terrain_at(next).is_flammable() && self.start_fire(next) {
                self.push_log(LogEvent::FireSpread { pos: next });
            }
        }
    }

    fn expire_wall(&mut self, pos: Pos) {
        let Some(original) = self.state.temporary_walls.remove(&pos) else {
            return;
        };
        if self.state.dungeon.terrain_at(pos) == Terrain::Wall {
            self.state.dungeon.set_terrain(pos, original);
        } else {
            warn!("temporary wall at {pos:?} was already gone");
        }
        self.push_log(LogEvent::TemporaryWallExpired { pos });
    }

    /// Alerts every monster within earshot that is not already hunting. They set
    /// off to investigate `origin`. Returns the monsters that heard it.
    pub fn make_noise(&mut self, origin: Pos, loudness: i32) -> Result<Vec<MonsterIdx>, SimError> {
        let area =
            self.searcher.dijkstra_map(&HearingPather { state: &self.state }, &[origin], loudness)?;
        let listeners: Vec<MonsterIdx> = self
            .state
            .living_monsters()
            .filter(|(_, monster)| {
                monster.state != MonsterState::Hunting && area.contains(monster.pos)
            })
            .map(|(index, _)| index)
            .collect();

        for &index in &listeners {
            if let Some(monster) = self.state.monster_mut(index) {
                monster.state = MonsterState::Wandering;
                monster.target = Some(origin);
            }
            self.push_log(LogEvent::MonsterHeardNoise { monster: index, origin });
        }
        Ok(listeners)
    }

    /// Marks every cell reachable from the player explored, along with the walls around them.
    /// Returns the newly explored cells in the order they were revealed.
    pub fn magic_map(&mut self) -> Result<Vec<Pos>, SimError> {
        let player = self.state.player.pos;
        let reach = self.searcher.bfs_map(&RevealPather { state: &self.state }, &[player])?;
        let dungeon = &mut self.state.dungeon;
        let mut revealed = Vec::new();
        for &pos in reach.order() {
            for cell in iter::once(pos).chain(pos.neighbors_8()) {
                if dungeon.in_bounds(cell) && !dungeon.is_explored(cell) {
                    dungeon.set_explored(cell);
                    revealed.push(cell);
                }
            }
        }
        self.push_log(LogEvent::MapRevealed { cells: revealed.len() });
        Ok(revealed)
    }
}

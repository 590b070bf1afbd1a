//! Monster turns: noticing the player, attacking, pursuit, wandering and digging.

use log::debug;

use super::pathers::PursuitPather;
use super::*;

/// One in this many resting turns ends the rest.
const WAKE_CHANCE: u32 = 20;
const WANDER_ATTEMPTS: u32 = 16;

impl Game {
    pub(super) fn monster_turn(&mut self, event: Event, index: MonsterIdx) -> Result<(), SimError> {
        let monster = self.state.monster(index).ok_or(SimError::UnknownMonster(index.0))?;
        if !monster.alive {
            return Ok(());
        }
        if monster.has(MonsterStatus::Paralysed) {
            let delay = monster.delay();
            self.scheduler.reschedule(event, delay);
            return Ok(());
        }

        let sees_player = self.monster_sees_player(monster);
        if sees_player {
            let player = self.state.player.pos;
            let monster = self.monster_entry(index)?;
            let noticed = monster.state != MonsterState::Hunting;
            monster.state = MonsterState::Hunting;
            monster.target = Some(player);
            if let Some(dir) = player.dir_from(monster.pos) {
                monster.dir = dir;
            }
            if noticed {
                debug!("monster {} noticed the player at {player:?}", index.0);
                self.push_log(LogEvent::MonsterNoticed { monster: index });
            }
        }

        let moved = self.monster_act(index, sees_player)?;
        if self.outcome.is_some() {
            return Ok(());
        }
        let monster = self.monster_entry(index)?;
        monster.moved_last_turn = moved;
        let delay = monster.delay();
        self.scheduler.reschedule(event, delay);
        Ok(())
    }

    fn monster_entry(&mut self, index: MonsterIdx) -> Result<&mut Monster, SimError> {
        self.state.monster_mut(index).ok_or(SimError::UnknownMonster(index.0))
    }

    /// Performs the monster's action. Returns whether it changed cell.
    fn monster_act(&mut self, index: MonsterIdx, sees_player: bool) -> Result<bool, SimError> {
        let monster = self.monster_entry(index)?;
        let (pos, state, target) = (monster.pos, monster.state, monster.target);
        if monster.has(MonsterStatus::Confused) {
            return self.stumble(index);
        }

        let player = self.state.player.pos;
        if sees_player && pos.distance(player) == 1 {
            self.monster_attack(index)?;
            return Ok(false);
        }

        match state {
            MonsterState::Resting => {
                if self.roll(WAKE_CHANCE) == 0 {
                    self.monster_entry(index)?.state = MonsterState::Wandering;
                }
                Ok(false)
            }
            MonsterState::Wandering | MonsterState::Hunting => {
                let goal = match target {
                    Some(goal) if goal != pos => goal,
                    _ => {
                        let Some(goal) = self.wander_target() else {
                            return Ok(false);
                        };
                        let monster = self.monster_entry(index)?;
                        monster.state = MonsterState::Wandering;
                        monster.target = Some(goal);
                        goal
                    }
                };
                self.step_monster(index, goal)
            }
        }
    }

    fn wander_target(&mut self) -> Option<Pos> {
        let size = self.state.dungeon.size();
        let cells = u32::try_from(size.len()).ok()?;
        (0..WANDER_ATTEMPTS).find_map(|_| {
            let pos = size.pos_at(self.roll(cells) as usize);
            self.state.dungeon.is_passable(pos).then_some(pos)
        })
    }

    fn step_monster(&mut self, index: MonsterIdx, goal: Pos) -> Result<bool, SimError> {
        let monster = self.monster_entry(index)?;
        let (from, tunnels) = (monster.pos, monster.kind.tunnels());
        let path =
            self.searcher.astar(&PursuitPather { state: &self.state, tunnels }, from, goal)?;
        let Some(next) = path.and_then(|path| path.first_step()) else {
            self.monster_entry(index)?.target = None;
            return Ok(false);
        };
        if next == self.state.player.pos || self.state.monster_at(next).is_some() {
            return Ok(false);
        }

        let dir = Dir::of_step(from, next);
        if self.state.dungeon.terrain_at(next).is_wall_like() {
            self.state.dungeon.set_terrain(next, Terrain::Ground);
            debug!("monster {} dug through {next:?}", index.0);
            self.push_log(LogEvent::WallDug { monster: index, pos: next });
            if let Some(dir) = dir {
                self.monster_entry(index)?.dir = dir;
            }
            return Ok(false);
        }

        let monster = self.monster_entry(index)?;
        if let Some(dir) = dir {
            monster.dir = dir;
        }
        monster.pos = next;
        Ok(true)
    }

    /// Confused monsters lurch to a random free neighbour.
    fn stumble(&mut self, index: MonsterIdx) -> Result<bool, SimError> {
        let from = self.monster_entry(index)?.pos;
        let free: Vec<Pos> = from
            .neighbors_8()
            .into_iter()
            .filter(|&next| self.state.dungeon.is_passable(next) && !self.state.is_occupied(next))
            .collect();
        if free.is_empty() {
            return Ok(false);
        }
        let next = free[self.roll(free.len() as u32) as usize];
        let monster = self.monster_entry(index)?;
        if let Some(dir) = Dir::of_step(from, next) {
            monster.dir = dir;
        }
        monster.pos = next;
        Ok(true)
    }

    fn monster_attack(&mut self, index: MonsterIdx) -> Result<(), SimError> {
        let damage = self.monster_entry(index)?.kind.damage();
        let player = &mut self.state.player;
        player.hp -= damage;
        let (pos, hp_left) = (player.pos, player.hp);
        self.push_log(LogEvent::PlayerHit { monster: index, damage, hp_left });
        self.make_noise(pos, self.config.noise.combat_noise)?;
        if hp_left <= 0 {
            self.finish(RunOutcome::Death);
        }
        Ok(())
    }
}

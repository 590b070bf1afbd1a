//! Conversion between a live game and its saved image.

use super::*;
use crate::snapshot::GameSnapshot;

impl Game {
    pub fn to_snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            seed: self.seed,
            config: self.config.clone(),
            state: self.state.clone(),
            scheduler: self.scheduler.clone(),
            log: self.log.clone(),
            rng_draws: self.rng_draws,
            current_rank: self.current_rank,
            awaiting: self.awaiting,
            auto: self.auto,
            outcome: self.outcome,
            visible_monsters: self.perception.visible_monsters.clone(),
            heard: self.perception.heard.clone(),
            watched: self.perception.watched.clone(),
        }
    }

    /// Resumes a saved run. The node arena and the player's ray map are rebuilt
    /// from the restored state.
    pub fn from_snapshot(snapshot: GameSnapshot) -> Result<Self, SimError> {
        let size = snapshot.state.dungeon.size();
        if !size.contains(snapshot.state.player.pos) {
            return Err(SimError::InvalidLayout("saved player position is off the map".into()));
        }
        if let Some(monster) =
            snapshot.state.monsters.iter().find(|monster| !size.contains(monster.pos))
        {
            return Err(SimError::InvalidLayout(format!(
                "saved {:?} at {:?} is off the map",
                monster.kind, monster.pos
            )));
        }

        let mut game = Self {
            seed: snapshot.seed,
            searcher: Searcher::new(size).with_iteration_cap(snapshot.config.search.iteration_cap),
            config: snapshot.config,
            perception: Perception {
                rays: RayMap::empty(size, snapshot.state.player.pos),
                visible_monsters: snapshot.visible_monsters,
                heard: snapshot.heard,
                watched: snapshot.watched,
            },
            state: snapshot.state,
            scheduler: snapshot.scheduler,
            log: snapshot.log,
            rng_draws: snapshot.rng_draws,
            current_rank: snapshot.current_rank,
            awaiting: snapshot.awaiting,
            auto: snapshot.auto,
            interrupt_requested: false,
            outcome: snapshot.outcome,
            failure: None,
        };
        game.perception.rays = game.build_player_rays();
        Ok(game)
    }
}

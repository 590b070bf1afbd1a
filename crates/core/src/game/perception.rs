//! Player and monster perception: ray maps, hearing, view cones and hiding.

use log::debug;

use super::pathers::HearingPather;
use super::*;
use crate::vision::{RayStyle, build_rays};

/// Half-width of a monster's view cone, in sixteenth-turn sectors.
const VIEW_CONE_SECTORS: u8 = 2;

impl Game {
    pub(super) fn monster_rays(&self, monster: &Monster) -> RayMap {
        build_rays(
            &SightView { state: &self.state },
            monster.pos,
            RayStyle::Monster,
            &self.config.vision,
        )
    }

    pub(super) fn player_is_lit(&self) -> bool {
        let player = &self.state.player;
        self.state.is_lit(player.pos) || player.has(PlayerStatus::Lit)
    }

    fn in_view_cone(monster: &Monster, target: Pos) -> bool {
        if monster.pos.distance(target) <= 1 {
            return true;
        }
        target
            .dir_from(monster.pos)
            .is_some_and(|dir| dir.sector_gap(monster.dir) <= VIEW_CONE_SECTORS)
    }

    /// Whether `monster` notices something standing at `target`.
    pub(super) fn monster_sees(
        &self,
        monster: &Monster,
        rays: &RayMap,
        target: Pos,
        target_lit: bool,
    ) -> bool {
        if !rays.in_view(target) || !Self::in_view_cone(monster, target) {
            return false;
        }
        let distance = monster.pos.distance(target);
        if !target_lit && distance > self.config.vision.monster_darkness_range {
            return false;
        }
        let dungeon = &self.state.dungeon;
        if let Some(parent) = rays.parent(target)
            && parent != monster.pos
            && dungeon.terrain_at(parent) == Terrain::Barrel
        {
            return false;
        }
        !(dungeon.terrain_at(target) == Terrain::Barrel && distance > 1)
    }

    pub(super) fn monster_sees_player(&self, monster: &Monster) -> bool {
        let rays = self.monster_rays(monster);
        self.monster_sees(monster, &rays, self.state.player.pos, self.player_is_lit())
    }

    pub(super) fn player_ray_style(&self) -> RayStyle {
        if self.state.dungeon.terrain_at(self.state.player.pos) == Terrain::Tree {
            RayStyle::Tree
        } else {
            RayStyle::Player
        }
    }

    pub(super) fn build_player_rays(&self) -> RayMap {
        build_rays(
            &SightView { state: &self.state },
            self.state.player.pos,
            self.player_ray_style(),
            &self.config.vision,
        )
    }

    /// Recomputes everything the player perceives and marks seen cells explored.
    /// Returns the monsters that were not visible at the previous refresh.
    pub(super) fn refresh_perception(&mut self) -> Result<Vec<MonsterIdx>, SimError> {
        let player = self.state.player.pos;
        let hearing = self.searcher.dijkstra_map(
            &HearingPather { state: &self.state },
            &[player],
            self.config.noise.hearing_radius,
        )?;

        let rays = self.build_player_rays();
        for pos in rays.visible_positions() {
            self.state.dungeon.set_explored(pos);
        }

        let visible: BTreeSet<MonsterIdx> = self
            .state
            .living_monsters()
            .filter(|(_, monster)| rays.in_view(monster.pos))
            .map(|(index, _)| index)
            .collect();
        let newly: Vec<MonsterIdx> =
            visible.difference(&self.perception.visible_monsters).copied().collect();

        let heard: BTreeSet<Pos> = self
            .state
            .living_monsters()
            .filter(|(index, monster)| {
                monster.moved_last_turn && !visible.contains(index) && hearing.contains(monster.pos)
            })
            .map(|(_, monster)| monster.pos)
            .collect();

        let mut watched = BTreeSet::new();
        for &index in &visible {
            let Some(monster) = self.state.monster(index) else {
                continue;
            };
            let sight = self.monster_rays(monster);
            watched.extend(
                sight.visible_positions().filter(|&pos| Self::in_view_cone(monster, pos)),
            );
        }

        if !newly.is_empty() {
            debug!("monsters came into view: {newly:?}");
        }
        self.perception = Perception { rays, visible_monsters: visible, heard, watched };
        Ok(newly)
    }
}

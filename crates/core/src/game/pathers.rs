//! Search and sight capabilities over the live game state.
//! This module exists so each movement or perception policy is one small read-only type.
//! It does not own any search algorithm; those live in `crate::search` and `crate::vision`.

use crate::grid::GridSize;
use crate::search::{AstarPather, Pather};
use crate::state::GameState;
use crate::types::{Pos, Terrain};
use crate::vision::{Sightlines, Transparency};

/// Sight over terrain, clouds and occupied doors.
pub struct SightView<'a> {
    pub state: &'a GameState,
}

impl Sightlines for SightView<'_> {
    fn size(&self) -> GridSize {
        self.state.dungeon.size()
    }

    fn transparency(&self, pos: Pos) -> Transparency {
        if self.state.blocks_sight_cloud(pos) {
            return Transparency::Opaque;
        }
        match self.state.dungeon.terrain_at(pos) {
            Terrain::Wall => Transparency::Opaque,
            Terrain::Door if self.state.is_occupied(pos) => Transparency::Clear,
            Terrain::Door => Transparency::Opaque,
            Terrain::Foliage | Terrain::HoledWall | Terrain::Tree => Transparency::Foliage,
            Terrain::Ground | Terrain::Barrel => Transparency::Clear,
        }
    }

    fn is_lit(&self, pos: Pos) -> bool {
        self.state.is_lit(pos)
    }
}

/// Sound spread: walkable cells, doors muffle.
pub(super) struct HearingPather<'a> {
    pub(super) state: &'a GameState,
}

impl Pather for HearingPather<'_> {
    fn neighbors(&self, pos: Pos, out: &mut Vec<Pos>) {
        let dungeon = &self.state.dungeon;
        out.extend(pos.neighbors_8().into_iter().filter(|&next| dungeon.is_passable(next)));
    }

    fn cost(&self, _from: Pos, to: Pos) -> i32 {
        if self.state.dungeon.terrain_at(to) == Terrain::Door { 2 } else { 1 }
    }
}

/// Cloud spread: cardinal steps over walkable cells.
pub(super) struct CloudPather<'a> {
    pub(super) state: &'a GameState,
}

impl Pather for CloudPather<'_> {
    fn neighbors(&self, pos: Pos, out: &mut Vec<Pos>) {
        let dungeon = &self.state.dungeon;
        out.extend(pos.neighbors_4().into_iter().filter(|&next| dungeon.is_passable(next)));
    }

    fn cost(&self, _from: Pos, _to: Pos) -> i32 {
        1
    }
}

/// Monster pursuit. Tunnellers treat interior walls as slow but passable.
pub(super) struct PursuitPather<'a> {
    pub(super) state: &'a GameState,
    pub(super) tunnels: bool,
}

impl PursuitPather<'_> {
    fn interior(&self, pos: Pos) -> bool {
        let size = self.state.dungeon.size();
        pos.x > 0 && pos.y > 0 && pos.x < size.width - 1 && pos.y < size.height - 1
    }
}

impl Pather for PursuitPather<'_> {
    fn neighbors(&self, pos: Pos, out: &mut Vec<Pos>) {
        let dungeon = &self.state.dungeon;
        out.extend(pos.neighbors_8().into_iter().filter(|&next| {
            dungeon.is_passable(next)
                || (self.tunnels && self.interior(next) && dungeon.terrain_at(next).is_wall_like())
        }));
    }

    fn cost(&self, _from: Pos, to: Pos) -> i32 {
        if self.state.dungeon.terrain_at(to).is_wall_like() { 4 } else { 1 }
    }
}

impl AstarPather for PursuitPather<'_> {
    fn estimation(&self, from: Pos, to: Pos) -> i32 {
        from.distance(to)
    }
}

/// Player travel: explored walkable cells outside exclusion zones.
pub(super) struct TravelPather<'a> {
    pub(super) state: &'a GameState,
}

impl Pather for TravelPather<'_> {
    fn neighbors(&self, pos: Pos, out: &mut Vec<Pos>) {
        let state = self.state;
        out.extend(pos.neighbors_8().into_iter().filter(|&next| {
            state.dungeon.is_explored(next)
                && state.dungeon.is_passable(next)
                && !state.excluded.contains(&next)
        }));
    }

    fn cost(&self, _from: Pos, _to: Pos) -> i32 {
        1
    }
}

impl AstarPather for TravelPather<'_> {
    fn estimation(&self, from: Pos, to: Pos) -> i32 {
        from.distance(to)
    }
}

/// Autoexplore flood, seeded from unexplored walkable cells. Unexplored cells
/// count as open since the player cannot know what they hold.
pub(super) struct ExplorePather<'a> {
    pub(super) state: &'a GameState,
}

impl ExplorePather<'_> {
    pub(super) fn frontier(&self) -> Vec<Pos> {
        let state = self.state;
        state
            .dungeon
            .positions()
            .filter(|&pos| {
                !state.dungeon.is_explored(pos)
                    && state.dungeon.is_passable(pos)
                    && !state.excluded.contains(&pos)
            })
            .collect()
    }
}

impl Pather for ExplorePather<'_> {
    fn neighbors(&self, pos: Pos, out: &mut Vec<Pos>) {
        let state = self.state;
        out.extend(pos.neighbors_8().into_iter().filter(|&next| {
            state.dungeon.in_bounds(next)
                && (!state.dungeon.is_explored(next) || state.dungeon.is_passable(next))
                && !state.excluded.contains(&next)
        }));
    }

    fn cost(&self, _from: Pos, _to: Pos) -> i32 {
        1
    }
}

/// Magic mapping: every walkable cell reachable from the player.
pub(super) struct RevealPather<'a> {
    pub(super) state: &'a GameState,
}

impl Pather for RevealPather<'_> {
    fn neighbors(&self, pos: Pos, out: &mut Vec<Pos>) {
        let dungeon = &self.state.dungeon;
        out.extend(pos.neighbors_8().into_iter().filter(|&next| dungeon.is_passable(next)));
    }

    fn cost(&self, _from: Pos, _to: Pos) -> i32 {
        1
    }
}

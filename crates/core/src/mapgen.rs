//! Seeded level generation: rooms, searched corridors, decoration and spawns.

mod layout;
pub(crate) mod seed;

use log::{debug, info, warn};

use crate::config::LevelConfig;
use crate::error::SimError;
use crate::grid::GridSize;
use crate::search::{AstarPather, Pather, Searcher};
use crate::state::Dungeon;
use crate::types::{MonsterKind, Pos, Terrain};

use layout::{RoomRect, carve_l_corridor, carve_room, place_rooms};
use seed::SeedStream;

/// Everything needed to start a run on one level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelSetup {
    pub dungeon: Dungeon,
    pub player: Pos,
    pub monsters: Vec<(MonsterKind, Pos)>,
}

/// Corridor carving: four-way, interior cells only, walls cost more than ground.
struct TunnelPather<'a> {
    dungeon: &'a Dungeon,
}

impl Pather for TunnelPather<'_> {
    fn neighbors(&self, pos: Pos, out: &mut Vec<Pos>) {
        let size = self.dungeon.size();
        out.extend(pos.neighbors_4().into_iter().filter(|next| {
            next.x > 0 && next.y > 0 && next.x < size.width - 1 && next.y < size.height - 1
        }));
    }

    fn cost(&self, _from: Pos, to: Pos) -> i32 {
        if self.dungeon.is_passable(to) { 1 } else { 3 }
    }
}

impl AstarPather for TunnelPather<'_> {
    fn estimation(&self, from: Pos, to: Pos) -> i32 {
        from.manhattan(to)
    }
}

/// Growth of decorative patches over plain ground.
struct PatchPather<'a> {
    dungeon: &'a Dungeon,
}

impl Pather for PatchPather<'_> {
    fn neighbors(&self, pos: Pos, out: &mut Vec<Pos>) {
        out.extend(
            pos.neighbors_8()
                .into_iter()
                .filter(|&next| self.dungeon.terrain_at(next) == Terrain::Ground),
        );
    }

    fn cost(&self, _from: Pos, _to: Pos) -> i32 {
        1
    }
}

/// Walkable reachability for the connectivity check.
struct WalkPather<'a> {
    dungeon: &'a Dungeon,
}

impl Pather for WalkPather<'_> {
    fn neighbors(&self, pos: Pos, out: &mut Vec<Pos>) {
        out.extend(pos.neighbors_8().into_iter().filter(|&next| self.dungeon.is_passable(next)));
    }

    fn cost(&self, _from: Pos, _to: Pos) -> i32 {
        1
    }
}

pub fn generate_level(
    seed: u64,
    config: &LevelConfig,
    searcher: &mut Searcher,
) -> Result<LevelSetup, SimError> {
    if config.width < 8 || config.height < 8 {
        return Err(SimError::InvalidLayout(format!(
            "level {}x{} is too small",
            config.width, config.height
        )));
    }
    if searcher.size() != GridSize::new(config.width, config.height) {
        return Err(SimError::InvalidLayout("searcher does not match level size".to_string()));
    }

    let mut stream = SeedStream::new(seed);
    let mut dungeon = Dungeon::new(config.width, config.height);
    let rooms = place_rooms(&mut stream, config.width, config.height, config);
    for room in &rooms {
        carve_room(&mut dungeon, room);
    }
    carve_corridors(&mut dungeon, &rooms, searcher)?;

    let start = rooms[0].center();
    decorate(&mut dungeon, &rooms, start, config, &mut stream, searcher)?;
    ensure_connected(&mut dungeon, &rooms, start, &mut stream, searcher)?;
    let monsters = place_monsters(&dungeon, &rooms, start, config, &mut stream);

    info!(
        "generated level seed={seed} rooms={} monsters={} size={}x{}",
        rooms.len(),
        monsters.len(),
        config.width,
        config.height
    );
    Ok(LevelSetup { dungeon, player: start, monsters })
}

/// Joins each room to its predecessor with a searched corridor, placing doors
/// where a corridor breaks through a room wall.
fn carve_corridors(
    dungeon: &mut Dungeon,
    rooms: &[RoomRect],
    searcher: &mut Searcher,
) -> Result<(), SimError> {
    for pair in rooms.windows(2) {
        let (from, to) = (pair[0].center(), pair[1].center());
        let path = searcher.astar(&TunnelPather { dungeon: &*dungeon }, from, to)?;
        let Some(path) = path else {
            warn!("no corridor between {from:?} and {to:?}");
            continue;
        };
        for (index, &pos) in path.steps.iter().enumerate() {
            if dungeon.is_passable(pos) {
                continue;
            }
            let inside = |step: Option<&Pos>| {
                step.is_some_and(|step| rooms.iter().any(|room| room.contains(*step)))
            };
            let at_room_edge = inside(index.checked_sub(1).and_then(|prev| path.steps.get(prev)))
                || inside(path.steps.get(index + 1));
            let terrain = if at_room_edge { Terrain::Door } else { Terrain::Ground };
            dungeon.set_terrain(pos, terrain);
        }
    }
    Ok(())
}

fn decorate(
    dungeon: &mut Dungeon,
    rooms: &[RoomRect],
    start: Pos,
    config: &LevelConfig,
    stream: &mut SeedStream,
    searcher: &mut Searcher,
) -> Result<(), SimError> {
    for _ in 0..config.foliage_patches {
        let room = rooms[stream.below(rooms.len())];
        let origin = room.random_cell(stream);
        let patch = searcher.dijkstra_map(
            &PatchPather { dungeon: &*dungeon },
            &[origin],
            config.foliage_radius.max(1),
        )?;
        for (pos, _) in patch.iter() {
            if pos != start && dungeon.terrain_at(pos) == Terrain::Ground {
                dungeon.set_terrain(pos, Terrain::Foliage);
            }
        }
    }

    for (count, terrain) in [(config.trees, Terrain::Tree), (config.barrels, Terrain::Barrel)] {
        for _ in 0..count {
            let room = rooms[stream.below(rooms.len())];
            let pos = room.random_cell(stream);
            if pos != start && dungeon.terrain_at(pos) == Terrain::Ground {
                dungeon.set_terrain(pos, terrain);
            }
        }
    }

    for _ in 0..config.lit_rooms {
        let room = rooms[stream.below(rooms.len())];
        for pos in room.expanded(1).cells() {
            dungeon.set_lit(pos, true);
        }
    }
    Ok(())
}

/// Carves straight corridors to any room centre the start cannot reach.
fn ensure_connected(
    dungeon: &mut Dungeon,
    rooms: &[RoomRect],
    start: Pos,
    stream: &mut SeedStream,
    searcher: &mut Searcher,
) -> Result<(), SimError> {
    let reach = searcher.bfs_map(&WalkPather { dungeon: &*dungeon }, &[start])?;
    let cut_off: Vec<Pos> =
        rooms.iter().map(|room| room.center()).filter(|&center| !reach.reached(center)).collect();
    for center in cut_off {
        warn!("room at {center:?} unreachable, carving fallback corridor");
        carve_l_corridor(dungeon, start, center, stream.below(2) == 0);
    }
    debug!("connectivity check reached {} cells", reach.order().len());
    Ok(())
}

fn place_monsters(
    dungeon: &Dungeon,
    rooms: &[RoomRect],
    start: Pos,
    config: &LevelConfig,
    stream: &mut SeedStream,
) -> Vec<(MonsterKind, Pos)> {
    const KINDS: [MonsterKind; 4] =
        [MonsterKind::Guard, MonsterKind::Guard, MonsterKind::Hound, MonsterKind::Digger];
    let spawn_rooms: Vec<RoomRect> =
        rooms.iter().copied().filter(|room| !room.contains(start)).collect();
    if spawn_rooms.is_empty() {
        return Vec::new();
    }

    let mut monsters: Vec<(MonsterKind, Pos)> = Vec::new();
    for index in 0..config.monsters {
        let room = spawn_rooms[index % spawn_rooms.len()];
        for _ in 0..8 {
            let pos = room.random_cell(stream);
            let free = dungeon.is_passable(pos)
                && pos.distance(start) > 1
                && monsters.iter().all(|&(_, other)| other != pos);
            if free {
                monsters.push((KINDS[stream.below(KINDS.len())], pos));
                break;
            }
        }
    }
    monsters
}

//! Room placement and fallback corridor carving.

use crate::config::LevelConfig;
use crate::state::Dungeon;
use crate::types::{Pos, Terrain};

use super::seed::SeedStream;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct RoomRect {
    pub(super) x: i32,
    pub(super) y: i32,
    pub(super) width: i32,
    pub(super) height: i32,
}

impl RoomRect {
    fn right(self) -> i32 {
        self.x + self.width - 1
    }

    fn bottom(self) -> i32 {
        self.y + self.height - 1
    }

    pub(super) fn center(self) -> Pos {
        Pos { y: self.y + self.height / 2, x: self.x + self.width / 2 }
    }

    pub(super) fn expanded(self, margin: i32) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2 * margin,
            height: self.height + 2 * margin,
        }
    }

    pub(super) fn intersects(self, other: &Self) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    pub(super) fn contains(self, pos: Pos) -> bool {
        pos.x >= self.x && pos.x <= self.right() && pos.y >= self.y && pos.y <= self.bottom()
    }

    pub(super) fn cells(self) -> impl Iterator<Item = Pos> {
        (self.y..=self.bottom()).flat_map(move |y| (self.x..=self.right()).map(move |x| Pos { y, x }))
    }

    pub(super) fn random_cell(self, stream: &mut SeedStream) -> Pos {
        Pos {
            y: stream.range_i32(self.y, self.bottom()),
            x: stream.range_i32(self.x, self.right()),
        }
    }
}

/// Places non-touching rooms inside the one-cell border, sorted row-major by centre.
pub(super) fn place_rooms(
    stream: &mut SeedStream,
    width: i32,
    height: i32,
    config: &LevelConfig,
) -> Vec<RoomRect> {
    let min_size = config.min_room_size.max(2) as i32;
    let max_size = (config.max_room_size as i32).max(min_size);

    let mut rooms: Vec<RoomRect> = Vec::new();
    for _ in 0..config.room_attempts {
        if rooms.len() >= config.max_rooms {
            break;
        }
        let room_width = stream.range_i32(min_size, max_size);
        let room_height = stream.range_i32(min_size, max_size.min(height / 2).max(min_size));
        let max_x = width - room_width - 1;
        let max_y = height - room_height - 1;
        if max_x <= 1 || max_y <= 1 {
            continue;
        }
        let candidate = RoomRect {
            x: stream.range_i32(1, max_x),
            y: stream.range_i32(1, max_y),
            width: room_width,
            height: room_height,
        };
        let with_margin = candidate.expanded(1);
        if rooms.iter().any(|room| room.expanded(1).intersects(&with_margin)) {
            continue;
        }
        rooms.push(candidate);
    }

    if rooms.is_empty() {
        rooms.push(RoomRect {
            x: 1,
            y: 1,
            width: (width - 2).min(min_size),
            height: (height - 2).min(min_size),
        });
    }
    rooms.sort_by_key(|room| {
        let center = room.center();
        (center.y, center.x, room.height, room.width)
    });
    rooms
}

pub(super) fn carve_room(dungeon: &mut Dungeon, room: &RoomRect) {
    for pos in room.cells() {
        dungeon.set_terrain(pos, Terrain::Ground);
    }
}

/// Straight two-leg corridor used when the searched corridors leave a room cut off.
pub(super) fn carve_l_corridor(dungeon: &mut Dungeon, start: Pos, end: Pos, horizontal_first: bool) {
    let corner = if horizontal_first {
        Pos { y: start.y, x: end.x }
    } else {
        Pos { y: end.y, x: start.x }
    };
    for (from, to) in [(start, corner), (corner, end)] {
        let mut pos = from;
        loop {
            if !dungeon.is_passable(pos) {
                dungeon.set_terrain(pos, Terrain::Ground);
            }
            if pos == to {
                break;
            }
            pos = pos.offset((to.x - pos.x).signum(), (to.y - pos.y).signum());
        }
    }
}

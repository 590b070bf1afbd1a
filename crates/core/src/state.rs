use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::grid::GridSize;
use crate::types::*;

/// Terrain, exploration and static lighting for one level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dungeon {
    size: GridSize,
    terrain: Vec<Terrain>,
    explored: Vec<bool>,
    lit: Vec<bool>,
}

impl Dungeon {
    /// A level of solid wall.
    pub fn new(width: i32, height: i32) -> Self {
        let size = GridSize::new(width, height);
        Self {
            size,
            terrain: vec![Terrain::Wall; size.len()],
            explored: vec![false; size.len()],
            lit: vec![false; size.len()],
        }
    }

    /// Parses rows of `#` wall, `.` ground, `+` door, `"` foliage, `%` holed wall,
    /// `T` tree, `o` barrel and `*` lit ground.
    pub fn parse(rows: &[&str]) -> Result<Self, SimError> {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |row| row.chars().count()) as i32;
        let mut dungeon = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() as i32 != width {
                return Err(SimError::InvalidLayout(format!("row {y} has a different width")));
            }
            for (x, glyph) in row.chars().enumerate() {
                let pos = Pos { y: y as i32, x: x as i32 };
                let terrain = match glyph {
                    '#' => Terrain::Wall,
                    '.' | '*' => Terrain::Ground,
                    '+' => Terrain::Door,
                    '"' => Terrain::Foliage,
                    '%' => Terrain::HoledWall,
                    'T' => Terrain::Tree,
                    'o' => Terrain::Barrel,
                    other => {
                        return Err(SimError::InvalidLayout(format!(
                            "unknown glyph {other:?} at ({x}, {y})"
                        )));
                    }
                };
                dungeon.set_terrain(pos, terrain);
                dungeon.set_lit(pos, glyph == '*');
            }
        }
        Ok(dungeon)
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        self.size.contains(pos)
    }

    /// Out-of-bounds cells read as wall.
    pub fn terrain_at(&self, pos: Pos) -> Terrain {
        self.size.index(pos).map_or(Terrain::Wall, |index| self.terrain[index])
    }

    pub fn set_terrain(&mut self, pos: Pos, terrain: Terrain) {
        if let Some(index) = self.size.index(pos) {
            self.terrain[index] = terrain;
        }
    }

    pub fn is_passable(&self, pos: Pos) -> bool {
        self.terrain_at(pos).is_passable()
    }

    pub fn is_explored(&self, pos: Pos) -> bool {
        self.size.index(pos).is_some_and(|index| self.explored[index])
    }

    pub fn set_explored(&mut self, pos: Pos) {
        if let Some(index) = self.size.index(pos) {
            self.explored[index] = true;
        }
    }

    pub fn explored_count(&self) -> usize {
        self.explored.iter().filter(|explored| **explored).count()
    }

    /// Static light, ignoring clouds.
    pub fn is_lit(&self, pos: Pos) -> bool {
        self.size.index(pos).is_some_and(|index| self.lit[index])
    }

    pub fn set_lit(&mut self, pos: Pos, lit: bool) {
        if let Some(index) = self.size.index(pos) {
            self.lit[index] = lit;
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        self.size.positions()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Pos,
    pub hp: i32,
    pub max_hp: i32,
    /// Remaining duration of each active status, in status ticks.
    pub statuses: BTreeMap<PlayerStatus, u32>,
}

impl Player {
    pub fn has(&self, status: PlayerStatus) -> bool {
        self.statuses.contains_key(&status)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub kind: MonsterKind,
    pub pos: Pos,
    pub dir: Dir,
    pub state: MonsterState,
    pub target: Option<Pos>,
    pub hp: i32,
    pub statuses: BTreeMap<MonsterStatus, u32>,
    pub alive: bool,
    pub moved_last_turn: bool,
}

impl Monster {
    pub fn new(kind: MonsterKind, pos: Pos) -> Self {
        Self {
            kind,
            pos,
            dir: Dir::S,
            state: MonsterState::Resting,
            target: None,
            hp: kind.max_hp(),
            statuses: BTreeMap::new(),
            alive: true,
            moved_last_turn: false,
        }
    }

    pub fn has(&self, status: MonsterStatus) -> bool {
        self.statuses.contains_key(&status)
    }

    pub fn delay(&self) -> u32 {
        let base = self.kind.delay();
        if self.has(MonsterStatus::Slow) { base * 2 } else { base }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub dungeon: Dungeon,
    pub player: Player,
    pub monsters: Vec<Monster>,
    #[serde(with = "pos_keyed")]
    pub clouds: BTreeMap<Pos, CloudKind>,
    /// Rank at which each fog or night cloud clears. Burning cells have no entry.
    #[serde(default, with = "pos_keyed")]
    pub cloud_expiry: BTreeMap<Pos, i64>,
    /// Original terrain under each temporary wall.
    #[serde(with = "pos_keyed")]
    pub temporary_walls: BTreeMap<Pos, Terrain>,
    /// Cells travel routes must avoid.
    pub excluded: BTreeSet<Pos>,
}

/// Position-keyed maps stored as `[pos, value]` pairs, since JSON keys must be strings.
mod pos_keyed {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::types::Pos;

    pub fn serialize<S, V>(map: &BTreeMap<Pos, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        V: Serialize,
    {
        serializer.collect_seq(map)
    }

    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<BTreeMap<Pos, V>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        let pairs = Vec::<(Pos, V)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

impl GameState {
    pub fn monster(&self, index: MonsterIdx) -> Option<&Monster> {
        self.monsters.get(index.0)
    }

    pub fn monster_mut(&mut self, index: MonsterIdx) -> Option<&mut Monster> {
        self.monsters.get_mut(index.0)
    }

    pub fn monster_at(&self, pos: Pos) -> Option<MonsterIdx> {
        self.monsters
            .iter()
            .position(|monster| monster.alive && monster.pos == pos)
            .map(MonsterIdx)
    }

    pub fn living_monsters(&self) -> impl Iterator<Item = (MonsterIdx, &Monster)> {
        self.monsters
            .iter()
            .enumerate()
            .filter(|(_, monster)| monster.alive)
            .map(|(index, monster)| (MonsterIdx(index), monster))
    }

    pub fn is_occupied(&self, pos: Pos) -> bool {
        self.player.pos == pos || self.monster_at(pos).is_some()
    }

    /// Static light minus night clouds.
    pub fn is_lit(&self, pos: Pos) -> bool {
        self.dungeon.is_lit(pos) && self.clouds.get(&pos) != Some(&CloudKind::Night)
    }

    pub fn blocks_sight_cloud(&self, pos: Pos) -> bool {
        matches!(self.clouds.get(&pos), Some(CloudKind::Fog | CloudKind::Fire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_every_glyph() {
        let dungeon = Dungeon::parse(&["#.+\"", "%To*"]).expect("valid layout");
        assert_eq!(dungeon.size(), GridSize::new(4, 2));
        assert_eq!(dungeon.terrain_at(Pos { y: 0, x: 2 }), Terrain::Door);
        assert_eq!(dungeon.terrain_at(Pos { y: 0, x: 3 }), Terrain::Foliage);
        assert_eq!(dungeon.terrain_at(Pos { y: 1, x: 0 }), Terrain::HoledWall);
        assert_eq!(dungeon.terrain_at(Pos { y: 1, x: 2 }), Terrain::Barrel);
        assert!(dungeon.is_lit(Pos { y: 1, x: 3 }));
        assert!(!dungeon.is_lit(Pos { y: 0, x: 1 }));
        assert_eq!(dungeon.terrain_at(Pos { y: 5, x: 5 }), Terrain::Wall, "outside reads as wall");
    }

    #[test]
    fn parse_rejects_ragged_rows_and_unknown_glyphs() {
        assert!(matches!(Dungeon::parse(&["...", ".."]), Err(SimError::InvalidLayout(_))));
        assert!(matches!(Dungeon::parse(&["..?"]), Err(SimError::InvalidLayout(_))));
    }
}

//! Ring-expansion ray propagation for line of sight.
//! This module exists to turn terrain transparency into per-cell sight costs and rays.
//! It does not own view cones, darkness or hiding rules; those live in monster perception.

use serde::{Deserialize, Serialize};

use crate::grid::GridSize;
use crate::types::Pos;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transparency {
    Clear,
    /// Foliage and holed walls: heavily attenuating but not fully blocking.
    Foliage,
    Opaque,
}

/// Read-only view of the world the ray builder needs.
pub trait Sightlines {
    fn size(&self) -> GridSize;
    fn transparency(&self, pos: Pos) -> Transparency;
    fn is_lit(&self, pos: Pos) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RayStyle {
    Player,
    Monster,
    /// Sight from inside a tree canopy: foliage is free and lit cells are seen farther.
    Tree,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    pub player_ceiling: i32,
    pub monster_ceiling: i32,
    pub tree_ceiling: i32,
    pub lit_ceiling: i32,
    /// Monsters only notice an unlit target this close.
    pub monster_darkness_range: i32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            player_ceiling: 10,
            monster_ceiling: 8,
            tree_ceiling: 6,
            lit_ceiling: 14,
            monster_darkness_range: 1,
        }
    }
}

impl VisionConfig {
    pub fn ceiling(&self, style: RayStyle) -> i32 {
        match style {
            RayStyle::Player => self.player_ceiling,
            RayStyle::Monster => self.monster_ceiling,
            RayStyle::Tree => self.tree_ceiling,
        }
    }

    /// Largest ceiling a build of `style` can test against.
    fn reach(&self, style: RayStyle) -> i32 {
        match style {
            RayStyle::Tree => self.tree_ceiling.max(self.lit_ceiling),
            _ => self.ceiling(style),
        }
        .max(1)
    }
}

/// Per-cell sight costs from one source, rebuilt whenever the source or terrain changes.
#[derive(Clone, Debug)]
pub struct RayMap {
    source: Pos,
    style: RayStyle,
    ceiling: i32,
    size: GridSize,
    costs: Vec<i32>,
    parents: Vec<Option<Pos>>,
    visible: Vec<bool>,
}

impl RayMap {
    /// A map in which nothing has been reached.
    pub fn empty(size: GridSize, source: Pos) -> Self {
        Self {
            source,
            style: RayStyle::Player,
            ceiling: 0,
            size,
            costs: vec![-1; size.len()],
            parents: vec![None; size.len()],
            visible: vec![false; size.len()],
        }
    }

    pub fn source(&self) -> Pos {
        self.source
    }

    pub fn style(&self) -> RayStyle {
        self.style
    }

    pub fn ceiling(&self) -> i32 {
        self.ceiling
    }

    pub fn cost(&self, pos: Pos) -> Option<i32> {
        let cost = self.costs[self.size.index(pos)?];
        (cost >= 0).then_some(cost)
    }

    pub fn in_view(&self, pos: Pos) -> bool {
        self.size.index(pos).is_some_and(|index| self.visible[index])
    }

    /// The resolved parent of `pos`: the neighbouring cell its ray came through.
    pub fn parent(&self, pos: Pos) -> Option<Pos> {
        self.parents[self.size.index(pos)?]
    }

    pub fn visible_positions(&self) -> impl Iterator<Item = Pos> + '_ {
        self.visible
            .iter()
            .enumerate()
            .filter(|(_, visible)| **visible)
            .map(|(index, _)| self.size.pos_at(index))
    }

    /// Ray from the source to `to`, source first. `None` when `to` was never reached.
    pub fn ray(&self, to: Pos) -> Option<Vec<Pos>> {
        self.cost(to)?;
        let mut steps = vec![to];
        let mut current = to;
        while current != self.source {
            current = self.parent(current)?;
            steps.push(current);
        }
        steps.reverse();
        Some(steps)
    }
}

struct RayBuilder<'a, S: Sightlines + ?Sized> {
    sight: &'a S,
    map: RayMap,
    opaque_cost: i32,
}

impl<S: Sightlines + ?Sized> RayBuilder<'_, S> {
    fn stored(&self, pos: Pos) -> Option<i32> {
        self.map.cost(pos)
    }

    fn step_cost(&self, from: Pos, to: Pos) -> i32 {
        let source = self.map.source;
        if from.x != to.x
            && from.y != to.y
            && self.sight.transparency(Pos { y: from.y, x: to.x }) == Transparency::Opaque
            && self.sight.transparency(Pos { y: to.y, x: from.x }) == Transparency::Opaque
        {
            return self.opaque_cost;
        }
        if from == source {
            return 1;
        }
        match self.sight.transparency(from) {
            Transparency::Opaque => self.opaque_cost,
            Transparency::Foliage if self.map.style == RayStyle::Tree => 1,
            Transparency::Foliage => self.map.ceiling + source.distance(to) - 2,
            Transparency::Clear => 1,
        }
    }

    /// Picks the cheaper of the one or two resolved parents of `to`; ties go to the diagonal one.
    fn resolve(&mut self, to: Pos) {
        let source = self.map.source;
        let (qx, qy) = (source.x - to.x, source.y - to.y);
        let (sx, sy) = (qx.signum(), qy.signum());
        let primary = to.offset(sx, sy);
        let secondary = if qx == 0 || qy == 0 || qx.abs() == qy.abs() {
            None
        } else if qx.abs() > qy.abs() {
            Some(to.offset(sx, 0))
        } else {
            Some(to.offset(0, sy))
        };

        let mut best: Option<(Pos, i32)> = None;
        for parent in [Some(primary), secondary].into_iter().flatten() {
            let Some(base) = self.stored(parent) else {
                continue;
            };
            let total = base.saturating_add(self.step_cost(parent, to));
            if best.is_none_or(|(_, cost)| total < cost) {
                best = Some((parent, total));
            }
        }

        let Some((parent, cost)) = best else {
            return;
        };
        let Some(index) = self.map.size.index(to) else {
            return;
        };
        self.map.costs[index] = cost;
        self.map.parents[index] = Some(parent);
    }
}

/// Builds the ray map for `source` by expanding square rings of increasing
/// Chebyshev distance: top and bottom rows, then the side columns without corners.
pub fn build_rays<S: Sightlines + ?Sized>(
    sight: &S,
    source: Pos,
    style: RayStyle,
    config: &VisionConfig,
) -> RayMap {
    let size = sight.size();
    let mut map = RayMap::empty(size, source);
    map.style = style;
    map.ceiling = config.ceiling(style);
    let Some(source_index) = size.index(source) else {
        return map;
    };
    map.costs[source_index] = 0;

    let reach = config.reach(style);
    let mut builder = RayBuilder { sight, map, opaque_cost: reach };

    for d in 1..reach {
        let left = (source.x - d).max(0);
        let right = (source.x + d).min(size.width - 1);
        for y in [source.y - d, source.y + d] {
            if y < 0 || y >= size.height {
                continue;
            }
            for x in left..=right {
                builder.resolve(Pos { y, x });
            }
        }
        let top = (source.y - d + 1).max(0);
        let bottom = (source.y + d - 1).min(size.height - 1);
        for x in [source.x - d, source.x + d] {
            if x < 0 || x >= size.width {
                continue;
            }
            for y in top..=bottom {
                builder.resolve(Pos { y, x });
            }
        }
    }

    let mut map = builder.map;
    let lit_ceiling = config.lit_ceiling;
    for index in 0..map.costs.len() {
        let cost = map.costs[index];
        if cost < 0 {
            continue;
        }
        map.visible[index] = cost < map.ceiling
            || (style == RayStyle::Tree && cost < lit_ceiling && sight.is_lit(size.pos_at(index)));
    }
    map
}

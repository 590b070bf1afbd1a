//! Grid geometry: bounds, dense indexing, neighbours, distance and direction classification.

use serde::{Deserialize, Serialize};

use crate::types::{Dir, Pos};

/// Offsets for the eight principal directions, clockwise from north.
const PRINCIPAL_OFFSETS: [(i32, i32); 8] =
    [(0, -1), (1, -1), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1)];

const CARDINAL_OFFSETS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub width: i32,
    pub height: i32,
}

impl GridSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width: width.max(0), height: height.max(0) }
    }

    pub fn contains(self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn len(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    pub fn index(self, pos: Pos) -> Option<usize> {
        self.contains(pos).then(|| (pos.y as usize) * (self.width as usize) + pos.x as usize)
    }

    pub fn pos_at(self, index: usize) -> Pos {
        let width = self.width.max(1) as usize;
        Pos { y: (index / width) as i32, x: (index % width) as i32 }
    }

    /// Row-major iteration over every cell.
    pub fn positions(self) -> impl Iterator<Item = Pos> {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Pos { y, x }))
    }
}

impl Pos {
    pub fn offset(self, dx: i32, dy: i32) -> Pos {
        Pos { y: self.y + dy, x: self.x + dx }
    }

    pub fn neighbors_8(self) -> [Pos; 8] {
        PRINCIPAL_OFFSETS.map(|(dx, dy)| self.offset(dx, dy))
    }

    pub fn neighbors_4(self) -> [Pos; 4] {
        CARDINAL_OFFSETS.map(|(dx, dy)| self.offset(dx, dy))
    }

    /// Chebyshev distance.
    pub fn distance(self, other: Pos) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn manhattan(self, other: Pos) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Direction in which `self` lies as seen from `origin`.
    ///
    /// Exact diagonals are only reported when `|dx| == |dy|`; any other
    /// off-axis offset falls into the near-diagonal sector on the side of
    /// its dominant axis.
    pub fn dir_from(self, origin: Pos) -> Option<Dir> {
        let dx = self.x - origin.x;
        let dy = self.y - origin.y;
        let (ax, ay) = (dx.abs(), dy.abs());
        let dir = match (dx.signum(), dy.signum()) {
            (0, 0) => return None,
            (0, -1) => Dir::N,
            (0, 1) => Dir::S,
            (1, 0) => Dir::E,
            (-1, 0) => Dir::W,
            (1, -1) if ax == ay => Dir::Ne,
            (1, -1) if ay > ax => Dir::Nne,
            (1, -1) => Dir::Ene,
            (1, 1) if ax == ay => Dir::Se,
            (1, 1) if ax > ay => Dir::Ese,
            (1, 1) => Dir::Sse,
            (-1, 1) if ax == ay => Dir::Sw,
            (-1, 1) if ay > ax => Dir::Ssw,
            (-1, 1) => Dir::Wsw,
            (_, _) if ax == ay => Dir::Nw,
            (_, _) if ax > ay => Dir::Wnw,
            (_, _) => Dir::Nnw,
        };
        Some(dir)
    }
}

impl Dir {
    pub const ALL: [Dir; 16] = [
        Dir::N,
        Dir::Nne,
        Dir::Ne,
        Dir::Ene,
        Dir::E,
        Dir::Ese,
        Dir::Se,
        Dir::Sse,
        Dir::S,
        Dir::Ssw,
        Dir::Sw,
        Dir::Wsw,
        Dir::W,
        Dir::Wnw,
        Dir::Nw,
        Dir::Nnw,
    ];

    pub fn sector(self) -> u8 {
        self as u8
    }

    pub fn from_sector(sector: u8) -> Dir {
        Dir::ALL[usize::from(sector % 16)]
    }

    /// Number of sectors separating two directions, in `0..=8`.
    pub fn sector_gap(self, other: Dir) -> u8 {
        let raw = self.sector().abs_diff(other.sector());
        raw.min(16 - raw)
    }

    /// Unit step for the eight principal directions.
    pub fn step(self) -> Option<(i32, i32)> {
        let sector = self.sector();
        (sector % 2 == 0).then(|| PRINCIPAL_OFFSETS[usize::from(sector / 2)])
    }

    /// Principal direction of a single step between adjacent cells.
    pub fn of_step(from: Pos, to: Pos) -> Option<Dir> {
        if from.distance(to) != 1 {
            return None;
        }
        to.dir_from(from)
    }
}

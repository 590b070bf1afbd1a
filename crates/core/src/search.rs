//! Grid search: a reusable node pool shared by A* and the bounded flood fill.
//! This module exists so every navigation policy runs through one deterministic search core.
//! It does not own movement rules; callers describe those through [`Pather`] capabilities.

mod astar;
mod flood;
mod pool;
mod queue;

pub use astar::Path;
pub use flood::{BfsMap, DijkstraMap};

use std::mem;

use crate::error::SearchError;
use crate::grid::GridSize;
use crate::types::Pos;

use pool::{NodeId, NodePool};
use queue::OpenQueue;

pub const DEFAULT_ITERATION_CAP: usize = 1_000_000;

/// Neighbour and step-cost policy for a search. Implementations only read world state.
pub trait Pather {
    /// Appends the neighbours of `pos` to `out`.
    fn neighbors(&self, pos: Pos, out: &mut Vec<Pos>);

    fn cost(&self, from: Pos, to: Pos) -> i32;
}

pub trait AstarPather: Pather {
    /// Admissible estimate of the remaining cost from `from` to `to`.
    fn estimation(&self, from: Pos, to: Pos) -> i32;
}

/// Search session owning the node arena. Every query resets the arena, so node
/// ids handed out by one query can never be observed by the next.
#[derive(Debug)]
pub struct Searcher {
    size: GridSize,
    pool: NodePool,
    open: OpenQueue,
    scratch: Vec<Pos>,
    edges: Vec<(Pos, i32)>,
    next_seq: u64,
    iteration_cap: usize,
}

impl Searcher {
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            pool: NodePool::new(size),
            open: OpenQueue::default(),
            scratch: Vec::with_capacity(8),
            edges: Vec::with_capacity(8),
            next_seq: 0,
            iteration_cap: DEFAULT_ITERATION_CAP,
        }
    }

    pub fn with_iteration_cap(mut self, iteration_cap: usize) -> Self {
        self.iteration_cap = iteration_cap;
        self
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    fn begin(&mut self) {
        self.pool.reset();
        self.open.clear();
        self.next_seq = 0;
    }

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn check_bounds(&self, pos: Pos) -> Result<(), SearchError> {
        if self.size.contains(pos) {
            Ok(())
        } else {
            Err(SearchError::OutOfBounds { pos, width: self.size.width, height: self.size.height })
        }
    }

    fn node_for(&mut self, pos: Pos) -> Result<NodeId, SearchError> {
        self.check_bounds(pos)?;
        self.pool.get(pos).ok_or(SearchError::OutOfBounds {
            pos,
            width: self.size.width,
            height: self.size.height,
        })
    }

    /// Collects the validated neighbours of `pos` with their step costs.
    /// Callers hand the buffer back through `self.edges` once done.
    fn expand<P: Pather + ?Sized>(
        &mut self,
        pather: &P,
        pos: Pos,
    ) -> Result<Vec<(Pos, i32)>, SearchError> {
        let mut neighbors = mem::take(&mut self.scratch);
        neighbors.clear();
        pather.neighbors(pos, &mut neighbors);
        let mut edges = mem::take(&mut self.edges);
        edges.clear();
        for &next in &neighbors {
            self.check_bounds(next)?;
            let cost = pather.cost(pos, next);
            if cost < 0 {
                return Err(SearchError::NegativeCost { from: pos, to: next, cost });
            }
            edges.push((next, cost));
        }
        self.scratch = neighbors;
        Ok(edges)
    }

    /// Opens `id` at `cost` with the given rank, replacing a costlier open entry.
    fn open_node(&mut self, id: NodeId, cost: i32, rank: i32, parent: Option<Pos>) {
        let seq = self.bump_seq();
        if self.pool.node(id).open {
            self.open.remove(&mut self.pool, id);
        }
        let node = self.pool.node_mut(id);
        node.cost = cost;
        node.rank = rank;
        node.parent = parent;
        node.open = true;
        node.seq = seq;
        self.open.push(&mut self.pool, id);
    }

    fn pop_open(&mut self, iterations: &mut usize) -> Result<Option<NodeId>, SearchError> {
        let Some(id) = self.open.pop(&mut self.pool) else {
            return Ok(None);
        };
        *iterations += 1;
        if *iterations > self.iteration_cap {
            return Err(SearchError::IterationCap { limit: self.iteration_cap });
        }
        let node = self.pool.node_mut(id);
        node.open = false;
        node.closed = true;
        Ok(Some(id))
    }
}

#[cfg(test)]
pub(crate) mod test_pathers {
    use super::*;

    /// Eight-way movement over a string grid where `#` blocks, every step costs one.
    pub(crate) struct GridPather {
        pub(crate) size: GridSize,
        pub(crate) blocked: Vec<bool>,
    }

    impl GridPather {
        pub(crate) fn parse(rows: &[&str]) -> Self {
            let height = rows.len() as i32;
            let width = rows.first().map_or(0, |row| row.len()) as i32;
            let blocked = rows.iter().flat_map(|row| row.chars().map(|c| c == '#')).collect();
            Self { size: GridSize::new(width, height), blocked }
        }

        pub(crate) fn open(width: i32, height: i32) -> Self {
            let size = GridSize::new(width, height);
            Self { size, blocked: vec![false; size.len()] }
        }

        fn passable(&self, pos: Pos) -> bool {
            self.size.index(pos).is_some_and(|index| !self.blocked[index])
        }
    }

    impl Pather for GridPather {
        fn neighbors(&self, pos: Pos, out: &mut Vec<Pos>) {
            out.extend(pos.neighbors_8().into_iter().filter(|&next| self.passable(next)));
        }

        fn cost(&self, _from: Pos, _to: Pos) -> i32 {
            1
        }
    }

    impl AstarPather for GridPather {
        fn estimation(&self, from: Pos, to: Pos) -> i32 {
            from.distance(to)
        }
    }
}

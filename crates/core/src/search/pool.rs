//! Per-query node arena addressed by dense ids.

use crate::grid::GridSize;
use crate::types::Pos;

pub(super) type NodeId = usize;

#[derive(Clone, Copy, Debug)]
pub(super) struct Node {
    pub(super) pos: Pos,
    pub(super) cost: i32,
    pub(super) rank: i32,
    pub(super) parent: Option<Pos>,
    pub(super) open: bool,
    pub(super) closed: bool,
    pub(super) seq: u64,
    pub(super) heap_index: usize,
}

impl Node {
    fn fresh(pos: Pos) -> Self {
        Self {
            pos,
            cost: 0,
            rank: 0,
            parent: None,
            open: false,
            closed: false,
            seq: 0,
            heap_index: 0,
        }
    }
}

/// Arena of search nodes plus a generation-stamped position index.
///
/// `reset` truncates the arena without freeing it and bumps the generation,
/// which invalidates every index slot in O(1).
#[derive(Debug)]
pub(super) struct NodePool {
    size: GridSize,
    nodes: Vec<Node>,
    slots: Vec<(u32, NodeId)>,
    generation: u32,
}

impl NodePool {
    pub(super) fn new(size: GridSize) -> Self {
        Self { size, nodes: Vec::new(), slots: vec![(0, 0); size.len()], generation: 1 }
    }

    pub(super) fn reset(&mut self) {
        self.nodes.clear();
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.slots.fill((0, 0));
            self.generation = 1;
        }
    }

    /// Returns the node created for `pos` during this query, creating it on first use.
    pub(super) fn get(&mut self, pos: Pos) -> Option<NodeId> {
        let index = self.size.index(pos)?;
        let (generation, id) = self.slots[index];
        if generation == self.generation {
            return Some(id);
        }
        let id = self.nodes.len();
        self.nodes.push(Node::fresh(pos));
        self.slots[index] = (self.generation, id);
        Some(id)
    }

    /// Looks up a node without creating one.
    pub(super) fn find(&self, pos: Pos) -> Option<NodeId> {
        let index = self.size.index(pos)?;
        let (generation, id) = self.slots[index];
        (generation == self.generation).then_some(id)
    }

    pub(super) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub(super) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.nodes.len()
    }
}

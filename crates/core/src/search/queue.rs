//! Indexed binary min-heap over pool nodes, keyed by `(rank, seq)`.

use super::pool::{NodeId, NodePool};

#[derive(Debug, Default)]
pub(super) struct OpenQueue {
    heap: Vec<NodeId>,
}

impl OpenQueue {
    pub(super) fn clear(&mut self) {
        self.heap.clear();
    }

    pub(super) fn push(&mut self, pool: &mut NodePool, id: NodeId) {
        let slot = self.heap.len();
        self.heap.push(id);
        pool.node_mut(id).heap_index = slot;
        self.sift_up(pool, slot);
    }

    pub(super) fn pop(&mut self, pool: &mut NodePool) -> Option<NodeId> {
        if self.heap.is_empty() {
            return None;
        }
        let top = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            pool.node_mut(self.heap[0]).heap_index = 0;
            self.sift_down(pool, 0);
        }
        Some(top)
    }

    /// Removes an open node from wherever it sits in the heap.
    pub(super) fn remove(&mut self, pool: &mut NodePool, id: NodeId) {
        let slot = pool.node(id).heap_index;
        if self.heap.get(slot) != Some(&id) {
            return;
        }
        self.heap.swap_remove(slot);
        if slot < self.heap.len() {
            pool.node_mut(self.heap[slot]).heap_index = slot;
            self.sift_down(pool, slot);
            self.sift_up(pool, slot);
        }
    }

    fn key(pool: &NodePool, id: NodeId) -> (i32, u64) {
        let node = pool.node(id);
        (node.rank, node.seq)
    }

    fn swap(&mut self, pool: &mut NodePool, a: usize, b: usize) {
        self.heap.swap(a, b);
        pool.node_mut(self.heap[a]).heap_index = a;
        pool.node_mut(self.heap[b]).heap_index = b;
    }

    fn sift_up(&mut self, pool: &mut NodePool, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if Self::key(pool, self.heap[slot]) >= Self::key(pool, self.heap[parent]) {
                break;
            }
            self.swap(pool, slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, pool: &mut NodePool, mut slot: usize) {
        loop {
            let left = slot * 2 + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < self.heap.len()
                && Self::key(pool, self.heap[left]) < Self::key(pool, self.heap[smallest])
            {
                smallest = left;
            }
            if right < self.heap.len()
                && Self::key(pool, self.heap[right]) < Self::key(pool, self.heap[smallest])
            {
                smallest = right;
            }
            if smallest == slot {
                return;
            }
            self.swap(pool, slot, smallest);
            slot = smallest;
        }
    }
}

//! Single-source, single-target best-first search.

use serde::{Deserialize, Serialize};

use super::*;

/// Steps from the source (index 0) to the target (last), both inclusive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub steps: Vec<Pos>,
    pub cost: i32,
}

impl Path {
    pub fn source(&self) -> Option<Pos> {
        self.steps.first().copied()
    }

    pub fn target(&self) -> Option<Pos> {
        self.steps.last().copied()
    }

    /// The cell to move to after the source, if the path has one.
    pub fn first_step(&self) -> Option<Pos> {
        self.steps.get(1).copied()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Searcher {
    /// A* from `from` to `to`. Open entries are ranked by `(cost + estimation, seq)`.
    ///
    /// A cheaper route to an open node replaces its queue entry; closed nodes are
    /// never reopened, so an inconsistent estimation can yield a costlier path.
    /// `Ok(None)` means the target is unreachable.
    pub fn astar<P: AstarPather + ?Sized>(
        &mut self,
        pather: &P,
        from: Pos,
        to: Pos,
    ) -> Result<Option<Path>, SearchError> {
        self.check_bounds(from)?;
        self.check_bounds(to)?;
        self.begin();

        let start = self.node_for(from)?;
        self.open_node(start, 0, pather.estimation(from, to), None);

        let mut iterations = 0;
        while let Some(current) = self.pop_open(&mut iterations)? {
            let (pos, cost) = {
                let node = self.pool.node(current);
                (node.pos, node.cost)
            };
            if pos == to {
                return Ok(Some(self.reconstruct(current)));
            }

            let edges = self.expand(pather, pos)?;
            for &(next, step) in &edges {
                let id = self.node_for(next)?;
                let node = self.pool.node(id);
                let new_cost = cost.saturating_add(step);
                if node.closed || (node.open && new_cost >= node.cost) {
                    continue;
                }
                let rank = new_cost.saturating_add(pather.estimation(next, to));
                self.open_node(id, new_cost, rank, Some(pos));
            }
            self.edges = edges;
        }

        Ok(None)
    }

    fn reconstruct(&self, target: NodeId) -> Path {
        let target_node = self.pool.node(target);
        let mut steps = vec![target_node.pos];
        let mut parent = target_node.parent;
        while let Some(pos) = parent {
            steps.push(pos);
            parent = self.pool.find(pos).and_then(|id| self.pool.node(id).parent);
        }
        steps.reverse();
        Path { steps, cost: target_node.cost }
    }
}

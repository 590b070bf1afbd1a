//! Multi-source uniform-cost flood fill and its dense breadth-first variant.

use std::collections::{BTreeMap, VecDeque};

use super::*;

/// Reached positions with their minimal cost from the nearest source.
/// Positions at or beyond the ceiling are absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DijkstraMap {
    costs: BTreeMap<Pos, i32>,
}

impl DijkstraMap {
    pub fn get(&self, pos: Pos) -> Option<i32> {
        self.costs.get(&pos).copied()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.costs.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, i32)> + '_ {
        self.costs.iter().map(|(&pos, &cost)| (pos, cost))
    }
}

/// Unweighted distances over a dense grid, plus the order cells were reached in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BfsMap {
    size: GridSize,
    dist: Vec<i32>,
    order: Vec<Pos>,
}

impl BfsMap {
    pub fn distance(&self, pos: Pos) -> Option<i32> {
        let index = self.size.index(pos)?;
        let dist = self.dist[index];
        (dist >= 0).then_some(dist)
    }

    pub fn reached(&self, pos: Pos) -> bool {
        self.distance(pos).is_some()
    }

    /// Cells in the order they were reached, sources first.
    pub fn order(&self) -> &[Pos] {
        &self.order
    }
}

impl Searcher {
    /// Uniform-cost flood from every source at once.
    ///
    /// A candidate whose cost would reach `max_cost` is dropped before it is
    /// queued, so the search never walks past the ceiling.
    pub fn dijkstra_map<P: Pather + ?Sized>(
        &mut self,
        pather: &P,
        sources: &[Pos],
        max_cost: i32,
    ) -> Result<DijkstraMap, SearchError> {
        for &source in sources {
            self.check_bounds(source)?;
        }
        self.begin();
        let mut map = DijkstraMap::default();
        if max_cost <= 0 {
            return Ok(map);
        }

        for &source in sources {
            let id = self.node_for(source)?;
            if !self.pool.node(id).open {
                self.open_node(id, 0, 0, None);
            }
        }

        let mut iterations = 0;
        while let Some(current) = self.pop_open(&mut iterations)? {
            let (pos, cost) = {
                let node = self.pool.node(current);
                (node.pos, node.cost)
            };
            map.costs.insert(pos, cost);

            let edges = self.expand(pather, pos)?;
            for &(next, step) in &edges {
                let new_cost = cost.saturating_add(step);
                if new_cost >= max_cost {
                    continue;
                }
                let id = self.node_for(next)?;
                let node = self.pool.node(id);
                if node.closed || (node.open && new_cost >= node.cost) {
                    continue;
                }
                self.open_node(id, new_cost, new_cost, Some(pos));
            }
            self.edges = edges;
        }

        Ok(map)
    }

    /// Unbounded equal-weight flood over a dense distance array. Step costs are ignored.
    pub fn bfs_map<P: Pather + ?Sized>(
        &mut self,
        pather: &P,
        sources: &[Pos],
    ) -> Result<BfsMap, SearchError> {
        let size = self.size;
        let mut dist = vec![-1; size.len()];
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        for &source in sources {
            self.check_bounds(source)?;
            if let Some(index) = size.index(source)
                && dist[index] < 0
            {
                dist[index] = 0;
                order.push(source);
                queue.push_back(source);
            }
        }

        let mut neighbors = mem::take(&mut self.scratch);
        let mut iterations = 0;
        while let Some(pos) = queue.pop_front() {
            iterations += 1;
            if iterations > self.iteration_cap {
                return Err(SearchError::IterationCap { limit: self.iteration_cap });
            }
            let base = size.index(pos).map_or(0, |index| dist[index]);
            neighbors.clear();
            pather.neighbors(pos, &mut neighbors);
            for &next in &neighbors {
                self.check_bounds(next)?;
                if let Some(index) = size.index(next)
                    && dist[index] < 0
                {
                    dist[index] = base + 1;
                    order.push(next);
                    queue.push_back(next);
                }
            }
        }
        self.scratch = neighbors;

        Ok(BfsMap { size, dist, order })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::search::test_pathers::GridPather;

    fn pather_from_mask(width: i32, height: i32, mask: &[bool]) -> GridPather {
        let mut pather = GridPather::open(width, height);
        pather.blocked.copy_from_slice(mask);
        pather
    }

    #[test]
    fn open_grid_flood_matches_chebyshev_distance() {
        let pather = GridPather::open(9, 9);
        let mut searcher = Searcher::new(pather.size);
        let center = Pos { y: 4, x: 4 };
        let map = searcher.dijkstra_map(&pather, &[center], 4).expect("in bounds");

        for pos in pather.size.positions() {
            let distance = pos.distance(center);
            if distance < 4 {
                assert_eq!(map.get(pos), Some(distance), "cost at {pos:?}");
            } else {
                assert!(!map.contains(pos), "{pos:?} lies at or past the ceiling");
            }
        }
    }

    #[test]
    fn multiple_sources_start_at_zero() {
        let pather = GridPather::open(10, 1);
        let mut searcher = Searcher::new(pather.size);
        let sources = [Pos { y: 0, x: 0 }, Pos { y: 0, x: 9 }];
        let map = searcher.dijkstra_map(&pather, &sources, 100).expect("in bounds");
        assert_eq!(map.get(Pos { y: 0, x: 0 }), Some(0));
        assert_eq!(map.get(Pos { y: 0, x: 9 }), Some(0));
        assert_eq!(map.get(Pos { y: 0, x: 4 }), Some(4));
        assert_eq!(map.get(Pos { y: 0, x: 5 }), Some(4));
    }

    #[test]
    fn non_positive_ceiling_yields_an_empty_map() {
        let pather = GridPather::open(3, 3);
        let mut searcher = Searcher::new(pather.size);
        let map = searcher.dijkstra_map(&pather, &[Pos { y: 1, x: 1 }], 0).expect("in bounds");
        assert!(map.is_empty());
    }

    #[test]
    fn bfs_records_distances_and_reach_order() {
        let pather = GridPather::parse(&["..#.", "..#.", "...."]);
        let mut searcher = Searcher::new(pather.size);
        let map = searcher.bfs_map(&pather, &[Pos { y: 0, x: 0 }]).expect("in bounds");

        assert_eq!(map.order().first(), Some(&Pos { y: 0, x: 0 }));
        assert_eq!(map.distance(Pos { y: 0, x: 3 }), Some(4));
        assert_eq!(map.distance(Pos { y: 0, x: 2 }), None, "walls are never reached");
        assert_eq!(map.order().len(), 10);
        let distances: Vec<i32> =
            map.order().iter().filter_map(|&pos| map.distance(pos)).collect();
        assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]), "BFS order is by distance");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn flood_is_bounded_and_complete(
            mask in proptest::collection::vec(prop::bool::weighted(0.25), 64),
            max_cost in 1i32..12,
        ) {
            let pather = pather_from_mask(8, 8, &mask);
            let source = Pos { y: 0, x: 0 };
            let mut searcher = Searcher::new(pather.size);
            let bounded = searcher.dijkstra_map(&pather, &[source], max_cost).expect("in bounds");
            let unbounded = searcher.dijkstra_map(&pather, &[source], i32::MAX).expect("in bounds");

            for (pos, cost) in bounded.iter() {
                prop_assert!(cost < max_cost, "{pos:?} has cost {cost} >= {max_cost}");
            }
            for (pos, cost) in unbounded.iter() {
                if cost < max_cost {
                    prop_assert_eq!(bounded.get(pos), Some(cost));
                }
            }
        }

        #[test]
        fn shrinking_the_ceiling_never_changes_returned_costs(
            mask in proptest::collection::vec(prop::bool::weighted(0.3), 64),
            high in 2i32..16,
            cut in 1i32..16,
        ) {
            let low = cut.min(high - 1);
            let pather = pather_from_mask(8, 8, &mask);
            let sources = [Pos { y: 3, x: 3 }, Pos { y: 7, x: 0 }];
            let mut searcher = Searcher::new(pather.size);
            let wide = searcher.dijkstra_map(&pather, &sources, high).expect("in bounds");
            let narrow = searcher.dijkstra_map(&pather, &sources, low).expect("in bounds");

            prop_assert!(narrow.len() <= wide.len());
            for (pos, cost) in narrow.iter() {
                prop_assert_eq!(wide.get(pos), Some(cost));
            }
        }
    }
}

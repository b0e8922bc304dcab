//! The ACO pheromone store.
//!
//! A square matrix of side `2n−1`: row/column 0 is reserved (the physical
//! depot is never indexed directly — every route gets its own virtual
//! depot id instead, so edges leaving or entering "the depot" can carry
//! route-specific pheromone). Regular customer ids `1..n` index themselves;
//! virtual per-route depot ids `n..2n−1` serve as distinct start/end nodes.

use rand::Rng;

use crate::model::Solution;

#[derive(Debug, Clone)]
pub struct PheromoneStore {
    side: usize,
    data: Vec<f64>,
}

impl PheromoneStore {
    /// `n` is the instance size including the depot.
    pub fn new(n: usize, initial_pheromone: f64) -> Self {
        let side = 2 * n - 1;
        let mut store = Self {
            side,
            data: vec![0.0; side * side],
        };
        store.reset(initial_pheromone);
        store
    }

    fn idx(&self, i: usize, j: usize) -> usize {
        i * self.side + j
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i == 0 || j == 0 {
            0.0
        } else {
            self.data[self.idx(i, j)]
        }
    }

    fn set(&mut self, i: usize, j: usize, v: f64) {
        let idx = self.idx(i, j);
        self.data[idx] = v;
    }

    /// Assigns `initial_pheromone` to every non-reserved, off-diagonal cell.
    pub fn reset(&mut self, initial_pheromone: f64) {
        for i in 1..self.side {
            for j in 1..self.side {
                if i != j {
                    self.set(i, j, initial_pheromone);
                }
            }
        }
    }

    /// Assigns a uniform random value in `[min_pheromone, 1.0)` to every
    /// non-reserved, off-diagonal cell. Used to escape stagnation.
    pub fn shake<R: Rng + ?Sized>(&mut self, min_pheromone: f64, rng: &mut R) {
        for i in 1..self.side {
            for j in 1..self.side {
                if i != j {
                    self.set(i, j, rng.random_range(min_pheromone..1.0));
                }
            }
        }
    }

    /// Trail strength for inserting `k_id` between `after` and its
    /// successor on the route whose virtual depot id is `depot_vr`.
    /// `after`/`succ` pass their own id unless they are the depot sentinel,
    /// in which case `depot_vr` is substituted.
    pub fn trail(&self, depot_vr: usize, after_id_or_depot: Option<usize>, k_id: usize, succ_id_or_depot: Option<usize>) -> f64 {
        let a = after_id_or_depot.unwrap_or(depot_vr);
        let s = succ_id_or_depot.unwrap_or(depot_vr);
        let denom = self.get(a, s);
        if denom.abs() < f64::EPSILON {
            self.get(a, k_id) + self.get(k_id, s)
        } else {
            (self.get(a, k_id) + self.get(k_id, s)) / (2.0 * denom)
        }
    }

    /// Adjusts an I1 insertion cost by the trail strength at the same
    /// edge: divides when the trail is non-negative (stronger trail, lower
    /// cost), multiplies when negative (preserving sign and ordering).
    pub fn adjust_cost(&self, cost: f64, trail: f64) -> f64 {
        if trail >= 0.0 {
            if trail.abs() < f64::EPSILON {
                cost
            } else {
                cost / trail
            }
        } else {
            cost * trail
        }
    }

    /// Decays every non-reserved cell, then reinforces every edge used by
    /// `solution`'s routes.
    pub fn update(&mut self, solution: &Solution, rho: f64, min_pheromone: f64) {
        for i in 1..self.side {
            for j in 1..self.side {
                if i != j {
                    let v = self.get(i, j);
                    self.set(i, j, (rho * v).max(min_pheromone));
                }
            }
        }

        let delta = 1.0 - rho;
        for route in solution.routes() {
            let first = match route.first_interior() {
                Some(idx) => idx,
                None => continue,
            };
            let last = route.last_interior().expect("non-empty route has a last interior node");
            let depot_vr = route.depot_vr_id();

            let first_id = route.record(first).id;
            let v = self.get(depot_vr, first_id);
            self.set(depot_vr, first_id, v + delta);

            let last_id = route.record(last).id;
            let v = self.get(last_id, depot_vr);
            self.set(last_id, depot_vr, v + delta);

            let mut idx = first;
            while idx != last {
                let next = route.next(idx).expect("interior node has a successor before `last`");
                let a = route.record(idx).id;
                let b = route.record(next).id;
                let v = self.get(a, b);
                self.set(a, b, v + delta);
                idx = next;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::Node;
    use crate::model::problem::{CostWeights, I1Params};
    use crate::model::{Problem, Route};

    #[test]
    fn test_reset_fills_non_reserved_cells() {
        let store = PheromoneStore::new(3, 0.5);
        assert_eq!(store.get(0, 1), 0.0);
        assert_eq!(store.get(1, 2), 0.5);
    }

    #[test]
    fn test_update_decay_bound() {
        let nodes = vec![
            Node::new(0, 0.0, 0.0, 0, 0.0, 1000.0, 0.0),
            Node::new(1, 1.0, 0.0, 10, 0.0, 1000.0, 0.0),
        ];
        let problem = Problem::new(
            "t".into(),
            nodes,
            200,
            1,
            I1Params { alpha: 1.0, mu: 1.0, lambda: 2.0 },
            CostWeights { truck: 1e6, worker: 1e3, distance: 1.0 },
        );
        let depot = problem.depot().clone();
        let mut route = Route::new_with_seed(0, 2, &depot, problem.nodes[1].record(), 1);
        route.recompute_all(|i, j| problem.tau(1, i, j));
        let mut sol = crate::model::Solution::new(Vec::new());
        sol.push_route(route);

        let mut store = PheromoneStore::new(2, 0.5);
        store.update(&sol, 0.9, 0.01);
        for i in 1..store.side {
            for j in 1..store.side {
                if i != j {
                    assert!(store.get(i, j) >= 0.01);
                }
            }
        }
    }

    #[test]
    fn test_trail_falls_back_to_sum_on_zero_denominator() {
        let store = PheromoneStore::new(3, 0.0);
        let t = store.trail(3, Some(1), 2, None);
        assert_eq!(t, 0.0);
    }
}
